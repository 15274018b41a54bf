//! Anchor queries on generated solids
//!
//! Component placement on a variant needs coordinates read back from an
//! already generated shell or wall. The kernel may report one flat side as
//! several coplanar patches, so every query merges the patches lying on the
//! selected plane into one [`FaceAnchor`].

use enclosure_cad::{CadKernel, EdgeInfo, FaceInfo, Plane, Solid, face_x_dir};
use glam::DVec3;

use crate::error::{AnchorError, BoxResult};

/// Patches closer than this to the selected plane are merged
const PLANE_TOLERANCE: f64 = 1e-6;

/// Which end of an axis to select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Min,
    Max,
}

/// A planar face located on a solid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceAnchor {
    /// Center of the face's bounding box
    pub center: DVec3,
    /// Outward normal
    pub normal: DVec3,
    /// Extent along the face's local y direction (world Z for vertical faces)
    pub height: f64,
    /// Extent along the face's local x direction
    pub width: f64,
    pub min: DVec3,
    pub max: DVec3,
}

impl FaceAnchor {
    fn merge(faces: &[&FaceInfo]) -> Option<Self> {
        let first = faces.first()?;
        let normal = first.normal;
        let (min, max) = faces.iter().fold(
            (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY)),
            |(min, max), f| (min.min(f.min), max.max(f.max)),
        );
        let x_dir = face_x_dir(normal);
        let y_dir = normal.cross(x_dir);
        let size = max - min;
        Some(Self {
            center: (min + max) * 0.5,
            normal,
            height: size.dot(y_dir).abs(),
            width: size.dot(x_dir).abs(),
            min,
            max,
        })
    }

    /// Plane at the face center, facing out of the solid
    pub fn plane(&self) -> Plane {
        Plane::new(self.center, face_x_dir(self.normal), self.normal)
    }
}

fn describe(axis: DVec3) -> [f64; 3] {
    axis.to_array()
}

/// The face whose normal is colinear with `axis` and which lies furthest
/// along it (`Max`) or against it (`Min`)
pub fn extreme_face(
    kernel: &dyn CadKernel,
    solid: &Solid,
    axis: DVec3,
    extreme: Extreme,
) -> BoxResult<FaceAnchor> {
    let faces = kernel.sort_faces(solid, axis)?;
    let selected = match extreme {
        Extreme::Min => faces.first(),
        Extreme::Max => faces.last(),
    }
    .ok_or_else(|| AnchorError::NoMatchingFace {
        axis: describe(axis),
        description: format!("{extreme:?} face"),
    })?;
    let coordinate = selected.center.dot(axis);
    let patches: Vec<&FaceInfo> = faces
        .iter()
        .filter(|f| {
            (f.center.dot(axis) - coordinate).abs() < PLANE_TOLERANCE
                && f.normal.dot(selected.normal) > 0.0
        })
        .collect();
    let anchor = FaceAnchor::merge(&patches).ok_or_else(|| AnchorError::NoMatchingFace {
        axis: describe(axis),
        description: format!("{extreme:?} face"),
    })?;
    tracing::debug!(
        "{extreme:?} face along {axis}: center {}, {} x {}",
        anchor.center,
        anchor.width,
        anchor.height
    );
    Ok(anchor)
}

/// The face whose normal is colinear with `axis` and whose plane sits at
/// `coordinate` along it
pub fn face_at(
    kernel: &dyn CadKernel,
    solid: &Solid,
    axis: DVec3,
    coordinate: f64,
) -> BoxResult<FaceAnchor> {
    let faces = kernel.faces_along(solid, axis)?;
    let patches: Vec<&FaceInfo> = faces
        .iter()
        .filter(|f| (f.center.dot(axis) - coordinate).abs() < PLANE_TOLERANCE)
        .collect();
    let Some(anchor) = FaceAnchor::merge(&patches) else {
        return Err(AnchorError::NoMatchingFace {
            axis: describe(axis),
            description: format!("a face at {coordinate}"),
        }
        .into());
    };
    Ok(anchor)
}

/// Edges lying entirely on the lowest (`Min`) or highest (`Max`) Z level
/// of the solid
pub fn extreme_edges(
    kernel: &dyn CadKernel,
    solid: &Solid,
    extreme: Extreme,
) -> BoxResult<Vec<EdgeInfo>> {
    let bounds = kernel.bounding_box(solid)?;
    let z = match extreme {
        Extreme::Min => bounds.min.z,
        Extreme::Max => bounds.max.z,
    };
    Ok(kernel
        .edges(solid)?
        .into_iter()
        .filter(|e| (e.start.z - z).abs() < PLANE_TOLERANCE && (e.end.z - z).abs() < PLANE_TOLERANCE)
        .collect())
}
