//! Swept fillet parts
//!
//! An independent fillet is a profile swept along the lid or base outline.
//! [`FilletProfile`] holds the cross-section tables, [`ProfilePlacement`]
//! maps a (side, kind) pair to the rotation and lift applied at the rail
//! start, and [`ParametricFillet`] ties both to a [`ParametricBox`].

use enclosure_cad::{CadKernel, Join, Path, Solid, Transform, Transition, order_edges};
use glam::{DVec2, DVec3};

use crate::config::{FilletKind, Side};
use crate::error::BoxResult;
use crate::parametric_box::ParametricBox;

/// Snapped fillet cross-section as (wall, shell) fractions
pub const SNAPPED_PROFILE: [[f64; 2]; 9] = [
    [0.000, 1.000],
    [0.000, 0.750],
    [-0.750, 0.000],
    [-1.000, 0.000],
    [-1.000, 0.375],
    [-1.125, 0.500],
    [-1.000, 0.625],
    [-1.000, 1.000],
    [0.000, 1.000],
];

/// Lid-lock fillet cross-section as (wall, shell) fractions
pub const LID_LOCK_PROFILE: [[f64; 2]; 11] = [
    [0.500, -0.500],
    [0.500, 0.000],
    [0.000, 0.000],
    [0.000, 0.500],
    [-0.250, 0.500],
    [-1.000, -0.250],
    [-1.000, -0.500],
    [-0.500, -0.500],
    [-0.375, -0.375],
    [-0.250, -0.500],
    [0.500, -0.500],
];

/// A fillet cross-section scaled to the box shell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilletProfile {
    pub kind: FilletKind,
    /// Horizontal scale, the wall thickness
    pub shell_xy: f64,
    /// Vertical scale, the lid thickness
    pub shell_z: f64,
}

impl FilletProfile {
    pub fn new(kind: FilletKind, shell_xy: f64, shell_z: f64) -> Self {
        Self {
            kind,
            shell_xy,
            shell_z,
        }
    }

    /// Profile polyline in its own plane; the last point closes it
    pub fn points(&self) -> Vec<DVec2> {
        let table: &[[f64; 2]] = match self.kind {
            FilletKind::Snapped => &SNAPPED_PROFILE,
            FilletKind::LidLock => &LID_LOCK_PROFILE,
        };
        table
            .iter()
            .map(|[x, y]| DVec2::new(x * self.shell_xy, y * self.shell_z))
            .collect()
    }
}

/// Rotation and lift applied to a profile before it is swept
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilePlacement {
    /// Euler angles in degrees, about the fixed X, Y and Z axes in that order
    pub rotation_deg: DVec3,
    /// Offset added to the rail start point
    pub translation: DVec3,
}

impl ProfilePlacement {
    /// Placement for a fillet on `side` of a box of total `height` with the
    /// given base and lid thicknesses
    pub fn for_fillet(
        side: Side,
        kind: FilletKind,
        height: f64,
        bottom_thickness: f64,
        top_thickness: f64,
    ) -> Self {
        let (rotation_deg, translation) = match (side, kind) {
            (Side::Bottom, FilletKind::Snapped) => (DVec3::new(90.0, 0.0, 180.0), DVec3::ZERO),
            (Side::Bottom, FilletKind::LidLock) => (
                DVec3::new(90.0, 180.0, 180.0),
                DVec3::new(0.0, 0.0, bottom_thickness / 2.0),
            ),
            (Side::Top, FilletKind::Snapped) => {
                (DVec3::new(90.0, 0.0, 0.0), DVec3::new(0.0, 0.0, height))
            }
            (Side::Top, FilletKind::LidLock) => (
                DVec3::new(90.0, 10.0, 0.0),
                DVec3::new(0.0, 0.0, height - top_thickness / 2.0),
            ),
        };
        Self {
            rotation_deg,
            translation,
        }
    }

    /// Transform taking profile coordinates to world space at `start`
    pub fn transform(&self, start: DVec3) -> Transform {
        let r = self.rotation_deg;
        Transform::translation(self.translation)
            * Transform::translation(start)
            * Transform::rotation_deg(r.x, r.y, r.z)
    }
}

/// A swept fillet belonging to one side of a box
#[derive(Debug, Clone, Copy)]
pub struct ParametricFillet<'a> {
    parent: &'a ParametricBox,
    side: Side,
    kind: FilletKind,
}

impl<'a> ParametricFillet<'a> {
    pub fn new(parent: &'a ParametricBox, side: Side, kind: FilletKind) -> Self {
        Self { parent, side, kind }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn kind(&self) -> FilletKind {
        self.kind
    }

    pub fn profile(&self) -> FilletProfile {
        let config = self.parent.config();
        FilletProfile::new(self.kind, config.dim_wall.x, config.dim_top.z)
    }

    pub fn placement(&self) -> ProfilePlacement {
        let config = self.parent.config();
        ProfilePlacement::for_fillet(
            self.side,
            self.kind,
            self.parent.height(),
            config.dim_bottom.z,
            config.dim_top.z,
        )
    }

    /// Sweep rail: the shell outline grown by the horizontal clearance
    pub fn path(&self) -> BoxResult<Path> {
        let outline = match self.side {
            Side::Bottom => self.parent.bottom_sketch()?,
            Side::Top => self.parent.top_sketch()?,
        };
        let clearance = self.parent.config().clearance.x;
        let outline = if clearance != 0.0 {
            outline.offset(clearance, Join::Arc)?
        } else {
            outline
        };
        let path = order_edges(outline.edges())?;
        tracing::debug!(
            "{:?} fillet rail with {} segments starting at {}",
            self.side,
            path.len(),
            path.start_point()
        );
        Ok(path)
    }

    /// Profile positioned in world space at the start of `path`
    pub fn sketch(&self, path: &Path) -> Vec<DVec3> {
        let transform = self.placement().transform(path.start_point());
        self.profile()
            .points()
            .into_iter()
            .map(|p| transform.apply(p.extend(0.0)))
            .collect()
    }

    /// The swept part and the section it was swept from
    pub fn solid(&self, kernel: &dyn CadKernel) -> BoxResult<(Solid, Vec<DVec3>)> {
        let path = self.path()?;
        let section = self.sketch(&path);
        let solid = kernel.sweep(&section, &path, Transition::Right)?;
        Ok((solid, section))
    }
}
