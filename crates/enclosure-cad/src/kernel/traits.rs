//! Kernel contract and query records
//!
//! [`CadKernel`] is the seam between the enclosure derivation and the
//! geometry backend. Query records ([`FaceInfo`], [`EdgeInfo`]) carry the
//! planar facts the anchor queries read back from generated solids.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::placement::{Plane, Transform};
use crate::path::{Path, PathError, Segment};
use crate::sketch::{Contour, Sketch};

/// Unique identifier for an edge within a solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId {
    /// ID of the solid this edge belongs to
    pub solid_id: Uuid,
    /// Index of the edge within the solid
    pub index: u32,
}

impl EdgeId {
    /// Create a new edge ID
    pub fn new(solid_id: Uuid, index: u32) -> Self {
        Self { solid_id, index }
    }
}

/// Unique identifier for a face within a solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceId {
    /// ID of the solid this face belongs to
    pub solid_id: Uuid,
    /// Index of the face within the solid
    pub index: u32,
}

impl FaceId {
    /// Create a new face ID
    pub fn new(solid_id: Uuid, index: u32) -> Self {
        Self { solid_id, index }
    }
}

/// Information about an edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeInfo {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Start point of the edge
    pub start: DVec3,
    /// End point of the edge
    pub end: DVec3,
    /// Midpoint of the edge
    pub midpoint: DVec3,
    /// Length of the edge
    pub length: f64,
}

impl EdgeInfo {
    /// Create a new edge info
    pub fn new(id: EdgeId, start: DVec3, end: DVec3) -> Self {
        let midpoint = (start + end) * 0.5;
        let length = (end - start).length();
        Self {
            id,
            start,
            end,
            midpoint,
            length,
        }
    }

    /// The edge as a path segment
    pub fn segment(&self) -> Segment {
        Segment::new(self.start, self.end)
    }
}

/// Information about a planar face
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceInfo {
    /// Unique identifier for this face
    pub id: FaceId,
    /// Area-weighted center of the face
    pub center: DVec3,
    /// Outward unit normal
    pub normal: DVec3,
    /// Area of the face
    pub area: f64,
    /// Minimum corner of the face's bounding box
    pub min: DVec3,
    /// Maximum corner of the face's bounding box
    pub max: DVec3,
    /// Extent along the face's local x direction
    pub length: f64,
    /// Extent along the face's local y direction (world Z for vertical faces)
    pub width: f64,
}

impl FaceInfo {
    /// True when the face normal is parallel or anti-parallel to `axis`
    pub fn is_colinear(&self, axis: DVec3) -> bool {
        let axis = axis.normalize_or_zero();
        (self.normal.dot(axis).abs() - 1.0).abs() < 1e-6
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoundingBox {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// True when the boxes overlap (touching counts)
    pub fn overlaps(&self, other: &BoundingBox, tolerance: f64) -> bool {
        self.min.x <= other.max.x + tolerance
            && other.min.x <= self.max.x + tolerance
            && self.min.y <= other.max.y + tolerance
            && other.min.y <= self.max.y + tolerance
            && self.min.z <= other.max.z + tolerance
            && other.min.z <= self.max.z + tolerance
    }
}

/// Corner type for sweep operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Transition {
    /// Sharp mitred corners (default)
    #[default]
    Right,
    /// Rounded corners
    Round,
}

/// Error type for CAD kernel operations
#[derive(Debug, Clone, Error)]
pub enum CadError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Degenerate offset: {0}")]
    DegenerateOffset(String),

    #[error("Degenerate extrusion: {0}")]
    DegenerateExtrusion(String),

    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Solid {0} was not created by this kernel")]
    ForeignSolid(Uuid),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Path error: {0}")]
    Path(#[from] PathError),
}

/// Result type for CAD operations
pub type CadResult<T> = Result<T, CadError>;

/// A tessellated mesh output from the CAD kernel
#[derive(Debug, Clone, Default)]
pub struct TessellatedMesh {
    /// Vertex positions (3 floats per vertex)
    pub vertices: Vec<[f32; 3]>,
    /// Vertex normals (3 floats per vertex)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (3 indices per triangle)
    pub indices: Vec<u32>,
}

impl TessellatedMesh {
    /// Create an empty tessellated mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A 3D solid body.
///
/// The geometry is owned by the kernel that created it and shared between
/// clones; solids are immutable values.
#[derive(Clone)]
pub struct Solid {
    /// Unique identifier
    pub id: Uuid,
    data: Arc<dyn Any + Send + Sync>,
}

impl fmt::Debug for Solid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solid").field("id", &self.id).finish()
    }
}

impl Solid {
    /// Wrap kernel data in a new solid with a fresh ID
    pub fn new<T: Any + Send + Sync>(data: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            data: Arc::new(data),
        }
    }

    /// Kernel data, if it is of type `T`
    pub fn data<T: Any>(&self) -> Option<&T> {
        self.data.as_ref().downcast_ref::<T>()
    }
}

/// Options for extrusion
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtrudeOptions {
    /// Draft angle in degrees; positive shrinks outer contours along the extrusion
    pub taper_deg: f64,
    /// Extrude symmetrically to both sides of the plane
    pub both: bool,
}

impl ExtrudeOptions {
    pub fn taper(taper_deg: f64) -> Self {
        Self {
            taper_deg,
            both: false,
        }
    }

    pub fn both() -> Self {
        Self {
            taper_deg: 0.0,
            both: true,
        }
    }
}

/// Boolean operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanType {
    /// Union (add)
    Union,
    /// Subtraction (cut)
    Subtract,
    /// Intersection (common)
    Intersect,
}

/// Solid modelling operations used by the enclosure parts
///
/// Every operation returns a new solid; inputs are never modified.
pub trait CadKernel: Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Create a box primitive
    fn make_box(&self, center: DVec3, size: DVec3) -> CadResult<Solid>;

    /// Create a Z-aligned cylinder primitive
    ///
    /// # Arguments
    /// * `base_center` - Center of the bottom disc
    /// * `radius` - Cylinder radius
    /// * `height` - Height along +Z
    fn make_cylinder(&self, base_center: DVec3, radius: f64, height: f64) -> CadResult<Solid>;

    /// Extrude a sketch along its plane normal
    ///
    /// # Arguments
    /// * `sketch` - The regions to extrude
    /// * `plane` - Plane the sketch lives on
    /// * `amount` - Signed distance; negative extrudes against the normal
    /// * `options` - Taper and symmetric extrusion
    fn extrude(
        &self,
        sketch: &Sketch,
        plane: &Plane,
        amount: f64,
        options: ExtrudeOptions,
    ) -> CadResult<Solid>;

    /// Loft through two or more sections of equal topology
    ///
    /// # Arguments
    /// * `sections` - Sketches with their planes, in order
    /// * `ruled` - Connect sections with straight rulings
    fn loft(&self, sections: &[(Sketch, Plane)], ruled: bool) -> CadResult<Solid>;

    /// Sweep a closed planar profile along a path
    ///
    /// # Arguments
    /// * `profile` - Profile vertices in world space, positioned at the path start
    /// * `path` - The rail
    /// * `transition` - How corners of the rail are joined
    fn sweep(&self, profile: &[DVec3], path: &Path, transition: Transition)
    -> CadResult<Solid>;

    /// Perform a boolean operation on two solids
    ///
    /// # Arguments
    /// * `a` - The first solid
    /// * `b` - The second solid
    /// * `op` - The boolean operation type
    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CadResult<Solid>;

    /// Apply a rigid transform
    fn transform(&self, solid: &Solid, transform: &Transform) -> CadResult<Solid>;

    /// Round a closed horizontal edge loop lying on the top or bottom of `solid`
    ///
    /// # Arguments
    /// * `solid` - The solid to modify
    /// * `edges` - Edges to fillet
    /// * `radius` - Fillet radius
    fn fillet(&self, solid: &Solid, edges: &[EdgeInfo], radius: f64) -> CadResult<Solid>;

    /// Bevel a closed horizontal edge loop lying on the top or bottom of `solid`
    ///
    /// # Arguments
    /// * `solid` - The solid to modify
    /// * `edges` - Edges to chamfer
    /// * `size` - Chamfer distance
    fn chamfer(&self, solid: &Solid, edges: &[EdgeInfo], size: f64) -> CadResult<Solid>;

    /// Construction edges still lying on the surface of `solid`
    fn edges(&self, solid: &Solid) -> CadResult<Vec<EdgeInfo>>;

    /// Faces, one record per face label the construction assigned
    fn faces(&self, solid: &Solid) -> CadResult<Vec<FaceInfo>>;

    /// Get all distinct vertices of a solid
    fn vertices(&self, solid: &Solid) -> CadResult<Vec<DVec3>>;

    fn bounding_box(&self, solid: &Solid) -> CadResult<BoundingBox>;

    fn volume(&self, solid: &Solid) -> CadResult<f64>;

    /// Tessellate a solid into triangles
    fn tessellate(&self, solid: &Solid) -> CadResult<TessellatedMesh>;

    // ========== Provided helpers ==========

    /// Extrude a single contour
    fn make_prism(&self, contour: &Contour, plane: &Plane, height: f64) -> CadResult<Solid> {
        self.extrude(
            &Sketch::from(contour.clone()),
            plane,
            height,
            ExtrudeOptions::default(),
        )
    }

    fn union(&self, a: &Solid, b: &Solid) -> CadResult<Solid> {
        self.boolean(a, b, BooleanType::Union)
    }

    fn subtract(&self, a: &Solid, b: &Solid) -> CadResult<Solid> {
        self.boolean(a, b, BooleanType::Subtract)
    }

    fn intersect(&self, a: &Solid, b: &Solid) -> CadResult<Solid> {
        self.boolean(a, b, BooleanType::Intersect)
    }

    /// Union a list of solids from left to right
    fn union_all(&self, solids: &[Solid]) -> CadResult<Solid> {
        let (first, rest) = solids
            .split_first()
            .ok_or_else(|| CadError::OperationFailed("union of no solids".into()))?;
        rest.iter()
            .try_fold(first.clone(), |acc, s| self.union(&acc, s))
    }

    /// Faces whose normal is colinear with `axis`, in kernel order
    fn faces_along(&self, solid: &Solid, axis: DVec3) -> CadResult<Vec<FaceInfo>> {
        Ok(self
            .faces(solid)?
            .into_iter()
            .filter(|f| f.is_colinear(axis))
            .collect())
    }

    /// Faces colinear with `axis`, sorted by the position of their center along it
    fn sort_faces(&self, solid: &Solid, axis: DVec3) -> CadResult<Vec<FaceInfo>> {
        let mut faces = self.faces_along(solid, axis)?;
        faces.sort_by(|a, b| a.center.dot(axis).total_cmp(&b.center.dot(axis)));
        Ok(faces)
    }
}

