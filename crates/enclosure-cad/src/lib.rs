//! CAD Kernel Abstraction and Sketch Values
//!
//! This crate provides:
//! - Abstract CAD kernel trait for solid modelling operations
//! - A polygon-mesh kernel with csgrs booleans
//! - 2D sketch values (contours, regions, sketches) with offsets and corner treatments
//! - Path ordering for sweep rails and edge loops

pub mod kernel;
pub mod path;
pub mod sketch;

// Re-exports for convenience
pub use kernel::{
    BooleanType, BoundingBox, CadError, CadKernel, CadResult, EdgeId, EdgeInfo, ExtrudeOptions,
    FaceId, FaceInfo, MeshKernel, Plane, Solid, TessellatedMesh, Transform, Transition,
    default_kernel, face_x_dir,
};
pub use path::{Path, PathError, Segment, order_edges};
pub use sketch::{Contour, Join, Region, Sketch};
