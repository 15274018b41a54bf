//! CAD kernel abstraction
//!
//! [`CadKernel`] is the contract every geometry backend implements;
//! [`MeshKernel`] is the built-in backend over csgrs meshes.

mod mesh;
mod placement;
mod traits;

pub use mesh::MeshKernel;
pub use placement::{Plane, Transform, face_x_dir};
pub use traits::*;

/// Get the default CAD kernel
pub fn default_kernel() -> Box<dyn CadKernel> {
    Box::new(MeshKernel::new())
}
