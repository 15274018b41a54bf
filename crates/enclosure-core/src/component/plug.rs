use enclosure_cad::{CadKernel, CadResult, Solid};
use glam::DVec3;

/// Power jack on the front edge of the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plug {
    /// Center of the jack mouth, Z at the jack underside
    pub position: DVec3,
}

impl Plug {
    pub const SIZE: DVec3 = DVec3::new(9.0, 15.3, 11.0);

    /// Depth of the opening into the wall
    const HOLE_DEPTH: f64 = 10.0;

    pub fn new(position: DVec3) -> Self {
        Self { position }
    }

    /// Opening through the wall in front of the jack
    pub fn hole(&self, kernel: &dyn CadKernel) -> CadResult<Solid> {
        let size = DVec3::new(Self::SIZE.x, Self::HOLE_DEPTH, Self::SIZE.z);
        kernel.make_box(self.position + DVec3::new(0.0, 0.0, size.z / 2.0), size)
    }
}
