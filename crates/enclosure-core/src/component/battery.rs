use enclosure_cad::{CadKernel, Contour, Plane, Solid};
use glam::{DVec2, DVec3};

use crate::anchor::{Extreme, extreme_edges};
use crate::error::BoxResult;

/// 9 V block battery
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Battery;

impl Battery {
    pub const SIZE: DVec3 = DVec3::new(26.0, 52.0, 17.0);

    /// Radius of the rounded body edges
    pub const EDGE_RADIUS: f64 = 1.0;

    /// Rounded battery body centered at the origin
    pub fn solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let outline = Contour::rectangle(DVec2::ZERO, Self::SIZE.x, Self::SIZE.y)
            .fillet_corners(Self::EDGE_RADIUS)?;
        let base = Plane::offset_xy(-Self::SIZE.z / 2.0);
        let body = kernel.make_prism(&outline, &base, Self::SIZE.z)?;
        let top = extreme_edges(kernel, &body, Extreme::Max)?;
        let body = kernel.fillet(&body, &top, Self::EDGE_RADIUS)?;
        let bottom = extreme_edges(kernel, &body, Extreme::Min)?;
        Ok(kernel.fillet(&body, &bottom, Self::EDGE_RADIUS)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use enclosure_cad::MeshKernel;

    #[test]
    fn test_rounded_body() {
        let kernel = MeshKernel::new();
        let solid = Battery.solid(&kernel).unwrap();
        let bounds = kernel.bounding_box(&solid).unwrap();
        assert_abs_diff_eq!(bounds.size().x, 26.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bounds.size().y, 52.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bounds.size().z, 17.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bounds.center().z, 0.0, epsilon = 1e-6);

        let full = 26.0 * 52.0 * 17.0;
        let volume = kernel.volume(&solid).unwrap();
        assert!(volume < full);
        assert!(volume > 0.97 * full);
    }
}
