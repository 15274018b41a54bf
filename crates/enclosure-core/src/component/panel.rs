//! Front panel parts seen through the lid

use enclosure_cad::{CadKernel, CadResult, Contour, Plane, Solid};
use glam::{DVec2, DVec3};

use super::UPWARD_DEPTH;
use crate::CUT_OVERLAP;

fn hole_upwards(kernel: &dyn CadKernel, contour: &Contour, z: f64) -> CadResult<Solid> {
    kernel.make_prism(
        contour,
        &Plane::offset_xy(z - CUT_OVERLAP),
        UPWARD_DEPTH + CUT_OVERLAP,
    )
}

/// Character display window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lcd {
    /// Lower left corner of the display, Z at the lid underside
    pub position: DVec3,
    pub clearance: DVec3,
}

impl Lcd {
    pub const SIZE: DVec3 = DVec3::new(34.0 + 2.20, 43.8 + 2.33, 4.0);

    pub fn new(position: DVec3, clearance: DVec3) -> Self {
        Self {
            position,
            clearance,
        }
    }

    pub fn sketch(&self) -> Contour {
        Contour::rectangle(
            self.position.truncate() + Self::SIZE.truncate() / 2.0,
            Self::SIZE.x + self.clearance.x,
            Self::SIZE.y + self.clearance.y,
        )
    }

    pub fn hole_upwards(&self, kernel: &dyn CadKernel) -> CadResult<Solid> {
        hole_upwards(kernel, &self.sketch(), self.position.z)
    }
}

/// Rotary encoder shaft
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encoder {
    /// Lower right corner of the encoder body
    pub position: DVec3,
}

impl Encoder {
    /// Encoder body footprint
    pub const SIZE: DVec2 = DVec2::new(13.8, 11.9);

    pub const KNOB_RADIUS: f64 = 5.0;

    pub fn new(position: DVec3) -> Self {
        Self { position }
    }

    pub fn sketch(&self) -> Contour {
        let center =
            self.position.truncate() + DVec2::new(-Self::SIZE.x / 2.0, Self::SIZE.y / 2.0);
        Contour::circle(center, Self::KNOB_RADIUS)
    }

    pub fn hole_upwards(&self, kernel: &dyn CadKernel) -> CadResult<Solid> {
        hole_upwards(kernel, &self.sketch(), self.position.z)
    }
}

/// Status LED
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Led {
    pub position: DVec3,
}

impl Led {
    pub const RADIUS: f64 = 1.5;

    pub fn new(position: DVec3) -> Self {
        Self { position }
    }

    pub fn sketch(&self) -> Contour {
        Contour::circle(
            self.position.truncate() + DVec2::splat(Self::RADIUS),
            Self::RADIUS,
        )
    }

    pub fn hole_upwards(&self, kernel: &dyn CadKernel) -> CadResult<Solid> {
        hole_upwards(kernel, &self.sketch(), self.position.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use enclosure_cad::MeshKernel;

    #[test]
    fn test_lcd_window() {
        let lcd = Lcd::new(DVec3::new(-10.0, -20.0, 5.0), DVec3::splat(0.2));
        let (min, max) = lcd.sketch().bounds();
        assert_abs_diff_eq!(min.x, -10.1, epsilon = 1e-9);
        assert_abs_diff_eq!(max.y, -20.0 + 46.13 + 0.1, epsilon = 1e-9);

        let kernel = MeshKernel::new();
        let hole = lcd.hole_upwards(&kernel).unwrap();
        let bounds = kernel.bounding_box(&hole).unwrap();
        assert!(bounds.min.z < 5.0);
        assert_abs_diff_eq!(bounds.max.z, 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_encoder_and_led_centers() {
        let encoder = Encoder::new(DVec3::new(36.85, -28.4, 0.0));
        assert_abs_diff_eq!(encoder.sketch().centroid().x, 29.95, epsilon = 1e-9);
        assert_abs_diff_eq!(encoder.sketch().centroid().y, -22.45, epsilon = 1e-9);

        let led = Led::new(DVec3::new(-36.35, -25.4, 0.0));
        let c = led.sketch().centroid();
        assert_abs_diff_eq!(c.x, -34.85, epsilon = 1e-9);
        assert_abs_diff_eq!(c.y, -23.9, epsilon = 1e-9);
    }
}
