use enclosure_cad::{CadKernel, CadResult, Contour, ExtrudeOptions, Plane, Region, Sketch, Solid};
use glam::{DVec2, DVec3};

/// The GM328A tester circuit board
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Board;

impl Board {
    /// Board outline and thickness
    pub const SIZE: DVec3 = DVec3::new(78.7, 63.8, 1.52);

    /// Height of the solder leads under the board
    pub const SOLDER: f64 = 4.0;

    pub const HOLE_RADIUS: f64 = 1.55;

    /// Distance from the board edges to the mounting hole centers
    pub const HOLE_INSET: f64 = Self::HOLE_RADIUS + 1.3;

    /// Radius of the rounded board corners
    pub const CORNER_RADIUS: f64 = 2.35;

    /// Mounting hole centers, board centered at the origin
    pub fn hole_centers(&self) -> [DVec2; 4] {
        let x = Self::SIZE.x / 2.0 - Self::HOLE_INSET;
        let y = Self::SIZE.y / 2.0 - Self::HOLE_INSET;
        [
            DVec2::new(-x, -y),
            DVec2::new(x, -y),
            DVec2::new(-x, y),
            DVec2::new(x, y),
        ]
    }

    pub fn sketch(&self) -> CadResult<Region> {
        let outline = Contour::rectangle(DVec2::ZERO, Self::SIZE.x, Self::SIZE.y)
            .fillet_corners(Self::CORNER_RADIUS)?;
        Ok(Region {
            outer: outline,
            holes: self
                .hole_centers()
                .into_iter()
                .map(|c| Contour::circle(c, Self::HOLE_RADIUS))
                .collect(),
        })
    }

    /// The drilled board, centered at the origin
    pub fn solid(&self, kernel: &dyn CadKernel) -> CadResult<Solid> {
        kernel.extrude(
            &Sketch::from(self.sketch()?),
            &Plane::offset_xy(-Self::SIZE.z / 2.0),
            Self::SIZE.z,
            ExtrudeOptions::default(),
        )
    }
}
