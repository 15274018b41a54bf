//! Pegs and magnets joining the removable wall to the base
//!
//! Pads are modelled along -X from the origin: the mating face sits at
//! x = 0 and the body reaches back to x = -length. Variants place them with
//! [`super::place`].

use enclosure_cad::{CadKernel, CadResult, Contour, ExtrudeOptions, Plane, Sketch, Solid, Transform};
use glam::DVec2;

use super::pointed_polygon;

/// Lay a prism built along +Z down along -X
fn along_x(kernel: &dyn CadKernel, solid: &Solid) -> CadResult<Solid> {
    kernel.transform(solid, &Transform::rotation_deg(0.0, -90.0, 0.0))
}

/// A polygonal peg and the pockets it fits in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub sides: usize,
    /// Circumradius of the peg section
    pub radius: f64,
    pub length: f64,
    /// Play between peg and pocket
    pub clearance: f64,
}

impl Connector {
    pub fn new(sides: usize, radius: f64, length: f64, clearance: f64) -> Self {
        Self {
            sides,
            radius,
            length,
            clearance,
        }
    }

    /// Hexagonal peg used between wall and base
    pub fn hex() -> Self {
        Self::new(6, 2.0, 2.5, 0.2)
    }

    pub fn length_reinforcement(&self) -> f64 {
        self.length + 3.0 * self.clearance
    }

    pub fn length_empty(&self) -> f64 {
        self.length + self.clearance
    }

    pub fn contour(&self, radius: f64) -> Contour {
        pointed_polygon(DVec2::ZERO, radius, self.sides)
    }

    fn prism(&self, kernel: &dyn CadKernel, radius: f64, length: f64) -> CadResult<Solid> {
        let prism = kernel.make_prism(&self.contour(radius), &Plane::XY, length)?;
        along_x(kernel, &prism)
    }

    /// The peg itself
    pub fn solid(&self, kernel: &dyn CadKernel) -> CadResult<Solid> {
        self.prism(kernel, self.radius, self.length)
    }

    /// Boss surrounding a pocket
    pub fn reinforcement(&self, kernel: &dyn CadKernel) -> CadResult<Solid> {
        self.prism(
            kernel,
            self.radius + 3.0 * self.clearance,
            self.length_reinforcement(),
        )
    }

    /// Pocket receiving the peg
    pub fn empty(&self, kernel: &dyn CadKernel) -> CadResult<Solid> {
        self.prism(kernel, self.radius + self.clearance, self.length_empty())
    }
}

/// A square magnet pocket with a cable channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magnet {
    pub pad: Connector,
}

impl Magnet {
    const CABLE_RADIUS: f64 = 0.5;

    pub fn new(pad: Connector) -> Self {
        Self { pad }
    }

    /// 5 mm square magnet
    pub fn square() -> Self {
        Self::new(Connector::new(4, 5.0 * std::f64::consts::SQRT_2 / 2.0, 2.0, 0.2))
    }

    pub fn reinforcement(&self, kernel: &dyn CadKernel) -> CadResult<Solid> {
        self.pad.reinforcement(kernel)
    }

    /// Magnet pocket plus a channel for the wire along one corner
    pub fn empty(&self, kernel: &dyn CadKernel) -> CadResult<Solid> {
        let length = self.pad.length_empty();
        let pocket = kernel.make_prism(
            &self.pad.contour(self.pad.radius + self.pad.clearance),
            &Plane::XY,
            length,
        )?;
        let cable = pointed_polygon(
            DVec2::new(self.pad.radius - Self::CABLE_RADIUS / 2.0, 0.0),
            Self::CABLE_RADIUS,
            4,
        );
        let cable = kernel.extrude(
            &Sketch::from(cable),
            &Plane::XY,
            3.0 * length,
            ExtrudeOptions::both(),
        )?;
        along_x(kernel, &kernel.union(&pocket, &cable)?)
    }
}
