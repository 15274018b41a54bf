//! Component footprints
//!
//! Each component of the GM328A tester is a small value holding its
//! position; it produces the sketches and cutter or boss solids a variant
//! subtracts from or adds to the enclosure shells. Components know nothing
//! about the box they end up in.

mod battery;
mod board;
mod mkdsn;
mod pad;
mod panel;
mod plug;
mod zif;

pub use battery::Battery;
pub use board::Board;
pub use mkdsn::Mkdsn;
pub use pad::{Connector, Magnet};
pub use panel::{Encoder, Lcd, Led};
pub use plug::Plug;
pub use zif::Zif;

use enclosure_cad::{CadKernel, CadResult, Contour, Solid, Transform};
use glam::{DVec2, DVec3};

/// Depth of holes cut upwards through the lid
pub const UPWARD_DEPTH: f64 = 20.0;

/// Move `solid` to `location` after applying `rotation` about the origin
pub fn place(
    kernel: &dyn CadKernel,
    solid: &Solid,
    location: DVec3,
    rotation: Transform,
) -> CadResult<Solid> {
    kernel.transform(solid, &(Transform::translation(location) * rotation))
}

/// Regular polygon with a vertex on +X
fn pointed_polygon(center: DVec2, radius: f64, sides: usize) -> Contour {
    let sides = sides.max(3);
    Contour::regular_polygon(DVec2::ZERO, radius, sides)
        .rotated(180.0 / sides as f64)
        .translated(center)
}
