use enclosure_cad::{CadKernel, Solid, Transform};
use glam::{DVec2, DVec3};

use super::Enclosure;
use crate::CUT_OVERLAP;
use crate::anchor::{Extreme, FaceAnchor, extreme_face};
use crate::component::{Battery, Connector, Magnet, place};
use crate::config::BoxConfig;
use crate::error::{BoxResult, ConfigError};
use crate::parametric_box::ParametricBox;

/// Battery box clipped to the side of the case
///
/// Its +X wall carries the pegs and magnets matching the pockets in the
/// case's -X wall.
#[derive(Debug, Clone)]
pub struct Gm328aBattery {
    base: ParametricBox,
    battery: Battery,
}

impl Gm328aBattery {
    pub fn new(config: BoxConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base: ParametricBox::new(config)?,
            battery: Battery,
        })
    }

    /// Phase 2: the outer +X face of the plain wall
    pub fn wall_anchor(&self, kernel: &dyn CadKernel, wall: &Solid) -> BoxResult<FaceAnchor> {
        extreme_face(kernel, wall, DVec3::X, Extreme::Max)
    }

    /// The battery resting on the base
    pub fn battery_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let z = self.base.config().dim_bottom.z + Battery::SIZE.z / 2.0;
        let battery = self.battery.solid(kernel)?;
        Ok(kernel.transform(&battery, &Transform::translation(DVec3::new(0.0, 0.0, z)))?)
    }
}

impl Enclosure for Gm328aBattery {
    fn name(&self) -> &str {
        "gm328a battery"
    }

    fn parametric_box(&self) -> &ParametricBox {
        &self.base
    }

    fn top_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        self.base.top_solid(kernel)
    }

    fn bottom_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        self.base.bottom_solid(kernel)
    }

    fn wall_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let mut wall = self.base.wall_solid(kernel)?;
        let anchor = self.wall_anchor(kernel, &wall)?;
        let c = anchor.center;
        let (h, w) = (anchor.height, anchor.width);
        let level = Transform::default();

        let hex = Connector::hex();
        let peg = hex.solid(kernel)?;
        for spot in [
            DVec2::new(-w / 2.0 + 5.0, -h / 6.0),
            DVec2::new(0.0, h / 8.0),
            DVec2::new(w / 2.0 - 5.0, -h / 6.0),
        ] {
            let at = c + DVec3::new(hex.length, spot.x, spot.y);
            wall = kernel.union(&wall, &place(kernel, &peg, at, level)?)?;
        }

        let magnet = Magnet::square();
        let reinforcement = magnet.reinforcement(kernel)?;
        let empty = magnet.empty(kernel)?;
        for dy in [w / 10.0, -w / 10.0] {
            let at = c + DVec3::new(0.0, dy, 0.0);
            wall = kernel.union(&wall, &place(kernel, &reinforcement, at, level)?)?;
            let pocket = place(kernel, &empty, at + DVec3::X * CUT_OVERLAP, level)?;
            wall = kernel.subtract(&wall, &pocket)?;
        }
        tracing::debug!("battery wall: pegs and magnets added");
        Ok(wall)
    }
}
