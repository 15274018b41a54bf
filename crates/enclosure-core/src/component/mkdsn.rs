use enclosure_cad::{CadKernel, CadResult, Contour, ExtrudeOptions, Plane, Sketch, Solid};
use glam::{DVec2, DVec3};

/// Screw terminal blocks along the board edges
///
/// The three terminals are reached from above through slotted screw holes
/// and from the sides through rectangular wire openings in the wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mkdsn {
    board_size: DVec3,
    clearance_xy: f64,
}

impl Mkdsn {
    const SLOT_LENGTH: f64 = 10.0;
    const SLOT_WIDTH: f64 = 5.0;
    const OPENING: DVec3 = DVec3::new(10.0, 10.0, 5.2);

    pub fn new(board_size: DVec3, clearance_xy: f64) -> Self {
        Self {
            board_size,
            clearance_xy,
        }
    }

    /// Screw access points, board centered at the origin
    pub fn screw_centers(&self) -> [DVec2; 3] {
        let b = self.board_size;
        let c = self.clearance_xy;
        [
            DVec2::new(b.x / 2.0 - 3.55, b.y / 2.0 - 13.5),
            DVec2::new(b.x / 2.0 - 3.55, (b.y + c) / 2.0 - 30.2),
            DVec2::new(-(b.x + c) / 2.0 + 2.5, (b.y + c) / 2.0 - 15.2),
        ]
    }

    /// Slotted screw holes, long side along Y
    pub fn sketch(&self) -> Sketch {
        self.screw_centers()
            .into_iter()
            .map(|p| {
                Contour::slot(DVec2::ZERO, Self::SLOT_LENGTH, Self::SLOT_WIDTH)
                    .rotated(90.0)
                    .translated(p)
            })
            .collect()
    }

    /// Screw holes through a lid whose underside is at `z`
    pub fn hole_upwards(&self, kernel: &dyn CadKernel, z: f64) -> CadResult<Solid> {
        kernel.extrude(
            &self.sketch(),
            &Plane::offset_xy(z),
            super::UPWARD_DEPTH,
            ExtrudeOptions::both(),
        )
    }

    /// Wire openings through the side walls, resting on `floor_z`
    pub fn hole_outwards(&self, kernel: &dyn CadKernel, floor_z: f64) -> CadResult<Solid> {
        let [p1, p2, p3] = self.screw_centers();
        let half = self.board_size.x / 2.0;
        let z = floor_z + Self::OPENING.z / 2.0;
        let openings = [
            DVec3::new(half, p1.y, z),
            DVec3::new(half, p2.y, z),
            DVec3::new(-half, p3.y, z),
        ]
        .into_iter()
        .map(|center| kernel.make_box(center, Self::OPENING))
        .collect::<CadResult<Vec<_>>>()?;
        kernel.union_all(&openings)
    }
}
