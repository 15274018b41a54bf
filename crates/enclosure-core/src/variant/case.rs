use enclosure_cad::{CadKernel, ExtrudeOptions, Join, Plane, Solid, Transform};
use glam::{DVec2, DVec3};

use super::Enclosure;
use crate::CUT_OVERLAP;
use crate::anchor::{Extreme, FaceAnchor, extreme_face};
use crate::component::{Board, Connector, Encoder, Lcd, Led, Magnet, Mkdsn, Plug, Zif, place};
use crate::config::{BoxConfig, FilletKind, Side};
use crate::error::{BoxResult, ConfigError};
use crate::parametric_box::ParametricBox;

/// Case around the GM328A tester board
///
/// The lid carries the display, encoder, LED and terminal openings plus a
/// flange around the ZIF socket; the wall and base carry the pockets the
/// battery box pegs and magnets engage with.
#[derive(Debug, Clone)]
pub struct Gm328aCase {
    base: ParametricBox,
    board: Board,
    zif: Zif,
}

impl Gm328aCase {
    /// Depth of the flange hanging around the ZIF socket
    pub const INTERNAL_FLANGE_HEIGHT: f64 = 10.0;

    /// Outer radius of the board fixing posts
    const FIXER_RADIUS: f64 = 2.65;

    /// Screw bore through the fixing posts
    const FIXER_BORE: f64 = 1.5;

    pub fn new(config: BoxConfig) -> Result<Self, ConfigError> {
        let base = ParametricBox::new(config)?;
        let cfg = base.config();
        let b = Board::SIZE;
        let zif = Zif::new(
            DVec3::new(
                b.x / 2.0 - 14.5,
                b.y / 2.0 + cfg.clearance.y,
                cfg.dim_bottom.z + cfg.clearance.z + Board::SOLDER + b.z,
            ),
            cfg.edge_top.y,
        );
        Ok(Self {
            base,
            board: Board,
            zif,
        })
    }

    pub fn zif(&self) -> &Zif {
        &self.zif
    }

    /// Underside of the lid
    fn lid_z(&self) -> f64 {
        self.base.height() - self.base.config().dim_top.z
    }

    fn mkdsn(&self) -> Mkdsn {
        Mkdsn::new(Board::SIZE, self.base.config().clearance.x)
    }

    fn plug(&self) -> Plug {
        Plug::new(DVec3::new(
            8.15,
            -Board::SIZE.y / 2.0,
            self.base.config().dim_bottom.z + Board::SOLDER + Board::SIZE.z,
        ))
    }

    /// Band hanging from the lid around the ZIF socket, open towards the
    /// socket lever
    pub fn internal_flange(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let cfg = self.base.config();
        let h = Self::INTERNAL_FLANGE_HEIGHT;
        let bottom = self.lid_z() + cfg.clearance.z - h;
        let edge = DVec2::new(0.0, Board::SIZE.y / 2.0);

        let mut pieces = Vec::new();
        for contour in self.zif.contours() {
            let grown = contour.offset(cfg.flange_width_top / 2.0, Join::Arc)?;
            if let Some(clipped) = grown.clip_half_plane(edge, DVec2::NEG_Y) {
                pieces.push(kernel.make_prism(&clipped, &Plane::offset_xy(bottom), h)?);
            }
        }
        let band = kernel.union_all(&pieces)?;
        let socket = kernel.extrude(
            &self.zif.sketch(),
            &Plane::offset_xy(bottom - CUT_OVERLAP),
            h + 2.0 * CUT_OVERLAP,
            ExtrudeOptions::default(),
        )?;
        Ok(kernel.subtract(&band, &socket)?)
    }

    /// Lid cutters for the parts reachable from above
    fn lid_openings(&self, kernel: &dyn CadKernel) -> BoxResult<Vec<Solid>> {
        let b = Board::SIZE;
        let z = self.lid_z();
        let clearance = self.base.config().clearance;
        let lcd = Lcd::new(DVec3::new(-b.x / 2.0 + 6.9, -b.y / 2.0 + 8.95, z), clearance);
        let encoder = Encoder::new(DVec3::new(b.x / 2.0 - 2.5, -b.y / 2.0 + 3.5, z));
        let led = Led::new(DVec3::new(-b.x / 2.0 + 3.0, -b.y / 2.0 + 6.5, z));
        Ok(vec![
            lcd.hole_upwards(kernel)?,
            encoder.hole_upwards(kernel)?,
            led.hole_upwards(kernel)?,
            self.mkdsn().hole_upwards(kernel, z)?,
            self.zif.hole_outwards(kernel)?,
            self.plug().hole(kernel)?,
        ])
    }

    /// Phase 2: the outer -X face of the plain wall
    pub fn wall_anchor(&self, kernel: &dyn CadKernel, wall: &Solid) -> BoxResult<FaceAnchor> {
        extreme_face(kernel, wall, DVec3::X, Extreme::Min)
    }

    /// Phase 2: point on the base underside matching the wall anchor
    pub fn bottom_anchor(
        &self,
        kernel: &dyn CadKernel,
        bottom: &Solid,
        wall_anchor: &FaceAnchor,
    ) -> BoxResult<DVec3> {
        let face = extreme_face(kernel, bottom, DVec3::Z, Extreme::Min)?;
        let anchor = DVec3::new(
            face.min.x + wall_anchor.height / 2.0,
            face.center.y,
            face.center.z,
        );
        tracing::debug!("bottom anchor at {anchor}");
        Ok(anchor)
    }

    /// The board at its mounting height
    pub fn board_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let z = self.base.config().dim_wall.x + Board::SOLDER + Board::SIZE.z / 2.0;
        let board = self.board.solid(kernel)?;
        Ok(kernel.transform(&board, &Transform::translation(DVec3::new(0.0, 0.0, z)))?)
    }
}

impl Enclosure for Gm328aCase {
    fn name(&self) -> &str {
        "gm328a case"
    }

    fn parametric_box(&self) -> &ParametricBox {
        &self.base
    }

    fn top_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let shell = self.base.top_shell_solid(kernel)?;
        let mut top = kernel.union(&shell, &self.internal_flange(kernel)?)?;
        for opening in self.lid_openings(kernel)? {
            top = kernel.subtract(&top, &opening)?;
        }
        self.base.place(kernel, top, Side::Top)
    }

    fn bottom_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let cfg = self.base.config();
        let mut bottom = self.base.bottom_shell_solid(kernel)?;
        let wall = self.base.wall_solid(kernel)?;
        let anchor = self.wall_anchor(kernel, &wall)?;
        let c = self.bottom_anchor(kernel, &bottom, &anchor)?;
        let (h, w) = (anchor.height, anchor.width);
        let upright = Transform::rotation_deg(0.0, -90.0, 0.0);

        let hex = Connector::hex();
        let reinforcement = hex.reinforcement(kernel)?;
        let empty = hex.empty(kernel)?;
        let spots = [
            DVec2::new(h / 6.0, -w / 2.0 + 5.0),
            DVec2::new(-h / 8.0, 0.0),
            DVec2::new(h / 6.0, w / 2.0 - 5.0),
        ];
        for spot in spots {
            let at = c + spot.extend(0.0);
            let boss = place(
                kernel,
                &reinforcement,
                at + DVec3::Z * hex.length_reinforcement(),
                upright,
            )?;
            bottom = kernel.union(&bottom, &boss)?;
            let pocket = place(
                kernel,
                &empty,
                at + DVec3::Z * (hex.length_empty() - CUT_OVERLAP),
                upright,
            )?;
            bottom = kernel.subtract(&bottom, &pocket)?;
        }

        let magnet = Magnet::square();
        let reinforcement = magnet.reinforcement(kernel)?;
        let empty = magnet.empty(kernel)?;
        for dy in [w / 10.0, -w / 10.0] {
            let at = c + DVec3::new(0.0, dy, 0.0);
            let boss = place(
                kernel,
                &reinforcement,
                at + DVec3::Z * magnet.pad.length_reinforcement(),
                upright,
            )?;
            bottom = kernel.union(&bottom, &boss)?;
            let pocket = place(
                kernel,
                &empty,
                at + DVec3::Z * (magnet.pad.length_empty() - CUT_OVERLAP),
                upright,
            )?;
            bottom = kernel.subtract(&bottom, &pocket)?;
        }

        let z = cfg.dim_bottom.z - cfg.clearance.z;
        let fh = cfg.flange_height_bottom;
        for hole in self.board.hole_centers() {
            let post = kernel.make_cylinder(hole.extend(z), Self::FIXER_RADIUS, fh)?;
            bottom = kernel.union(&bottom, &post)?;
            let bore = kernel.make_cylinder(
                hole.extend(z - CUT_OVERLAP),
                Self::FIXER_BORE,
                fh + 2.0 * CUT_OVERLAP,
            )?;
            bottom = kernel.subtract(&bottom, &bore)?;
        }
        tracing::debug!("case base: pads and board fixers added");
        self.base.place(kernel, bottom, Side::Bottom)
    }

    fn wall_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let cfg = self.base.config();
        let mut wall = self.base.wall_solid(kernel)?;
        let anchor = self.wall_anchor(kernel, &wall)?;
        let c = anchor.center;
        let (h, w) = (anchor.height, anchor.width);
        let level = Transform::default();

        let hex = Connector::hex();
        let reinforcement = hex.reinforcement(kernel)?;
        let empty = hex.empty(kernel)?;
        let spots = [
            DVec2::new(-w / 2.0 + 5.0, -h / 6.0),
            DVec2::new(0.0, h / 8.0),
            DVec2::new(w / 2.0 - 5.0, -h / 6.0),
        ];
        for spot in spots {
            let at = c + DVec3::new(0.0, spot.x, spot.y);
            let boss = place(
                kernel,
                &reinforcement,
                at + DVec3::X * hex.length_reinforcement(),
                level,
            )?;
            wall = kernel.union(&wall, &boss)?;
        }
        for spot in spots {
            let at = c + DVec3::new(0.0, spot.x, spot.y);
            let pocket = place(
                kernel,
                &empty,
                at + DVec3::X * (hex.length_empty() - CUT_OVERLAP),
                level,
            )?;
            wall = kernel.subtract(&wall, &pocket)?;
        }

        let magnet = Magnet::square();
        let reinforcement = magnet.reinforcement(kernel)?;
        let empty = magnet.empty(kernel)?;
        for dy in [w / 10.0, -w / 10.0] {
            let at = c + DVec3::new(0.0, dy, 0.0);
            let boss = place(
                kernel,
                &reinforcement,
                at + DVec3::X * magnet.pad.length_reinforcement(),
                level,
            )?;
            wall = kernel.union(&wall, &boss)?;
            let pocket = place(
                kernel,
                &empty,
                at + DVec3::X * (magnet.pad.length_empty() - CUT_OVERLAP),
                level,
            )?;
            wall = kernel.subtract(&wall, &pocket)?;
        }

        let floor = cfg.dim_bottom.z + cfg.clearance.z + Board::SOLDER + Board::SIZE.z;
        for cutter in [
            self.zif.hole_outwards(kernel)?,
            self.plug().hole(kernel)?,
            self.mkdsn().hole_outwards(kernel, floor)?,
        ] {
            wall = kernel.subtract(&wall, &cutter)?;
        }
        tracing::debug!("case wall: pads and side openings cut");
        Ok(wall)
    }

    fn top_fillet_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let (fillet, _) = self.base.fillet_solid(kernel, Side::Top, FilletKind::LidLock)?;
        let fillet = kernel.subtract(&fillet, &self.zif.hole_outwards(kernel)?)?;
        self.base.place(kernel, fillet, Side::Top)
    }
}
