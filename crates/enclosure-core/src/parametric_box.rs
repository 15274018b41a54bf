//! Parametric two-part box
//!
//! [`ParametricBox`] derives every part of the enclosure from a validated
//! [`BoxConfig`]: the lid (top), the base (bottom), the wall between them,
//! the flanges guiding lid and base into the wall, the snap bumps and
//! notches holding them there, and the independent fillet parts.
//!
//! Nothing is cached. Every `*_solid` call rebuilds its geometry through
//! the kernel, so repeated calls give identical solids.
//!
//! Z levels, with `H` the total height, `db`/`dt` the base and lid
//! thicknesses and `c` the vertical clearance:
//!
//! ```text
//! H            lid top
//! H - dt       lid underside, top of the wall band (minus c)
//! db           base top, bottom of the wall band (plus c)
//! 0            base underside
//! ```

use enclosure_cad::{
    CadKernel, Contour, ExtrudeOptions, Join, Path, Plane, Region, Sketch, Solid, Transform,
    face_x_dir,
};
use glam::{DVec2, DVec3};

use crate::CUT_OVERLAP;
use crate::anchor::{Extreme, extreme_edges, extreme_face, face_at};
use crate::config::{BaseType, BoxConfig, CornersType, FilletKind, FilletType, Side, SnapType};
use crate::error::{BoxError, BoxResult, ConfigError};
use crate::fillet::ParametricFillet;

/// Release slot cut through the outer base band, in face coordinates
const SLOT_PROFILE: [[f64; 2]; 5] = [
    [0.0, 0.0],
    [2.75, 0.0],
    [4.45, 1.7],
    [-4.45, 1.7],
    [-2.75, 0.0],
];

/// Distance from the top of the base band down to the slot
const SLOT_DROP: f64 = 0.85;

/// Horizontal axis a pair of snaps faces along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapAxis {
    X,
    Y,
}

impl SnapAxis {
    pub fn normal(self) -> DVec3 {
        match self {
            Self::X => DVec3::X,
            Self::Y => DVec3::Y,
        }
    }

    fn pick(self, v: DVec2) -> f64 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
        }
    }
}

/// The four nested wall outlines
#[derive(Debug, Clone, PartialEq)]
pub struct WallSketch {
    pub external: Contour,
    /// Inside of the wall body
    pub internal: Contour,
    /// Inside of the band receiving the lid
    pub internal_top: Contour,
    /// Inside of the band receiving the base
    pub internal_bottom: Contour,
}

impl WallSketch {
    fn ring(&self, hole: &Contour) -> Sketch {
        Sketch::from(Region {
            outer: self.external.clone(),
            holes: vec![hole.clone()],
        })
    }
}

fn inset(contour: &Contour, distance: f64) -> BoxResult<Contour> {
    Ok(contour.offset(-distance, Join::Arc)?)
}

fn ring(outer: Contour, width: f64) -> BoxResult<Region> {
    let hole = inset(&outer, width)?;
    Ok(Region {
        outer,
        holes: vec![hole],
    })
}

fn loft_at(
    kernel: &dyn CadKernel,
    sections: impl IntoIterator<Item = (Sketch, f64)>,
) -> BoxResult<Solid> {
    let sections: Vec<(Sketch, Plane)> = sections
        .into_iter()
        .map(|(sketch, z)| (sketch, Plane::offset_xy(z)))
        .collect();
    Ok(kernel.loft(&sections, true)?)
}

/// A lid, base and wall derived from one configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricBox {
    config: BoxConfig,
    height: f64,
}

impl ParametricBox {
    /// Validate `config` and fix the total height
    pub fn new(config: BoxConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let height = config.height();
        tracing::debug!("parametric box {} high", height);
        Ok(Self { config, height })
    }

    pub fn config(&self) -> &BoxConfig {
        &self.config
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    fn corners(&self, contour: Contour, size: f64) -> BoxResult<Contour> {
        Ok(match self.config.corners_type {
            CornersType::Straight => contour,
            CornersType::Fillet => contour.fillet_corners(size)?,
            CornersType::Chamfer => contour.chamfer_corners(size)?,
        })
    }

    /// Outline of a shell, shrunk to leave room for an independent fillet
    fn shell_sketch(
        &self,
        dim: DVec3,
        fillet_type: FilletType,
        fillet_dim: DVec3,
    ) -> BoxResult<Contour> {
        let c = self.config.clearance;
        let size = if fillet_type.is_independent() {
            DVec2::new(
                dim.x - 2.0 * (fillet_dim.x + c.x),
                dim.y - 2.0 * (fillet_dim.y + c.y),
            )
        } else {
            dim.truncate()
        };
        self.corners(
            Contour::rectangle(DVec2::ZERO, size.x, size.y),
            self.config.corners_size,
        )
    }

    pub fn top_sketch(&self) -> BoxResult<Contour> {
        let cfg = &self.config;
        self.shell_sketch(cfg.dim_top, cfg.fillet_type_top, cfg.fillet_dim_top)
    }

    /// Base outline; a fused base always covers the full footprint
    pub fn bottom_sketch(&self) -> BoxResult<Contour> {
        let cfg = &self.config;
        let fillet_type = match cfg.base_type {
            BaseType::Fused => FilletType::None,
            BaseType::Detachable => cfg.fillet_type_bottom,
        };
        self.shell_sketch(cfg.dim_bottom, fillet_type, cfg.fillet_dim_bottom)
    }

    pub fn top_flange_sketch(&self) -> BoxResult<Region> {
        let outer = inset(&self.top_sketch()?, self.config.edge_top.x)?;
        ring(outer, self.config.flange_width_top)
    }

    pub fn bottom_flange_sketch(&self) -> BoxResult<Region> {
        let outer = inset(&self.bottom_sketch()?, self.config.edge_bottom.x)?;
        ring(outer, self.config.flange_width_bottom)
    }

    /// Axes along which the snaps of `side` face
    pub fn snap_axes(&self, side: Side) -> Vec<SnapAxis> {
        let (snap, dim) = match side {
            Side::Top => (self.config.snap_top, self.config.dim_top),
            Side::Bottom => (self.config.snap_bottom, self.config.dim_bottom),
        };
        match snap {
            SnapType::None => Vec::new(),
            SnapType::ShortSide if dim.x < dim.y => vec![SnapAxis::Y],
            SnapType::ShortSide => vec![SnapAxis::X],
            SnapType::LongSide if dim.x > dim.y => vec![SnapAxis::Y],
            SnapType::LongSide => vec![SnapAxis::X],
            SnapType::Both => vec![SnapAxis::X, SnapAxis::Y],
        }
    }

    /// Axis of the single release slot in a detachable base. With snaps on
    /// both axes the slot goes into the Y faces unless the base is square.
    fn slot_axis(&self, axes: &[SnapAxis]) -> Option<SnapAxis> {
        match axes {
            [] => None,
            [axis] => Some(*axis),
            _ if self.config.dim_bottom.x == self.config.dim_bottom.y => Some(SnapAxis::X),
            _ => Some(SnapAxis::Y),
        }
    }

    fn flange_height(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.config.flange_height_top,
            Side::Bottom => self.config.flange_height_bottom,
        }
    }

    /// Height of the snap centers of `side`
    pub fn snap_z(&self, side: Side) -> f64 {
        let cfg = &self.config;
        let fh = self.flange_height(side);
        match side {
            Side::Top => self.height - (cfg.dim_top.z + fh - cfg.clearance.z - fh / 8.0),
            Side::Bottom => cfg.dim_bottom.z + fh - cfg.clearance.z - fh / 8.0,
        }
    }

    /// Near and far sections of a snap, in the coordinates of the face it
    /// sits on
    pub fn snap_sketch(&self, side: Side, axis: SnapAxis) -> (Contour, Contour) {
        let dim = match side {
            Side::Top => self.config.dim_top,
            Side::Bottom => self.config.dim_bottom,
        };
        let length = match axis {
            SnapAxis::X => dim.y,
            SnapAxis::Y => dim.x,
        };
        let fh = self.flange_height(side);
        (
            Contour::rectangle(DVec2::ZERO, length / 2.0, fh / 4.0),
            Contour::rectangle(DVec2::ZERO, length / 2.0 - fh / 8.0, 0.01),
        )
    }

    /// Snap wedge growing from `plane` along its normal
    pub fn snap_solid(
        &self,
        kernel: &dyn CadKernel,
        side: Side,
        axis: SnapAxis,
        plane: &Plane,
    ) -> BoxResult<Solid> {
        let (near, far) = self.snap_sketch(side, axis);
        let depth = self.flange_height(side) / 8.0;
        Ok(kernel.loft(
            &[
                (Sketch::from(near), *plane),
                (Sketch::from(far), plane.offset(depth)),
            ],
            true,
        )?)
    }

    pub fn wall_sketch(&self) -> BoxResult<WallSketch> {
        let cfg = &self.config;
        let w = cfg.dim_wall.x;
        let external = self.corners(
            Contour::rectangle(DVec2::ZERO, cfg.dim_bottom.x, cfg.dim_bottom.y),
            cfg.corners_size + w,
        )?;
        Ok(WallSketch {
            internal: inset(&external, w)?,
            internal_top: inset(&external, w + cfg.edge_top.x)?,
            internal_bottom: inset(&external, w + cfg.edge_bottom.x)?,
            external,
        })
    }

    /// Thin ring along the middle of the wall, base of the fillet snap ribs
    pub fn fillet_snap_sketch(&self) -> BoxResult<Region> {
        let w = self.config.dim_wall.x;
        let external = self.wall_sketch()?.external;
        Ok(Region {
            outer: inset(&external, w / 2.0)?,
            holes: vec![inset(&external, 3.0 * w / 4.0)?],
        })
    }

    pub fn fillet_path(&self, side: Side) -> BoxResult<Path> {
        ParametricFillet::new(self, side, FilletKind::LidLock).path()
    }

    /// Independent fillet part and the section it was swept from
    pub fn fillet_solid(
        &self,
        kernel: &dyn CadKernel,
        side: Side,
        kind: FilletKind,
    ) -> BoxResult<(Solid, Vec<DVec3>)> {
        ParametricFillet::new(self, side, kind).solid(kernel)
    }

    /// Cut a notch into both extreme faces of `flange` for every snap axis
    fn notch_flange(
        &self,
        kernel: &dyn CadKernel,
        flange: Solid,
        side: Side,
    ) -> BoxResult<Solid> {
        let z = self.snap_z(side);
        let mut result = flange.clone();
        for axis in self.snap_axes(side) {
            for extreme in [Extreme::Min, Extreme::Max] {
                let face = extreme_face(kernel, &flange, axis.normal(), extreme)?;
                let p = DVec3::new(face.center.x, face.center.y, z);
                let plane = Plane::new(
                    p + face.normal * CUT_OVERLAP,
                    face_x_dir(face.normal),
                    -face.normal,
                );
                let notch = self.snap_solid(kernel, side, axis, &plane)?;
                result = kernel.subtract(&result, &notch)?;
            }
        }
        Ok(result)
    }

    pub fn top_flange_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let cfg = &self.config;
        let fh = cfg.flange_height_top;
        let base = self.height - cfg.dim_top.z + cfg.clearance.z - fh;
        let flange = kernel.extrude(
            &Sketch::from(self.top_flange_sketch()?),
            &Plane::offset_xy(base),
            fh,
            ExtrudeOptions::default(),
        )?;
        self.notch_flange(kernel, flange, Side::Top)
    }

    pub fn bottom_flange_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let cfg = &self.config;
        let flange = kernel.extrude(
            &Sketch::from(self.bottom_flange_sketch()?),
            &Plane::offset_xy(cfg.dim_bottom.z - cfg.clearance.z),
            cfg.flange_height_bottom,
            ExtrudeOptions::default(),
        )?;
        self.notch_flange(kernel, flange, Side::Bottom)
    }

    /// Round or bevel the outer edge loop of a shell when the fillet is
    /// integrated
    fn treat_edges(
        &self,
        kernel: &dyn CadKernel,
        shell: Solid,
        fillet_type: FilletType,
        size: f64,
        extreme: Extreme,
    ) -> BoxResult<Solid> {
        Ok(match fillet_type {
            FilletType::IntegratedFillet => {
                kernel.fillet(&shell, &extreme_edges(kernel, &shell, extreme)?, size)?
            }
            FilletType::IntegratedChamfer => {
                kernel.chamfer(&shell, &extreme_edges(kernel, &shell, extreme)?, size)?
            }
            _ => shell,
        })
    }

    /// Lid at its design position, flange and snap notches included
    pub fn top_shell_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let cfg = &self.config;
        let h = self.height;
        let lip = cfg.edge_top.z - cfg.clearance.z;
        let outer = self.top_sketch()?;
        let step = inset(&outer, cfg.edge_top.x)?;
        let sections = if lip > 0.0 && cfg.edge_top.x > 0.0 {
            vec![
                (Sketch::from(step.clone()), h - cfg.dim_top.z),
                (Sketch::from(step), h - lip),
                (Sketch::from(outer.clone()), h - lip),
                (Sketch::from(outer), h),
            ]
        } else {
            vec![
                (Sketch::from(step.clone()), h - cfg.dim_top.z),
                (Sketch::from(step), h),
            ]
        };
        let shell = loft_at(kernel, sections)?;
        let shell = self.treat_edges(
            kernel,
            shell,
            cfg.fillet_type_top,
            cfg.fillet_size_top,
            Extreme::Max,
        )?;
        let solid = kernel.union(&shell, &self.top_flange_solid(kernel)?)?;
        tracing::debug!("top shell built");
        Ok(solid)
    }

    /// Base at its design position; a fused base carries the wall
    pub fn bottom_shell_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let cfg = &self.config;
        let lip = cfg.edge_bottom.z - cfg.clearance.z;
        let outer = self.bottom_sketch()?;
        let step = inset(&outer, cfg.edge_bottom.x)?;
        let sections = if lip > 0.0 && cfg.edge_bottom.x > 0.0 {
            vec![
                (Sketch::from(outer.clone()), 0.0),
                (Sketch::from(outer), lip),
                (Sketch::from(step.clone()), lip),
                (Sketch::from(step), cfg.dim_bottom.z),
            ]
        } else {
            vec![
                (Sketch::from(step.clone()), 0.0),
                (Sketch::from(step), cfg.dim_bottom.z),
            ]
        };
        let shell = loft_at(kernel, sections)?;
        let shell = self.treat_edges(
            kernel,
            shell,
            cfg.fillet_type_bottom,
            cfg.fillet_size_bottom,
            Extreme::Min,
        )?;
        let addition = match cfg.base_type {
            BaseType::Fused => self.wall_solid_with(kernel, true, false)?,
            BaseType::Detachable => self.bottom_flange_solid(kernel)?,
        };
        let solid = kernel.union(&shell, &addition)?;
        tracing::debug!("bottom shell built ({:?} base)", cfg.base_type);
        Ok(solid)
    }

    /// Move a part of `side` to its configured position
    pub fn place(&self, kernel: &dyn CadKernel, solid: Solid, side: Side) -> BoxResult<Solid> {
        let position = match side {
            Side::Top => self.config.pos_top,
            Side::Bottom => self.config.pos_bottom,
        };
        if position == DVec3::ZERO {
            return Ok(solid);
        }
        Ok(kernel.transform(&solid, &Transform::translation(position))?)
    }

    pub fn top_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let shell = self.top_shell_solid(kernel)?;
        self.place(kernel, shell, Side::Top)
    }

    pub fn bottom_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let shell = self.bottom_shell_solid(kernel)?;
        self.place(kernel, shell, Side::Bottom)
    }

    pub fn wall_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        self.wall_solid_with(kernel, true, true)
    }

    /// Wall between lid and base. A wider band leaves the vertical
    /// clearance between the wall and the shell it receives.
    pub fn wall_solid_with(
        &self,
        kernel: &dyn CadKernel,
        wider_top: bool,
        wider_bottom: bool,
    ) -> BoxResult<Solid> {
        let cfg = &self.config;
        let (db, dt) = (cfg.dim_bottom.z, cfg.dim_top.z);
        let cbase = if wider_bottom { cfg.clearance.z } else { 0.0 };
        let ctop = if wider_top { cfg.clearance.z } else { 0.0 };
        let body = self.height - 3.5 * (db + dt) - cbase - ctop;
        if body <= 0.0 {
            return Err(BoxError::DegenerateWall { length: body });
        }

        let sketch = self.wall_sketch()?;
        let z0 = db + cbase;
        let z1 = z0 + 2.0 * db;
        let z2 = z1 + db / 2.0;
        let z3 = z2 + body;
        let z4 = z3 + dt / 2.0;
        let z5 = z4 + 2.0 * dt;
        let mut wall = loft_at(
            kernel,
            [
                (sketch.ring(&sketch.internal_bottom), z0),
                (sketch.ring(&sketch.internal_bottom), z1),
                (sketch.ring(&sketch.internal), z2),
                (sketch.ring(&sketch.internal), z3),
                (sketch.ring(&sketch.internal_top), z4),
                (sketch.ring(&sketch.internal_top), z5),
            ],
        )?;

        if cfg.fillet_snap_top || cfg.fillet_snap_bottom {
            let ribs = Sketch::from(self.fillet_snap_sketch()?);
            let rib = cfg.dim_wall.x / 8.0;
            for (enabled, z, amount) in [
                (cfg.fillet_snap_top, z5, rib),
                (cfg.fillet_snap_bottom, z0, -rib),
            ] {
                if enabled {
                    let solid = kernel.extrude(
                        &ribs,
                        &Plane::offset_xy(z),
                        amount,
                        ExtrudeOptions::taper(45.0),
                    )?;
                    wall = kernel.union(&wall, &solid)?;
                }
            }
        }

        let (top_min, top_max) = sketch.internal_top.bounds();
        for axis in self.snap_axes(Side::Top) {
            for coordinate in [axis.pick(top_min), axis.pick(top_max)] {
                wall = self.add_bump(kernel, wall, Side::Top, axis, coordinate)?;
            }
        }

        if cfg.base_type == BaseType::Detachable {
            let (bottom_min, bottom_max) = sketch.internal_bottom.bounds();
            let axes = self.snap_axes(Side::Bottom);
            for &axis in &axes {
                for coordinate in [axis.pick(bottom_min), axis.pick(bottom_max)] {
                    wall = self.add_bump(kernel, wall, Side::Bottom, axis, coordinate)?;
                }
            }
            let slot = Contour::polygon(SLOT_PROFILE.iter().map(|&[x, y]| DVec2::new(x, y)))?;
            if let Some(axis) = self.slot_axis(&axes) {
                let face = extreme_face(kernel, &wall, axis.normal(), Extreme::Max)?;
                let origin = DVec3::new(face.center.x, face.center.y, z1 - SLOT_DROP)
                    + face.normal * CUT_OVERLAP;
                let plane = Plane::new(origin, face_x_dir(face.normal), -face.normal);
                let cutter =
                    kernel.make_prism(&slot, &plane, 2.0 * cfg.dim_wall.x + CUT_OVERLAP)?;
                wall = kernel.subtract(&wall, &cutter)?;
            }
        }

        tracing::debug!("wall built from {z0} to {z5}, body {body}");
        Ok(wall)
    }

    /// Snap bump on the inner band face lying at `coordinate` along `axis`
    fn add_bump(
        &self,
        kernel: &dyn CadKernel,
        wall: Solid,
        side: Side,
        axis: SnapAxis,
        coordinate: f64,
    ) -> BoxResult<Solid> {
        let face = face_at(kernel, &wall, axis.normal(), coordinate)?;
        let p = DVec3::new(face.center.x, face.center.y, self.snap_z(side));
        let plane = Plane::new(
            p - face.normal * CUT_OVERLAP,
            face_x_dir(face.normal),
            face.normal,
        );
        let bump = self.snap_solid(kernel, side, axis, &plane)?;
        Ok(kernel.union(&wall, &bump)?)
    }

    /// Independent top fillet. It always uses the lid-lock profile; the
    /// snapped one is only reachable through [`Self::fillet_solid`].
    pub fn top_fillet_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let (solid, _) = self.fillet_solid(kernel, Side::Top, FilletKind::LidLock)?;
        self.place(kernel, solid, Side::Top)
    }

    pub fn bottom_fillet_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        let (solid, _) = self.fillet_solid(kernel, Side::Bottom, FilletKind::LidLock)?;
        self.place(kernel, solid, Side::Bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use enclosure_cad::MeshKernel;

    fn config() -> BoxConfig {
        let dim = DVec3::new(60.0, 40.0, 2.0);
        BoxConfig::new(dim, dim, DVec3::new(2.0, 2.0, 20.0), DVec3::splat(0.2))
    }

    #[test]
    fn test_new_validates() {
        let mut cfg = config();
        cfg.dim_bottom.x = 61.0;
        assert!(matches!(
            ParametricBox::new(cfg),
            Err(ConfigError::MismatchedFootprint { .. })
        ));
        let b = ParametricBox::new(config()).unwrap();
        assert_abs_diff_eq!(b.height(), 24.4, epsilon = 1e-12);
    }

    #[test]
    fn test_independent_fillet_shrinks_top_sketch() {
        let independent = ParametricBox::new(config()).unwrap();
        let mut cfg = config();
        cfg.fillet_type_top = FilletType::IntegratedChamfer;
        let integrated = ParametricBox::new(cfg).unwrap();

        let small = independent.top_sketch().unwrap();
        let full = integrated.top_sketch().unwrap();
        assert!(small.area() < full.area());
        let (min, max) = small.bounds();
        assert_abs_diff_eq!(max.x - min.x, 60.0 - 4.4, epsilon = 1e-9);
        let (min, max) = full.bounds();
        assert_abs_diff_eq!(max.y - min.y, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fused_bottom_sketch_is_full() {
        let mut cfg = config();
        cfg.base_type = BaseType::Fused;
        cfg.edge_bottom = DVec3::ZERO;
        cfg.fillet_type_bottom = FilletType::None;
        let b = ParametricBox::new(cfg).unwrap();
        let (min, max) = b.bottom_sketch().unwrap().bounds();
        assert_abs_diff_eq!(max.x - min.x, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_snap_axes() {
        let mut cfg = config();
        let cases = [
            (SnapType::None, vec![]),
            (SnapType::ShortSide, vec![SnapAxis::X]),
            (SnapType::LongSide, vec![SnapAxis::Y]),
            (SnapType::Both, vec![SnapAxis::X, SnapAxis::Y]),
        ];
        for (snap, expected) in cases {
            cfg.snap_top = snap;
            let b = ParametricBox::new(cfg.clone()).unwrap();
            assert_eq!(b.snap_axes(Side::Top), expected, "{snap:?}");
        }

        // a box deeper than wide swaps the short side
        let dim = DVec3::new(40.0, 60.0, 2.0);
        let cfg = BoxConfig::new(dim, dim, DVec3::new(2.0, 2.0, 20.0), DVec3::splat(0.2));
        let b = ParametricBox::new(cfg).unwrap();
        assert_eq!(b.snap_axes(Side::Bottom), vec![SnapAxis::Y]);
    }

    #[test]
    fn test_slot_axis() {
        let b = ParametricBox::new(config()).unwrap();
        assert_eq!(b.slot_axis(&[]), None);
        assert_eq!(b.slot_axis(&[SnapAxis::X]), Some(SnapAxis::X));
        assert_eq!(b.slot_axis(&[SnapAxis::X, SnapAxis::Y]), Some(SnapAxis::Y));

        let dim = DVec3::new(50.0, 50.0, 2.0);
        let square = BoxConfig::new(dim, dim, DVec3::new(2.0, 2.0, 20.0), DVec3::splat(0.2));
        let b = ParametricBox::new(square).unwrap();
        assert_eq!(b.slot_axis(&[SnapAxis::X, SnapAxis::Y]), Some(SnapAxis::X));
    }

    #[test]
    fn test_both_snaps_cut_one_slot() {
        let kernel = MeshKernel::new();
        let volume = |snap| {
            let mut cfg = config();
            cfg.snap_top = SnapType::None;
            cfg.snap_bottom = snap;
            let b = ParametricBox::new(cfg).unwrap();
            kernel.volume(&b.wall_solid(&kernel).unwrap()).unwrap()
        };
        let none = volume(SnapType::None);
        let x = volume(SnapType::ShortSide);
        let y = volume(SnapType::LongSide);
        let both = volume(SnapType::Both);
        // bumps add up across axes; only the X slot is missing from `both`
        let x_slot = both + none - x - y;
        assert!(x_slot > 1.0, "x slot volume {x_slot}");
    }

    #[test]
    fn test_snap_sketch_and_height() {
        let b = ParametricBox::new(config()).unwrap();
        let (near, far) = b.snap_sketch(Side::Top, SnapAxis::X);
        let (min, max) = near.bounds();
        assert_abs_diff_eq!(max.x - min.x, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(max.y - min.y, 1.0, epsilon = 1e-9);
        let (min, max) = far.bounds();
        assert_abs_diff_eq!(max.x - min.x, 19.5, epsilon = 1e-9);

        assert_abs_diff_eq!(b.snap_z(Side::Top), 24.4 - 5.3, epsilon = 1e-9);
        assert_abs_diff_eq!(b.snap_z(Side::Bottom), 5.3, epsilon = 1e-9);
    }

    #[test]
    fn test_wall_sketch_offsets() {
        let mut cfg = config();
        cfg.edge_bottom = DVec3::new(0.5, 1.0, 1.0);
        let sketch = ParametricBox::new(cfg).unwrap().wall_sketch().unwrap();
        let width = |c: &Contour| {
            let (min, max) = c.bounds();
            max.x - min.x
        };
        assert_abs_diff_eq!(width(&sketch.external), 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(width(&sketch.internal), 56.0, epsilon = 1e-9);
        assert_abs_diff_eq!(width(&sketch.internal_top), 54.0, epsilon = 1e-9);
        assert_abs_diff_eq!(width(&sketch.internal_bottom), 55.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fillet_snap_sketch_is_thin_ring() {
        let b = ParametricBox::new(config()).unwrap();
        let region = b.fillet_snap_sketch().unwrap();
        assert_eq!(region.holes.len(), 1);
        let (min, max) = region.outer.bounds();
        assert_abs_diff_eq!(max.x - min.x, 58.0, epsilon = 1e-9);
        let (min, max) = region.holes[0].bounds();
        assert_abs_diff_eq!(max.x - min.x, 57.0, epsilon = 1e-9);
    }

    #[test]
    fn test_snap_notches_reduce_flange() {
        let kernel = MeshKernel::new();
        let mut cfg = config();
        cfg.snap_top = SnapType::None;
        let plain = ParametricBox::new(cfg.clone()).unwrap();
        cfg.snap_top = SnapType::Both;
        let notched = ParametricBox::new(cfg).unwrap();

        let v_plain = kernel
            .volume(&plain.top_flange_solid(&kernel).unwrap())
            .unwrap();
        let v_notched = kernel
            .volume(&notched.top_flange_solid(&kernel).unwrap())
            .unwrap();
        assert!(v_notched < v_plain);
    }

    #[test]
    fn test_top_solid_envelope() {
        let kernel = MeshKernel::new();
        let mut cfg = config();
        cfg.fillet_type_top = FilletType::None;
        let b = ParametricBox::new(cfg).unwrap();
        let bounds = kernel.bounding_box(&b.top_solid(&kernel).unwrap()).unwrap();
        assert_abs_diff_eq!(bounds.size().x, 60.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bounds.size().y, 40.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bounds.max.z, 24.4, epsilon = 1e-6);
        // flange hangs below the lid
        assert_abs_diff_eq!(bounds.min.z, 24.4 - 2.0 + 0.2 - 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_placement_moves_parts() {
        let kernel = MeshKernel::new();
        let mut cfg = config();
        cfg.pos_bottom = DVec3::new(100.0, 0.0, 0.0);
        let b = ParametricBox::new(cfg).unwrap();
        let bounds = kernel.bounding_box(&b.bottom_solid(&kernel).unwrap()).unwrap();
        assert_abs_diff_eq!(bounds.center().x, 100.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bounds.min.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_wall_levels() {
        let kernel = MeshKernel::new();
        let b = ParametricBox::new(config()).unwrap();
        let bounds = kernel.bounding_box(&b.wall_solid(&kernel).unwrap()).unwrap();
        assert_abs_diff_eq!(bounds.min.z, 2.2, epsilon = 1e-6);
        assert_abs_diff_eq!(bounds.max.z, 24.4 - 2.0 - 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(bounds.size().x, 60.0, epsilon = 1e-6);

        let tight = kernel
            .bounding_box(&b.wall_solid_with(&kernel, false, false).unwrap())
            .unwrap();
        assert_abs_diff_eq!(tight.min.z, 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(tight.max.z, 22.4, epsilon = 1e-6);
    }

    #[test]
    fn test_short_wall_is_degenerate() {
        let kernel = MeshKernel::new();
        let dim = DVec3::new(60.0, 40.0, 2.0);
        let cfg = BoxConfig::new(dim, dim, DVec3::new(2.0, 2.0, 8.0), DVec3::splat(0.2));
        let b = ParametricBox::new(cfg).unwrap();
        assert!(matches!(
            b.wall_solid(&kernel),
            Err(BoxError::DegenerateWall { .. })
        ));
    }

    #[test]
    fn test_fillet_snap_ribs() {
        let kernel = MeshKernel::new();
        let mut cfg = config();
        cfg.fillet_snap_top = true;
        cfg.fillet_snap_bottom = true;
        let b = ParametricBox::new(cfg).unwrap();
        let bounds = kernel.bounding_box(&b.wall_solid(&kernel).unwrap()).unwrap();
        assert_abs_diff_eq!(bounds.max.z, 22.2 + 0.25, epsilon = 1e-4);
        assert_abs_diff_eq!(bounds.min.z, 2.2 - 0.25, epsilon = 1e-4);
    }

    #[test]
    fn test_integrated_chamfer_trims_lid() {
        let kernel = MeshKernel::new();
        let mut cfg = config();
        cfg.fillet_type_top = FilletType::None;
        let square = ParametricBox::new(cfg.clone()).unwrap();
        cfg.fillet_type_top = FilletType::IntegratedChamfer;
        let chamfered = ParametricBox::new(cfg).unwrap();
        let v_square = kernel.volume(&square.top_solid(&kernel).unwrap()).unwrap();
        let v_chamfer = kernel
            .volume(&chamfered.top_solid(&kernel).unwrap())
            .unwrap();
        assert!(v_chamfer < v_square);
    }
}
