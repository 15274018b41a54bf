//! Closed polygonal contours
//!
//! Curves (arcs, circles, slot ends) are approximated by polylines. Every
//! contour is stored counter-clockwise, and corner treatments and offsets keep
//! the starting edge in place so rails derived from a contour start at a
//! predictable point.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use csgrs::traits::CSG;
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use super::Region;
use crate::kernel::{CadError, CadResult};
use crate::path::Segment;

pub(crate) type CsgSketch = csgrs::sketch::Sketch<()>;

/// Segments used for a quarter circle of an arc approximation
pub const ARC_SEGMENTS_PER_QUARTER: usize = 8;

/// Segments used for a full circle
pub const CIRCLE_SEGMENTS: usize = 4 * ARC_SEGMENTS_PER_QUARTER;

const EPS: f64 = 1e-9;

/// How convex corners are joined when a contour grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Join {
    /// Corners are rounded with an arc of the offset distance
    #[default]
    Arc,
    /// Edges are extended until they intersect
    Miter,
}

/// A closed, counter-clockwise polygon in the sketch plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    points: Vec<DVec2>,
}

impl Contour {
    /// Build a contour from arbitrary points.
    ///
    /// A repeated closing point is dropped and clockwise input is reversed
    /// (keeping the first point first).
    pub fn polygon(points: impl IntoIterator<Item = DVec2>) -> CadResult<Self> {
        let mut points = dedup_closed(points.into_iter().collect());
        if points.len() < 3 {
            return Err(CadError::InvalidProfile(format!(
                "a contour needs at least 3 distinct points, got {}",
                points.len()
            )));
        }
        let area = signed_area(&points);
        if area.abs() < EPS {
            return Err(CadError::InvalidProfile("contour has zero area".into()));
        }
        if area < 0.0 {
            points[1..].reverse();
        }
        Ok(Self { points })
    }

    /// Axis-aligned rectangle. The first edge is the +X side traversed towards +Y.
    pub fn rectangle(center: DVec2, width: f64, height: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self {
            points: vec![
                center + DVec2::new(hw, -hh),
                center + DVec2::new(hw, hh),
                center + DVec2::new(-hw, hh),
                center + DVec2::new(-hw, -hh),
            ],
        }
    }

    /// Circle approximated by [`CIRCLE_SEGMENTS`] segments, starting on +X
    pub fn circle(center: DVec2, radius: f64) -> Self {
        let points = (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = TAU * i as f64 / CIRCLE_SEGMENTS as f64;
                center + DVec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();
        Self { points }
    }

    /// Regular polygon with the given circumradius.
    ///
    /// Vertices sit at half-step angles so one flat side faces +X; a square
    /// comes out axis-aligned.
    pub fn regular_polygon(center: DVec2, radius: f64, sides: usize) -> Self {
        let sides = sides.max(3);
        let step = TAU / sides as f64;
        let points = (0..sides)
            .map(|i| {
                let angle = step * i as f64 - step / 2.0;
                center + DVec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();
        Self { points }
    }

    /// Stadium shape along X with the given overall length and width
    pub fn slot(center: DVec2, overall_length: f64, width: f64) -> Self {
        let r = width / 2.0;
        let half_straight = ((overall_length - width) / 2.0).max(0.0);
        let n = 2 * ARC_SEGMENTS_PER_QUARTER;
        let mut points = Vec::with_capacity(2 * (n + 1));
        for (cx, start) in [(half_straight, -FRAC_PI_2), (-half_straight, FRAC_PI_2)] {
            for k in 0..=n {
                let angle = start + PI * k as f64 / n as f64;
                points.push(center + DVec2::new(cx + r * angle.cos(), r * angle.sin()));
            }
        }
        Self {
            points: dedup_closed(points),
        }
    }

    /// Vertices in counter-clockwise order
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed contour
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area
    pub fn area(&self) -> f64 {
        signed_area(&self.points).abs()
    }

    /// Area centroid
    pub fn centroid(&self) -> DVec2 {
        let mut acc = DVec2::ZERO;
        let mut area = 0.0;
        for (a, b) in self.segments() {
            let cross = a.perp_dot(b);
            area += cross;
            acc += (a + b) * cross;
        }
        if area.abs() < EPS {
            return self.points.iter().copied().sum::<DVec2>() / self.points.len() as f64;
        }
        acc / (3.0 * area)
    }

    /// Bounding rectangle as (min, max)
    pub fn bounds(&self) -> (DVec2, DVec2) {
        self.points.iter().fold(
            (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        )
    }

    /// True when no vertex turns clockwise
    pub fn is_convex(&self) -> bool {
        let n = self.points.len();
        (0..n).all(|i| {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let c = self.points[(i + 2) % n];
            (b - a).perp_dot(c - b) >= -1e-9 * (b - a).length().max(1.0)
        })
    }

    /// Point containment (boundary counts as inside)
    pub fn contains(&self, p: DVec2) -> bool {
        if self.is_convex() {
            return self
                .segments()
                .all(|(a, b)| (b - a).perp_dot(p - a) >= -1e-7);
        }
        let mut inside = false;
        for (a, b) in self.segments() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Boundary segments in traversal order
    pub fn segments(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Boundary segments lifted to 3D at the given height
    pub fn edges_at(&self, z: f64) -> Vec<Segment> {
        self.segments()
            .map(|(a, b)| Segment::new(a.extend(z), b.extend(z)))
            .collect()
    }

    /// Boundary segments in the sketch plane
    pub fn edges(&self) -> Vec<Segment> {
        self.edges_at(0.0)
    }

    pub fn translated(&self, offset: DVec2) -> Self {
        Self {
            points: self.points.iter().map(|p| *p + offset).collect(),
        }
    }

    /// Rotate counter-clockwise about the origin
    pub fn rotated(&self, angle_deg: f64) -> Self {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        Self {
            points: self
                .points
                .iter()
                .map(|p| DVec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos))
                .collect(),
        }
    }

    /// Round every corner with the given radius.
    ///
    /// The result starts at the end of the first corner's arc, so its first
    /// edge is what remains of the original first edge.
    pub fn fillet_corners(&self, radius: f64) -> CadResult<Self> {
        if radius <= 0.0 {
            return Ok(self.clone());
        }
        self.treat_corners(
            |half| radius / half.tan(),
            |v, a, b, t| {
                let half = signed_angle(a, b).abs() / 2.0;
                let center = v + (a + b).normalize() * (radius / half.sin());
                let from = heading(v + a * t - center);
                let sweep = signed_angle(v + a * t - center, v + b * t - center);
                let steps = arc_steps(sweep.abs());
                (0..=steps)
                    .map(|k| center + unit(from + sweep * k as f64 / steps as f64) * radius)
                    .collect()
            },
        )
    }

    /// Cut every corner at the given distance along both edges
    pub fn chamfer_corners(&self, size: f64) -> CadResult<Self> {
        if size <= 0.0 {
            return Ok(self.clone());
        }
        self.treat_corners(|_| size, |v, a, b, t| vec![v + a * t, v + b * t])
    }

    /// Replace each corner by `corner(v, to_prev, to_next, setback)` where the
    /// setback is computed from half the corner angle.
    fn treat_corners(
        &self,
        setback: impl Fn(f64) -> f64,
        corner: impl Fn(DVec2, DVec2, DVec2, f64) -> Vec<DVec2>,
    ) -> CadResult<Self> {
        let n = self.points.len();
        let mut corners = Vec::with_capacity(n);
        for i in 0..n {
            let v = self.points[i];
            let a = (self.points[(i + n - 1) % n] - v).normalize();
            let b = (self.points[(i + 1) % n] - v).normalize();
            // straight-through vertices keep their point
            let t = if a.dot(b) < -1.0 + 1e-9 {
                0.0
            } else {
                setback(signed_angle(a, b).abs() / 2.0).max(0.0)
            };
            corners.push((v, a, b, t));
        }
        for i in 0..n {
            let j = (i + 1) % n;
            let length = (self.points[j] - self.points[i]).length();
            if corners[i].3 + corners[j].3 > length + 1e-9 {
                return Err(CadError::InvalidProfile(format!(
                    "corner treatment does not fit an edge of length {length:.4}"
                )));
            }
        }
        let mut points = Vec::new();
        let mut first_end = 0;
        for (i, (v, a, b, t)) in corners.into_iter().enumerate() {
            if t == 0.0 {
                points.push(v);
            } else {
                points.extend(corner(v, a, b, t));
            }
            if i == 0 {
                first_end = points.len() - 1;
            }
        }
        points.rotate_left(first_end);
        Ok(Self {
            points: dedup_closed(points),
        })
    }

    /// Signed offset: positive grows the contour, negative shrinks it.
    ///
    /// Convex corners are rounded ([`Join::Arc`]) or extended until the edges
    /// meet ([`Join::Miter`]). The result keeps the offset of the first vertex
    /// as its start. An offset that splits the contour or closes a hole in it
    /// is `Unsupported`.
    pub fn offset(&self, distance: f64, join: Join) -> CadResult<Self> {
        if distance == 0.0 {
            return Ok(self.clone());
        }
        let sketch = self.to_csg();
        let moved = match join {
            Join::Arc => sketch.offset_rounded(distance),
            Join::Miter => sketch.offset(distance),
        };
        let mut regions = regions_from_csg(&moved);
        let region = match regions.len() {
            0 => {
                return Err(CadError::DegenerateOffset(format!(
                    "offset by {distance} collapses the contour"
                )));
            }
            1 => regions.remove(0),
            n => {
                return Err(CadError::Unsupported(format!(
                    "offset by {distance} splits the contour into {n} pieces"
                )));
            }
        };
        if !region.holes.is_empty() {
            return Err(CadError::Unsupported(format!(
                "offset by {distance} closes a hole inside the contour"
            )));
        }

        let mut points = region.outer.points;
        let target = self.points[0] + outward_normal(self.points[0], self.points[1]) * distance;
        let start = points
            .iter()
            .enumerate()
            .min_by(|(_, p), (_, q)| p.distance(target).total_cmp(&q.distance(target)))
            .map(|(i, _)| i)
            .unwrap_or(0);
        points.rotate_left(start);
        Ok(Self { points })
    }

    /// Keep the part on the side of the line through `point` that `keep`
    /// points to. Returns `None` when nothing is left.
    pub fn clip_half_plane(&self, point: DVec2, keep: DVec2) -> Option<Self> {
        let keep = keep.normalize_or_zero();
        if keep == DVec2::ZERO {
            return None;
        }
        let (min, max) = self.bounds();
        let reach = (max - min).length() + point.distance((min + max) / 2.0) + 1.0;
        let along = keep.perp() * reach;
        let half = Contour::polygon([
            point - along,
            point + along,
            point + along + keep * reach * 2.0,
            point - along + keep * reach * 2.0,
        ])
        .ok()?;
        regions_from_csg(&self.to_csg().intersection(&half.to_csg()))
            .into_iter()
            .map(|r| r.outer)
            .max_by(|a, b| a.area().total_cmp(&b.area()))
    }

    /// The contour as a csgrs sketch
    pub(crate) fn to_csg(&self) -> CsgSketch {
        CsgSketch::polygon(&ring(&self.points), None)
    }

    /// Lift to 3D in the sketch plane
    pub fn to_3d(&self, z: f64) -> Vec<DVec3> {
        self.points.iter().map(|p| p.extend(z)).collect()
    }
}

/// Outward normal of a counter-clockwise edge
pub(crate) fn outward_normal(a: DVec2, b: DVec2) -> DVec2 {
    let d = (b - a).normalize_or_zero();
    DVec2::new(d.y, -d.x)
}

/// Unit vector at the given angle from +X
pub(crate) fn unit(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

/// Angle of a vector from +X
pub(crate) fn heading(v: DVec2) -> f64 {
    v.y.atan2(v.x)
}

/// Signed angle turning `a` onto `b`, in (-pi, pi]
pub(crate) fn signed_angle(a: DVec2, b: DVec2) -> f64 {
    a.perp_dot(b).atan2(a.dot(b))
}

pub(crate) fn signed_area(points: &[DVec2]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f64>()
        / 2.0
}

fn arc_steps(angle: f64) -> usize {
    ((angle / FRAC_PI_2) * ARC_SEGMENTS_PER_QUARTER as f64 - 1e-6)
        .ceil()
        .max(1.0) as usize
}

/// Drop consecutive duplicates, including a repeated closing point
fn dedup_closed(mut points: Vec<DVec2>) -> Vec<DVec2> {
    points.dedup_by(|b, a| a.distance(*b) < 1e-9);
    while points.len() > 1 && points[0].distance(points[points.len() - 1]) < 1e-9 {
        points.pop();
    }
    points
}

/// Closed `[x, y]` ring as csgrs expects it
fn ring(points: &[DVec2]) -> Vec<[f64; 2]> {
    points
        .iter()
        .chain(points.first())
        .map(|p| [p.x, p.y])
        .collect()
}

/// Regions of a csgrs sketch; rings that do not form a contour are skipped
pub(crate) fn regions_from_csg(sketch: &CsgSketch) -> Vec<Region> {
    sketch
        .to_multipolygon()
        .0
        .iter()
        .filter_map(|polygon| {
            let outer = contour_from(polygon.exterior().0.iter().map(|c| (c.x, c.y)))?;
            let holes = polygon
                .interiors()
                .iter()
                .filter_map(|hole| contour_from(hole.0.iter().map(|c| (c.x, c.y))))
                .collect();
            Some(Region { outer, holes })
        })
        .collect()
}

fn contour_from(coords: impl Iterator<Item = (f64, f64)>) -> Option<Contour> {
    Contour::polygon(coords.map(|(x, y)| DVec2::new(x, y))).ok()
}

/// Triangles covering `outer` minus `holes`, each counter-clockwise
pub(crate) fn triangulate(outer: &[DVec2], holes: &[&[DVec2]]) -> Vec<[DVec2; 3]> {
    let holes: Vec<Vec<[f64; 2]>> = holes.iter().map(|h| ring(h)).collect();
    let hole_refs: Vec<&[[f64; 2]]> = holes.iter().map(Vec::as_slice).collect();
    CsgSketch::triangulate_2d(&ring(outer), &hole_refs)
        .into_iter()
        .filter_map(|t| {
            let [a, b, c] = t.map(|p| DVec2::new(p.x, p.y));
            let turn = (b - a).perp_dot(c - a);
            if turn.abs() < EPS {
                None
            } else if turn > 0.0 {
                Some([a, b, c])
            } else {
                Some([a, c, b])
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangle_area_and_start() {
        let rect = Contour::rectangle(DVec2::ZERO, 10.0, 4.0);
        assert_relative_eq!(rect.area(), 40.0);
        let first = rect.edges()[0];
        assert_relative_eq!(first.start.x, 5.0);
        assert!(first.end.y > first.start.y);
    }

    #[test]
    fn test_polygon_normalizes_orientation() {
        let cw = Contour::polygon([
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(cw.len(), 4);
        assert_eq!(cw.points()[0], DVec2::ZERO);
        assert!(signed_area(cw.points()) > 0.0);
    }

    #[test]
    fn test_polygon_rejects_degenerate() {
        assert!(Contour::polygon([DVec2::ZERO, DVec2::X]).is_err());
        assert!(Contour::polygon([DVec2::ZERO, DVec2::X, DVec2::X * 2.0]).is_err());
    }

    #[test]
    fn test_fillet_corners_keeps_first_edge() {
        let rect = Contour::rectangle(DVec2::ZERO, 20.0, 10.0);
        let rounded = rect.fillet_corners(2.0).unwrap();
        let (min, max) = rounded.bounds();
        assert_relative_eq!(min.x, -10.0, epsilon = 1e-9);
        assert_relative_eq!(max.y, 5.0, epsilon = 1e-9);
        let expected = 200.0 - (4.0 - PI) * 4.0;
        assert_relative_eq!(rounded.area(), expected, epsilon = 0.2);
        let first = rounded.edges()[0];
        assert_relative_eq!(first.start.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(first.start.y, -3.0, epsilon = 1e-9);
        assert_relative_eq!(first.end.y, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fillet_too_large_fails() {
        let rect = Contour::rectangle(DVec2::ZERO, 4.0, 4.0);
        assert!(rect.fillet_corners(2.5).is_err());
    }

    #[test]
    fn test_chamfer_corners() {
        let rect = Contour::rectangle(DVec2::ZERO, 10.0, 10.0);
        let cut = rect.chamfer_corners(1.0).unwrap();
        assert_eq!(cut.len(), 8);
        assert_relative_eq!(cut.area(), 100.0 - 4.0 * 0.5, epsilon = 1e-9);
        assert_relative_eq!(cut.points()[0].x, 5.0);
        assert_relative_eq!(cut.points()[0].y, -4.0);
    }

    #[test]
    fn test_inward_offset_rectangle() {
        let rect = Contour::rectangle(DVec2::ZERO, 10.0, 6.0);
        let inner = rect.offset(-1.0, Join::Arc).unwrap();
        assert_relative_eq!(inner.area(), 8.0 * 4.0, epsilon = 1e-6);
        assert_relative_eq!(inner.points()[0].x, 4.0, epsilon = 1e-6);
        assert_relative_eq!(inner.points()[0].y, -2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_offset_collapse_is_degenerate() {
        let rect = Contour::rectangle(DVec2::ZERO, 4.0, 2.0);
        assert!(matches!(
            rect.offset(-1.5, Join::Arc),
            Err(CadError::DegenerateOffset(_))
        ));
    }

    #[test]
    fn test_outward_offset_arc_and_miter() {
        let rect = Contour::rectangle(DVec2::ZERO, 10.0, 6.0);
        let miter = rect.offset(1.0, Join::Miter).unwrap();
        assert_relative_eq!(miter.area(), 12.0 * 8.0, epsilon = 1e-6);
        let arc = rect.offset(1.0, Join::Arc).unwrap();
        let exact = 60.0 + 2.0 * (10.0 + 6.0) + PI;
        assert!(arc.area() < exact + 1e-6 && arc.area() > exact - 0.2);
        let first = arc.edges()[0];
        assert_relative_eq!(first.start.x, 6.0, epsilon = 1e-6);
        assert_relative_eq!(first.start.y, -3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_offset_preserves_rounded_start() {
        let rounded = Contour::rectangle(DVec2::ZERO, 20.0, 10.0)
            .fillet_corners(2.0)
            .unwrap();
        let grown = rounded.offset(0.5, Join::Arc).unwrap();
        let first = grown.edges()[0];
        assert_relative_eq!(first.start.x, 10.5, epsilon = 1e-6);
        assert_relative_eq!(first.end.x, 10.5, epsilon = 1e-6);
        let shrunk = rounded.offset(-0.5, Join::Arc).unwrap();
        let first = shrunk.edges()[0];
        assert_relative_eq!(first.start.x, 9.5, epsilon = 1e-6);
        assert_relative_eq!(first.end.x, 9.5, epsilon = 1e-6);
    }

    #[test]
    fn test_concave_offset() {
        let ell = Contour::polygon([
            DVec2::new(0.0, 0.0),
            DVec2::new(6.0, 0.0),
            DVec2::new(6.0, 2.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(2.0, 6.0),
            DVec2::new(0.0, 6.0),
        ])
        .unwrap();
        let grown = ell.offset(0.5, Join::Miter).unwrap();
        assert_relative_eq!(grown.area(), 7.0 * 3.0 + 3.0 * 4.0, epsilon = 1e-6);
        assert!(matches!(
            ell.offset(-1.5, Join::Miter),
            Err(CadError::DegenerateOffset(_))
        ));
    }

    #[test]
    fn test_regular_polygon_square_is_axis_aligned() {
        let square = Contour::regular_polygon(DVec2::ZERO, 5.0 * 2f64.sqrt() / 2.0, 4);
        let (min, max) = square.bounds();
        assert_relative_eq!(max.x - min.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(max.y - min.y, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_slot_extents() {
        let slot = Contour::slot(DVec2::ZERO, 10.0, 5.0).rotated(90.0);
        let (min, max) = slot.bounds();
        assert_relative_eq!(max.y - min.y, 10.0, epsilon = 1e-9);
        assert_relative_eq!(max.x - min.x, 5.0, epsilon = 1e-9);
        assert!(slot.is_convex());
    }

    #[test]
    fn test_contains_and_clip() {
        let rect = Contour::rectangle(DVec2::ZERO, 4.0, 4.0);
        assert!(rect.contains(DVec2::new(1.0, 1.0)));
        assert!(!rect.contains(DVec2::new(3.0, 0.0)));
        let half = rect.clip_half_plane(DVec2::ZERO, DVec2::NEG_Y).unwrap();
        assert_relative_eq!(half.area(), 8.0, epsilon = 1e-9);
        assert!(rect.clip_half_plane(DVec2::new(0.0, 5.0), DVec2::Y).is_none());
    }

    #[test]
    fn test_triangulate_concave_with_hole() {
        let outer = [
            DVec2::new(0.0, 0.0),
            DVec2::new(8.0, 0.0),
            DVec2::new(8.0, 8.0),
            DVec2::new(4.0, 2.0),
            DVec2::new(0.0, 8.0),
        ];
        let tris = triangulate(&outer, &[]);
        let area = |t: &[DVec2; 3]| (t[1] - t[0]).perp_dot(t[2] - t[0]) / 2.0;
        assert!(tris.iter().all(|t| area(t) > 0.0));
        let total: f64 = tris.iter().map(area).sum();
        assert_relative_eq!(total, signed_area(&outer), epsilon = 1e-9);

        let square = Contour::rectangle(DVec2::ZERO, 10.0, 10.0);
        let hole = Contour::rectangle(DVec2::ZERO, 2.0, 2.0);
        let tris = triangulate(square.points(), &[hole.points()]);
        let total: f64 = tris.iter().map(area).sum();
        assert_relative_eq!(total, 96.0, epsilon = 1e-9);
    }
}
