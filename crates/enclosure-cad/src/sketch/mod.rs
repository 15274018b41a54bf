//! 2D sketches
//!
//! A [`Sketch`] is a union of [`Region`]s, each an outer [`Contour`] with
//! optional holes. Sketches are plain values; they are placed in space by a
//! [`Plane`](crate::kernel::Plane) when a kernel turns them into solids.
//! Offsets, clipping, merging and triangulation go through csgrs sketches.

mod contour;

pub use contour::{ARC_SEGMENTS_PER_QUARTER, CIRCLE_SEGMENTS, Contour, Join};
pub(crate) use contour::{heading, signed_area, triangulate};

use contour::{CsgSketch, regions_from_csg};
use csgrs::traits::CSG;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::kernel::{CadError, CadResult};
use crate::path::Segment;

/// One connected face of a sketch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub outer: Contour,
    pub holes: Vec<Contour>,
}

impl Region {
    pub fn new(outer: Contour) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Area of the outer contour minus its holes
    pub fn area(&self) -> f64 {
        self.outer.area() - self.holes.iter().map(Contour::area).sum::<f64>()
    }

    /// Grow (positive) or shrink (negative) the face.
    ///
    /// Holes move the opposite way; a hole that closes up is dropped.
    pub fn offset(&self, distance: f64, join: Join) -> CadResult<Self> {
        let outer = self.outer.offset(distance, join)?;
        let mut holes = Vec::with_capacity(self.holes.len());
        for hole in &self.holes {
            match hole.offset(-distance, join) {
                Ok(hole) => holes.push(hole),
                Err(CadError::DegenerateOffset(_)) => {
                    tracing::warn!("hole closed up while offsetting a region by {distance}");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(Self { outer, holes })
    }

    pub fn translated(&self, offset: DVec2) -> Self {
        Self {
            outer: self.outer.translated(offset),
            holes: self.holes.iter().map(|h| h.translated(offset)).collect(),
        }
    }

    pub fn rotated(&self, angle_deg: f64) -> Self {
        Self {
            outer: self.outer.rotated(angle_deg),
            holes: self.holes.iter().map(|h| h.rotated(angle_deg)).collect(),
        }
    }

    fn to_csg(&self) -> CsgSketch {
        self.holes
            .iter()
            .fold(self.outer.to_csg(), |acc, hole| acc.difference(&hole.to_csg()))
    }
}

/// A planar sketch made of one or more regions.
///
/// Regions may overlap; extruding a sketch unions its regions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sketch {
    regions: Vec<Region>,
}

impl From<Contour> for Sketch {
    fn from(contour: Contour) -> Self {
        Self {
            regions: vec![Region::new(contour)],
        }
    }
}

impl From<Region> for Sketch {
    fn from(region: Region) -> Self {
        Self {
            regions: vec![region],
        }
    }
}

impl FromIterator<Contour> for Sketch {
    fn from_iter<I: IntoIterator<Item = Contour>>(iter: I) -> Self {
        Self {
            regions: iter.into_iter().map(Region::new).collect(),
        }
    }
}

impl Sketch {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Combine the regions of both sketches
    pub fn union(mut self, other: Sketch) -> Sketch {
        self.regions.extend(other.regions);
        self
    }

    /// Remove `other` from this sketch.
    ///
    /// Contours of `other` lying inside a region become holes of that region,
    /// contours clear of a region leave it untouched. Partial overlaps are not
    /// supported.
    pub fn subtract(&self, other: &Sketch) -> CadResult<Sketch> {
        let mut regions = self.regions.clone();
        for cut in &other.regions {
            if !cut.holes.is_empty() {
                return Err(CadError::Unsupported(
                    "subtracting a region that has holes".into(),
                ));
            }
            let (cut_min, cut_max) = cut.outer.bounds();
            for region in regions.iter_mut() {
                let (min, max) = region.outer.bounds();
                let disjoint = cut_max.x < min.x
                    || cut_min.x > max.x
                    || cut_max.y < min.y
                    || cut_min.y > max.y;
                if disjoint {
                    continue;
                }
                if cut.outer.points().iter().all(|p| region.outer.contains(*p)) {
                    region.holes.push(cut.outer.clone());
                } else {
                    return Err(CadError::Unsupported(
                        "sketch subtraction with partial overlap".into(),
                    ));
                }
            }
        }
        Ok(Sketch { regions })
    }

    /// Offset every region (see [`Region::offset`])
    pub fn offset(&self, distance: f64, join: Join) -> CadResult<Sketch> {
        let regions = self
            .regions
            .iter()
            .map(|r| r.offset(distance, join))
            .collect::<CadResult<Vec<_>>>()?;
        Ok(Sketch { regions })
    }

    /// The regions with overlaps merged, so no two of them share area
    pub fn merged(&self) -> Vec<Region> {
        match self.regions.as_slice() {
            [] => Vec::new(),
            [region] => vec![region.clone()],
            [first, rest @ ..] => {
                let union = rest
                    .iter()
                    .fold(first.to_csg(), |acc, r| acc.union(&r.to_csg()));
                regions_from_csg(&union)
            }
        }
    }

    /// Sum of region areas; overlapping regions are counted twice
    pub fn area(&self) -> f64 {
        self.regions.iter().map(Region::area).sum()
    }

    /// All boundary segments in the sketch plane (outer contours first)
    pub fn edges(&self) -> Vec<Segment> {
        let outers = self.regions.iter().flat_map(|r| r.outer.edges());
        let holes = self
            .regions
            .iter()
            .flat_map(|r| r.holes.iter().flat_map(Contour::edges));
        outers.chain(holes).collect()
    }

    /// All contour vertices
    pub fn vertices(&self) -> Vec<DVec2> {
        self.regions
            .iter()
            .flat_map(|r| {
                r.outer
                    .points()
                    .iter()
                    .chain(r.holes.iter().flat_map(|h| h.points().iter()))
                    .copied()
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Bounding rectangle of all outer contours as (min, max)
    pub fn bounds(&self) -> (DVec2, DVec2) {
        self.regions.iter().fold(
            (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
            |(min, max), r| {
                let (rmin, rmax) = r.outer.bounds();
                (min.min(rmin), max.max(rmax))
            },
        )
    }

    pub fn translated(&self, offset: DVec2) -> Sketch {
        Sketch {
            regions: self.regions.iter().map(|r| r.translated(offset)).collect(),
        }
    }

    pub fn rotated(&self, angle_deg: f64) -> Sketch {
        Sketch {
            regions: self.regions.iter().map(|r| r.rotated(angle_deg)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Contour {
        Contour::rectangle(DVec2::ZERO, size, size)
    }

    #[test]
    fn test_subtract_contained_makes_ring() {
        let ring = Sketch::from(square(10.0)).subtract(&square(6.0).into()).unwrap();
        assert_eq!(ring.regions().len(), 1);
        assert_eq!(ring.regions()[0].holes.len(), 1);
        assert_relative_eq!(ring.area(), 100.0 - 36.0);
    }

    #[test]
    fn test_subtract_disjoint_is_ignored() {
        let far = Contour::rectangle(DVec2::new(50.0, 0.0), 2.0, 2.0);
        let result = Sketch::from(square(10.0)).subtract(&far.into()).unwrap();
        assert!(result.regions()[0].holes.is_empty());
    }

    #[test]
    fn test_subtract_partial_overlap_unsupported() {
        let shifted = Contour::rectangle(DVec2::new(5.0, 0.0), 4.0, 4.0);
        let result = Sketch::from(square(10.0)).subtract(&shifted.into());
        assert!(matches!(result, Err(CadError::Unsupported(_))));
    }

    #[test]
    fn test_offset_ring_moves_hole_opposite() {
        let ring = Sketch::from(square(10.0)).subtract(&square(6.0).into()).unwrap();
        let thinner = ring.offset(-0.5, Join::Miter).unwrap();
        assert_relative_eq!(thinner.area(), 81.0 - 49.0, epsilon = 1e-6);
        let rounded = ring.offset(-0.5, Join::Arc).unwrap();
        assert!(rounded.area() > thinner.area());
    }

    #[test]
    fn test_vanishing_hole_is_dropped() {
        let ring = Sketch::from(square(10.0)).subtract(&square(1.0).into()).unwrap();
        let grown = ring.offset(1.0, Join::Miter).unwrap();
        assert!(grown.regions()[0].holes.is_empty());
        assert_relative_eq!(grown.area(), 144.0, epsilon = 1e-6);
    }

    #[test]
    fn test_merged_overlapping_regions() {
        let pair: Sketch = [
            Contour::rectangle(DVec2::ZERO, 2.0, 2.0),
            Contour::rectangle(DVec2::new(1.0, 0.0), 2.0, 2.0),
        ]
        .into_iter()
        .collect();
        assert_relative_eq!(pair.area(), 8.0);
        let merged = pair.merged();
        assert_eq!(merged.len(), 1);
        assert_relative_eq!(merged[0].area(), 6.0, epsilon = 1e-9);

        let apart: Sketch = [
            Contour::rectangle(DVec2::ZERO, 2.0, 2.0),
            Contour::rectangle(DVec2::new(5.0, 0.0), 2.0, 2.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(apart.merged().len(), 2);
    }

    #[test]
    fn test_edges_and_vertices() {
        let ring = Sketch::from(square(10.0)).subtract(&square(6.0).into()).unwrap();
        assert_eq!(ring.edges().len(), 8);
        assert_eq!(ring.vertices().len(), 8);
        let (min, max) = ring.bounds();
        assert_relative_eq!(min.x, -5.0);
        assert_relative_eq!(max.y, 5.0);
    }
}
