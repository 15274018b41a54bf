//! Path ordering
//!
//! Turns an unordered set of boundary segments into one continuous,
//! direction-consistent rail for sweeps and edge treatments.

use std::collections::VecDeque;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Endpoint matching tolerance
pub const PATH_TOLERANCE: f64 = 1e-5;

/// A straight boundary segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: DVec3,
    pub end: DVec3,
}

impl Segment {
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    /// The same segment traversed the other way
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end (zero for a degenerate segment)
    pub fn direction(&self) -> DVec3 {
        (self.end - self.start).normalize_or_zero()
    }

    pub fn midpoint(&self) -> DVec3 {
        (self.start + self.end) * 0.5
    }
}

/// Errors raised while ordering segments
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("no segments to order")]
    Empty,

    #[error("disconnected boundary: {ordered} segments chained, {remaining} left over")]
    Disconnected { ordered: usize, remaining: usize },

    #[error("path is not simple, it revisits {point:?}")]
    NonSimple { point: [f64; 3] },
}

/// An ordered chain of segments where each start equals the previous end
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    edges: Vec<Segment>,
}

impl Path {
    pub fn edges(&self) -> &[Segment] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Start of the first segment
    pub fn start_point(&self) -> DVec3 {
        self.edges.first().map(|e| e.start).unwrap_or(DVec3::ZERO)
    }

    /// End of the last segment
    pub fn end_point(&self) -> DVec3 {
        self.edges.last().map(|e| e.end).unwrap_or(DVec3::ZERO)
    }

    pub fn is_closed(&self) -> bool {
        !self.edges.is_empty() && same_point(self.start_point(), self.end_point())
    }

    /// Vertices along the path; the closing point of a closed path is not repeated
    pub fn points(&self) -> Vec<DVec3> {
        let mut points: Vec<DVec3> = self.edges.iter().map(|e| e.start).collect();
        if !self.is_closed() {
            points.push(self.end_point());
        }
        points
    }

    /// Total length
    pub fn length(&self) -> f64 {
        self.edges.iter().map(Segment::length).sum()
    }
}

fn same_point(a: DVec3, b: DVec3) -> bool {
    a.distance(b) <= PATH_TOLERANCE
}

/// Order segments into a single connected path.
///
/// The first segment seeds the chain. Segments are appended at the tail when
/// they continue from its end point (reversed when they arrive there), and
/// prepended at the head when the tail cannot grow, which covers open chains
/// seeded in the middle.
pub fn order_edges(edges: impl IntoIterator<Item = Segment>) -> Result<Path, PathError> {
    let mut remaining: Vec<Segment> = edges
        .into_iter()
        .filter(|e| e.length() > PATH_TOLERANCE)
        .collect();
    if remaining.is_empty() {
        return Err(PathError::Empty);
    }
    let mut chain = VecDeque::from([remaining.remove(0)]);

    while !remaining.is_empty() {
        let tail = chain.back().map(|e| e.end).unwrap_or_default();
        let head = chain.front().map(|e| e.start).unwrap_or_default();
        let closed = same_point(tail, head);

        let after = (!closed)
            .then(|| {
                remaining.iter().enumerate().find_map(|(i, e)| {
                    if same_point(e.start, tail) {
                        Some((i, *e))
                    } else if same_point(e.end, tail) {
                        Some((i, e.reversed()))
                    } else {
                        None
                    }
                })
            })
            .flatten();
        if let Some((i, edge)) = after {
            remaining.swap_remove(i);
            chain.push_back(edge);
            continue;
        }

        let before = (!closed)
            .then(|| {
                remaining.iter().enumerate().find_map(|(i, e)| {
                    if same_point(e.end, head) {
                        Some((i, *e))
                    } else if same_point(e.start, head) {
                        Some((i, e.reversed()))
                    } else {
                        None
                    }
                })
            })
            .flatten();
        match before {
            Some((i, edge)) => {
                remaining.swap_remove(i);
                chain.push_front(edge);
            }
            None => {
                return Err(PathError::Disconnected {
                    ordered: chain.len(),
                    remaining: remaining.len(),
                });
            }
        }
    }

    let path = Path {
        edges: chain.into(),
    };
    check_simple(&path)?;
    tracing::debug!(
        "ordered {} segments into a {} path",
        path.len(),
        if path.is_closed() { "closed" } else { "open" }
    );
    Ok(path)
}

fn check_simple(path: &Path) -> Result<(), PathError> {
    let points = path.points();
    for (i, p) in points.iter().enumerate() {
        if points[i + 1..].iter().any(|q| same_point(*p, *q)) {
            return Err(PathError::NonSimple {
                point: p.to_array(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::new(DVec3::new(a.0, a.1, 0.0), DVec3::new(b.0, b.1, 0.0))
    }

    fn assert_chained(path: &Path) {
        for pair in path.edges().windows(2) {
            assert!(same_point(pair[0].end, pair[1].start));
        }
    }

    #[test]
    fn test_orders_shuffled_closed_loop() {
        let edges = vec![
            seg((1.0, 1.0), (0.0, 1.0)),
            seg((0.0, 0.0), (1.0, 0.0)),
            seg((0.0, 0.0), (0.0, 1.0)),
            seg((1.0, 0.0), (1.0, 1.0)),
        ];
        let path = order_edges(edges).unwrap();
        assert_eq!(path.len(), 4);
        assert!(path.is_closed());
        assert_chained(&path);
        assert_eq!(path.points().len(), 4);
        assert_eq!(path.edges()[0], seg((1.0, 1.0), (0.0, 1.0)));
    }

    #[test]
    fn test_open_path_seeded_in_the_middle() {
        let edges = vec![
            seg((1.0, 0.0), (2.0, 0.0)),
            seg((3.0, 0.0), (2.0, 0.0)),
            seg((0.0, 0.0), (1.0, 0.0)),
        ];
        let path = order_edges(edges).unwrap();
        assert_eq!(path.len(), 3);
        assert!(!path.is_closed());
        assert_chained(&path);
        assert_eq!(path.start_point(), DVec3::ZERO);
        assert_eq!(path.end_point(), DVec3::new(3.0, 0.0, 0.0));
        assert_eq!(path.points().len(), 4);
    }

    #[test]
    fn test_disconnected_is_an_error() {
        let edges = vec![seg((0.0, 0.0), (1.0, 0.0)), seg((5.0, 5.0), (6.0, 5.0))];
        assert_eq!(
            order_edges(edges),
            Err(PathError::Disconnected {
                ordered: 1,
                remaining: 1
            })
        );
    }

    #[test]
    fn test_closed_loop_with_stray_segment() {
        let edges = vec![
            seg((0.0, 0.0), (1.0, 0.0)),
            seg((1.0, 0.0), (0.0, 1.0)),
            seg((0.0, 1.0), (0.0, 0.0)),
            seg((0.0, 0.0), (-1.0, 0.0)),
        ];
        assert!(matches!(
            order_edges(edges),
            Err(PathError::Disconnected { .. }) | Err(PathError::NonSimple { .. })
        ));
    }

    #[test]
    fn test_empty_is_an_error() {
        assert_eq!(order_edges(Vec::new()), Err(PathError::Empty));
    }

    #[test]
    fn test_figure_eight_is_not_simple() {
        let edges = vec![
            seg((0.0, 0.0), (1.0, 1.0)),
            seg((1.0, 1.0), (2.0, 0.0)),
            seg((2.0, 0.0), (0.0, 0.0)),
            seg((0.0, 0.0), (-2.0, 0.0)),
            seg((-2.0, 0.0), (-1.0, 1.0)),
            seg((-1.0, 1.0), (0.0, 0.0)),
        ];
        assert!(order_edges(edges).is_err());
    }

    #[test]
    fn test_tolerant_endpoint_matching() {
        let edges = vec![
            seg((0.0, 0.0), (1.0, 0.0)),
            seg((1.000_001, 0.0), (1.0, 1.0)),
        ];
        let path = order_edges(edges).unwrap();
        assert_eq!(path.len(), 2);
    }
}
