//! Polygon-mesh CAD kernel on csgrs
//!
//! Solids are closed, outward-oriented csgrs meshes. Each polygon carries a
//! face label as its metadata and polygons sharing a label make up one planar
//! face of the solid. Extrusions, lofts and sweeps are assembled from csgrs
//! polygons directly; booleans and transforms go through [`CSG`].

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use csgrs::mesh::Mesh;
use csgrs::mesh::polygon::Polygon;
use csgrs::mesh::vertex::Vertex;
use csgrs::traits::CSG;
use glam::{DVec2, DVec3};
use nalgebra::{Matrix4, Point3, Vector3};

use super::placement::{Plane, Transform, face_x_dir};
use super::traits::{
    BooleanType, BoundingBox, CadError, CadKernel, CadResult, EdgeId, EdgeInfo, ExtrudeOptions,
    FaceId, FaceInfo, Solid, TessellatedMesh, Transition,
};
use crate::path::{Path, PathError, order_edges};
use crate::sketch::{Contour, Join, Region, Sketch, heading, signed_area, triangulate};

/// Sections used to approximate a fillet quarter circle
const FILLET_STEPS: usize = 6;

/// Clearance between an edge-treatment cutter and the untouched side faces
const CUTTER_MARGIN: f64 = 1e-3;

/// Distance under which a point counts as lying on a face
const ON_SURFACE: f64 = 1e-6;

/// Mesh whose polygon metadata is the face label
type LabelledMesh = Mesh<u32>;

/// Geometry stored inside a [`Solid`] created by [`MeshKernel`]
#[derive(Debug, Clone)]
struct Body {
    mesh: LabelledMesh,
    /// Construction edges; only those still on the surface are reported
    edges: Vec<(DVec3, DVec3)>,
    next_face: u32,
}

impl Body {
    fn facets(&self) -> Vec<Facet> {
        self.mesh
            .polygons
            .iter()
            .filter_map(Facet::from_polygon)
            .collect()
    }

    fn bounds(&self) -> BoundingBox {
        let (min, max) = self
            .mesh
            .polygons
            .iter()
            .flat_map(|p| p.vertices.iter())
            .map(|v| to_glam(&v.pos))
            .fold(
                (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY)),
                |(min, max), v| (min.min(v), max.max(v)),
            );
        BoundingBox::new(min, max)
    }

    fn volume(&self) -> f64 {
        signed_volume(&self.mesh.polygons)
    }

    /// The mesh with every face label shifted by `offset`
    fn relabelled(&self, offset: u32) -> LabelledMesh {
        let mut mesh = self.mesh.clone();
        for polygon in &mut mesh.polygons {
            polygon.metadata = polygon.metadata.map(|face| face + offset);
        }
        mesh
    }
}

fn body_of(solid: &Solid) -> CadResult<&Body> {
    solid
        .data::<Body>()
        .ok_or(CadError::ForeignSolid(solid.id))
}

fn to_glam(p: &Point3<f64>) -> DVec3 {
    DVec3::new(p.x, p.y, p.z)
}

/// Twice the area times the unit normal of a planar loop
fn newell(vertices: &[DVec3]) -> DVec3 {
    let n = vertices.len();
    (0..n)
        .map(|i| vertices[i].cross(vertices[(i + 1) % n]))
        .sum()
}

fn signed_volume(polygons: &[Polygon<u32>]) -> f64 {
    polygons
        .iter()
        .map(|p| {
            let vertices: Vec<DVec3> = p.vertices.iter().map(|v| to_glam(&v.pos)).collect();
            match vertices.first() {
                Some(v0) => v0.dot(newell(&vertices)) / 6.0,
                None => 0.0,
            }
        })
        .sum()
}

/// A planar polygon of a body in glam types
struct Facet {
    vertices: Vec<DVec3>,
    normal: DVec3,
    offset: f64,
    face: u32,
}

impl Facet {
    fn new(vertices: Vec<DVec3>, face: u32) -> Option<Self> {
        let twice_area = newell(&vertices);
        if vertices.len() < 3 || twice_area.length() < 1e-12 {
            return None;
        }
        let normal = twice_area.normalize();
        Some(Self {
            offset: normal.dot(vertices[0]),
            vertices,
            normal,
            face,
        })
    }

    fn from_polygon(polygon: &Polygon<u32>) -> Option<Self> {
        Self::new(
            polygon.vertices.iter().map(|v| to_glam(&v.pos)).collect(),
            polygon.metadata.unwrap_or_default(),
        )
    }

    fn area(&self) -> f64 {
        newell(&self.vertices).length() / 2.0
    }

    fn centroid(&self) -> DVec3 {
        let v0 = self.vertices[0];
        let (sum, weight) = self
            .vertices
            .windows(2)
            .skip(1)
            .fold((DVec3::ZERO, 0.0), |(sum, weight), w| {
                let area = (w[0] - v0).cross(w[1] - v0).length() / 2.0;
                (sum + (v0 + w[0] + w[1]) / 3.0 * area, weight + area)
            });
        if weight < 1e-15 {
            self.vertices.iter().copied().sum::<DVec3>() / self.vertices.len() as f64
        } else {
            sum / weight
        }
    }

    /// Point on the (convex) polygon, boundary included
    fn contains(&self, point: DVec3) -> bool {
        if (self.normal.dot(point) - self.offset).abs() > ON_SURFACE {
            return false;
        }
        let n = self.vertices.len();
        (0..n).all(|i| {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            (b - a).cross(point - a).dot(self.normal) >= -ON_SURFACE * (b - a).length()
        })
    }

    fn to_csg(&self) -> Polygon<u32> {
        let normal = Vector3::new(self.normal.x, self.normal.y, self.normal.z);
        let vertices = self
            .vertices
            .iter()
            .map(|v| Vertex::new(Point3::new(v.x, v.y, v.z), normal))
            .collect();
        Polygon::new(vertices, Some(self.face))
    }
}

fn reversed(mut vertices: Vec<DVec3>) -> Vec<DVec3> {
    vertices.reverse();
    vertices
}

/// Accumulates labelled polygons for a new body
#[derive(Default)]
struct MeshBuilder {
    polygons: Vec<Polygon<u32>>,
    edges: Vec<(DVec3, DVec3)>,
    next_face: u32,
}

impl MeshBuilder {
    /// Add a run of polygons; consecutive coplanar pieces share one face label
    fn surface(&mut self, pieces: impl IntoIterator<Item = Vec<DVec3>>) {
        let mut last: Option<(DVec3, f64, u32)> = None;
        for piece in pieces {
            for vertices in planar_pieces(piece) {
                let Some(mut facet) = Facet::new(vertices, 0) else {
                    continue;
                };
                facet.face = match last {
                    Some((normal, offset, face))
                        if normal.dot(facet.normal) > 1.0 - 1e-9
                            && (offset - facet.offset).abs() < 1e-7 =>
                    {
                        face
                    }
                    _ => {
                        self.next_face += 1;
                        self.next_face - 1
                    }
                };
                last = Some((facet.normal, facet.offset, facet.face));
                self.polygons.push(facet.to_csg());
            }
        }
    }

    fn loop_edges(&mut self, points: &[DVec3]) {
        let n = points.len();
        self.edges
            .extend((0..n).map(|i| (points[i], points[(i + 1) % n])));
    }

    fn finish(mut self) -> CadResult<Body> {
        let volume = signed_volume(&self.polygons);
        if volume.abs() < 1e-9 {
            return Err(CadError::DegenerateExtrusion(
                "solid encloses no volume".into(),
            ));
        }
        if volume < 0.0 {
            self.polygons.iter_mut().for_each(|p| p.flip());
        }
        Ok(Body {
            mesh: Mesh::from_polygons(&self.polygons, None),
            edges: self.edges,
            next_face: self.next_face,
        })
    }
}

/// Split warped quads into triangles
fn planar_pieces(vertices: Vec<DVec3>) -> Vec<Vec<DVec3>> {
    if vertices.len() != 4 {
        return vec![vertices];
    }
    let [a, b, c, d] = [vertices[0], vertices[1], vertices[2], vertices[3]];
    let normal = (b - a).cross(c - a);
    if normal.length() > 1e-12 && normal.normalize().dot(d - a).abs() < 1e-9 {
        return vec![vertices];
    }
    vec![vec![a, b, c], vec![a, c, d]]
}

/// One loft cross-section on its plane
struct Section {
    plane: Plane,
    outer: Contour,
    holes: Vec<Contour>,
}

impl Section {
    fn new(region: &Region, plane: Plane) -> Self {
        Self {
            plane,
            outer: region.outer.clone(),
            holes: region.holes.clone(),
        }
    }

    fn plain(contour: Contour, plane: Plane) -> Self {
        Self {
            plane,
            outer: contour,
            holes: Vec::new(),
        }
    }

    fn world(&self, p: DVec2) -> DVec3 {
        self.plane.to_world(p.extend(0.0))
    }

    /// Closing surface facing along the plane normal
    fn cap(&self) -> Vec<Vec<DVec3>> {
        if self.holes.is_empty() && self.outer.is_convex() {
            return vec![self.outer.points().iter().map(|p| self.world(*p)).collect()];
        }
        let holes: Vec<&[DVec2]> = self.holes.iter().map(Contour::points).collect();
        triangulate(self.outer.points(), &holes)
            .into_iter()
            .map(|t| t.iter().map(|p| self.world(*p)).collect())
            .collect()
    }
}

/// A section loop in world space, started at its smallest polar angle
struct Loop3 {
    points: Vec<DVec3>,
    /// Polar angle of each point as a fraction of a turn, ascending
    params: Vec<f64>,
}

impl Loop3 {
    fn new(contour: &Contour, plane: &Plane, center: DVec2) -> Self {
        let local = contour.points();
        let angles: Vec<f64> = local
            .iter()
            .map(|p| {
                let a = heading(*p - center).rem_euclid(TAU);
                if a > TAU - 1e-9 { 0.0 } else { a }
            })
            .collect();
        let start = angles
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let n = local.len();
        let order = (0..n).map(|k| (start + k) % n);
        Self {
            points: order
                .clone()
                .map(|i| plane.to_world(local[i].extend(0.0)))
                .collect(),
            params: order.map(|i| angles[i] / TAU).collect(),
        }
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

/// Loops with matching vertices that can be joined by quads
fn aligned(a: &Loop3, b: &Loop3) -> bool {
    let n = a.len();
    n == b.len()
        && a
            .params
            .iter()
            .zip(&b.params)
            .all(|(x, y)| (x - y).abs() < 0.25 / n as f64)
}

/// Surface between two loops, oriented like `a` to `b` with `a` counter-clockwise
fn strip(a: &Loop3, b: &Loop3) -> Vec<Vec<DVec3>> {
    let (n, m) = (a.len(), b.len());
    if aligned(a, b) {
        return (0..n)
            .map(|i| {
                let j = (i + 1) % n;
                vec![a.points[i], a.points[j], b.points[j], b.points[i]]
            })
            .collect();
    }

    let ta = |i: usize| if i < n { a.params[i] } else { 1.0 + a.params[0] };
    let tb = |j: usize| if j < m { b.params[j] } else { 1.0 + b.params[0] };
    let mut out = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        if j == m || (i < n && ta(i + 1) <= tb(j + 1)) {
            out.push(vec![a.points[i], a.points[(i + 1) % n], b.points[j % m]]);
            i += 1;
        } else {
            out.push(vec![a.points[i % n], b.points[(j + 1) % m], b.points[j]]);
            j += 1;
        }
    }
    out
}


/// Join consecutive sections; a closed loft also joins the last section back
/// to the first and gets no caps
fn build_loft(sections: &[Section], closed: bool) -> CadResult<Body> {
    let (Some(first), Some(last)) = (sections.first(), sections.last()) else {
        return Err(CadError::InvalidProfile("loft without sections".into()));
    };
    if sections.len() < 2 {
        return Err(CadError::InvalidProfile(
            "a loft needs at least two sections".into(),
        ));
    }
    let hole_count = first.holes.len();
    if sections.iter().any(|s| s.holes.len() != hole_count) {
        return Err(CadError::Unsupported(
            "loft sections with different topology".into(),
        ));
    }
    let n = sections.len();
    let pairs: Vec<(usize, usize)> = (0..n - 1)
        .map(|i| (i, i + 1))
        .chain(closed.then_some((n - 1, 0)))
        .collect();

    let mut builder = MeshBuilder::default();
    let outers: Vec<Loop3> = sections
        .iter()
        .map(|s| Loop3::new(&s.outer, &s.plane, s.outer.centroid()))
        .collect();
    for &(i, j) in &pairs {
        builder.surface(strip(&outers[i], &outers[j]));
        if aligned(&outers[i], &outers[j]) {
            builder.edges.extend(
                outers[i]
                    .points
                    .iter()
                    .copied()
                    .zip(outers[j].points.iter().copied()),
            );
        }
    }
    for h in 0..hole_count {
        let loops: Vec<Loop3> = sections
            .iter()
            .map(|s| Loop3::new(&s.holes[h], &s.plane, s.holes[h].centroid()))
            .collect();
        for &(i, j) in &pairs {
            builder.surface(strip(&loops[i], &loops[j]).into_iter().map(reversed));
        }
    }
    if !closed {
        builder.surface(first.cap().into_iter().map(reversed));
        builder.surface(last.cap());
    }

    for (section, outer) in sections.iter().zip(&outers) {
        builder.loop_edges(&outer.points);
        for hole in &section.holes {
            let points: Vec<DVec3> = hole.points().iter().map(|p| section.world(*p)).collect();
            builder.loop_edges(&points);
        }
    }
    builder.finish()
}

fn boolean_bodies(a: &Body, b: &Body, op: BooleanType) -> CadResult<Body> {
    let other = b.relabelled(a.next_face);
    let disjoint = !a.bounds().overlaps(&b.bounds(), 1e-9);
    let mesh = match (op, disjoint) {
        (BooleanType::Subtract, true) => a.mesh.clone(),
        (BooleanType::Union, _) => a.mesh.union(&other),
        (BooleanType::Subtract, false) => a.mesh.difference(&other),
        (BooleanType::Intersect, _) => a.mesh.intersection(&other),
    };
    let body = Body {
        mesh,
        edges: a.edges.iter().chain(&b.edges).copied().collect(),
        next_face: a.next_face + b.next_face,
    };
    if body.mesh.polygons.is_empty() || body.volume() < 1e-9 {
        return Err(CadError::BooleanFailed(format!(
            "{op:?} produced an empty solid"
        )));
    }
    Ok(body)
}

/// Bodies known not to overlap, gathered into one
fn gather_bodies(bodies: Vec<Body>) -> CadResult<Body> {
    if bodies.is_empty() {
        return Err(CadError::InvalidProfile("empty sketch".into()));
    }
    let mut polygons = Vec::new();
    let mut edges = Vec::new();
    let mut next_face = 0;
    for body in bodies {
        polygons.extend(body.relabelled(next_face).polygons);
        edges.extend(body.edges);
        next_face += body.next_face;
    }
    Ok(Body {
        mesh: Mesh::from_polygons(&polygons, None),
        edges,
        next_face,
    })
}

fn extrude_region(region: &Region, plane: &Plane, z0: f64, z1: f64, inset: f64) -> CadResult<Body> {
    let far = if inset == 0.0 {
        region.clone()
    } else {
        region.offset(-inset, Join::Miter)?
    };
    if far.holes.len() != region.holes.len() {
        return Err(CadError::DegenerateExtrusion(
            "taper closes a hole of the sketch".into(),
        ));
    }
    build_loft(
        &[
            Section::new(region, plane.offset(z0)),
            Section::new(&far, plane.offset(z1)),
        ],
        false,
    )
}

/// Sweep of `section` around a closed convex horizontal rail.
///
/// Every profile vertex traces the rail offset by its distance from it, so a
/// profile reaching further inward than a rounded corner stays a valid solid.
/// `outward` is 1 when the section's x axis points out of the rail loop.
fn sweep_around(section: &Contour, rail: &Contour, z: f64, outward: f64) -> CadResult<Body> {
    let rings = section
        .points()
        .iter()
        .map(|s| {
            let ring = rail.offset(s.x * outward, Join::Miter)?;
            Ok(Section::plain(ring, Plane::offset_xy(z + s.y)))
        })
        .collect::<CadResult<Vec<_>>>()?;
    build_loft(&rings, true)
}

/// Pure-Rust kernel over closed csgrs polygon meshes
#[derive(Debug, Default, Clone, Copy)]
pub struct MeshKernel;

impl MeshKernel {
    pub fn new() -> Self {
        Self
    }

    fn treat_edges(
        &self,
        solid: &Solid,
        edges: &[EdgeInfo],
        size: f64,
        chamfer: bool,
    ) -> CadResult<Solid> {
        let body = body_of(solid)?;
        if size <= 0.0 {
            return Err(CadError::InvalidProfile(format!(
                "edge treatment size must be positive, got {size}"
            )));
        }
        let path = order_edges(edges.iter().map(EdgeInfo::segment))?;
        if !path.is_closed() {
            return Err(CadError::Unsupported(
                "edge treatment of an open edge chain".into(),
            ));
        }
        let points = path.points();
        let z = path.start_point().z;
        if points.iter().any(|p| (p.z - z).abs() > 1e-6) {
            return Err(CadError::Unsupported(
                "edge treatment of non-horizontal edges".into(),
            ));
        }
        let bounds = body.bounds();
        let dir = if (z - bounds.max.z).abs() < 1e-6 {
            1.0
        } else if (z - bounds.min.z).abs() < 1e-6 {
            -1.0
        } else {
            return Err(CadError::Unsupported(
                "edge treatment away from the top or bottom of the solid".into(),
            ));
        };
        let contour = Contour::polygon(points.iter().map(|p| p.truncate()))?;
        if !contour.is_convex() {
            return Err(CadError::Unsupported(
                "edge treatment of a concave edge loop".into(),
            ));
        }

        let depth = bounds.size().z;
        let steps = if chamfer { 1 } else { FILLET_STEPS };
        let mut levels = vec![(z - dir * (depth + size + 1.0), 0.0), (z - dir * size, 0.0)];
        for k in 1..=steps {
            let s = size * k as f64 / steps as f64;
            let inset = if chamfer {
                s
            } else {
                size - (size * size - s * s).max(0.0).sqrt()
            };
            levels.push((z - dir * size + dir * s, inset));
        }
        levels.push((z + dir, size));

        let sections = levels
            .into_iter()
            .map(|(level, inset)| {
                Ok(Section::plain(
                    contour.offset(CUTTER_MARGIN - inset, Join::Miter)?,
                    Plane::offset_xy(level),
                ))
            })
            .collect::<CadResult<Vec<_>>>()?;
        let cutter = build_loft(&sections, false)?;
        let result = boolean_bodies(body, &cutter, BooleanType::Intersect)?;
        tracing::debug!(
            "{} of {} edges with size {size}",
            if chamfer { "chamfer" } else { "fillet" },
            edges.len()
        );
        Ok(Solid::new(result))
    }
}

impl CadKernel for MeshKernel {
    fn name(&self) -> &str {
        "mesh"
    }

    fn make_box(&self, center: DVec3, size: DVec3) -> CadResult<Solid> {
        if size.min_element() <= 0.0 {
            return Err(CadError::InvalidProfile(format!(
                "box size must be positive, got {size}"
            )));
        }
        let base = Plane::offset_xy(center.z - size.z / 2.0);
        let rect = Contour::rectangle(center.truncate(), size.x, size.y);
        self.make_prism(&rect, &base, size.z)
    }

    fn make_cylinder(&self, base_center: DVec3, radius: f64, height: f64) -> CadResult<Solid> {
        if radius <= 0.0 || height <= 0.0 {
            return Err(CadError::InvalidProfile(format!(
                "cylinder needs positive radius and height, got {radius} and {height}"
            )));
        }
        let circle = Contour::circle(DVec2::ZERO, radius);
        self.make_prism(&circle, &Plane::at(base_center), height)
    }

    fn extrude(
        &self,
        sketch: &Sketch,
        plane: &Plane,
        amount: f64,
        options: ExtrudeOptions,
    ) -> CadResult<Solid> {
        if amount.abs() < 1e-9 {
            return Err(CadError::DegenerateExtrusion(
                "zero extrusion distance".into(),
            ));
        }
        if options.both && options.taper_deg != 0.0 {
            return Err(CadError::Unsupported(
                "tapered extrusion to both sides".into(),
            ));
        }
        let (z0, z1) = if options.both {
            (-amount.abs(), amount.abs())
        } else {
            (0.0, amount)
        };
        let inset = (z1 - z0).abs() * options.taper_deg.to_radians().tan();
        let regions = sketch.merged();
        if regions.len() < sketch.regions().len() {
            tracing::debug!(
                "merged {} overlapping sketch regions into {}",
                sketch.regions().len(),
                regions.len()
            );
        }
        let bodies = regions
            .iter()
            .map(|r| extrude_region(r, plane, z0, z1, inset))
            .collect::<CadResult<Vec<_>>>()?;
        Ok(Solid::new(gather_bodies(bodies)?))
    }

    fn loft(&self, sections: &[(Sketch, Plane)], ruled: bool) -> CadResult<Solid> {
        if !ruled {
            tracing::debug!("loft sections are joined with straight rulings");
        }
        let sections = sections
            .iter()
            .map(|(sketch, plane)| match sketch.regions() {
                [region] => Ok(Section::new(region, *plane)),
                _ => Err(CadError::Unsupported(
                    "loft sections must have exactly one region".into(),
                )),
            })
            .collect::<CadResult<Vec<_>>>()?;
        Ok(Solid::new(build_loft(&sections, false)?))
    }

    fn sweep(
        &self,
        profile: &[DVec3],
        path: &Path,
        transition: Transition,
    ) -> CadResult<Solid> {
        if transition == Transition::Round {
            return Err(CadError::Unsupported("round sweep transitions".into()));
        }
        let edges = path.edges();
        let (Some(first_edge), Some(last_edge)) = (edges.first(), edges.last()) else {
            return Err(PathError::Empty.into());
        };
        let points = path.points();
        let origin = first_edge.start;
        if points.iter().any(|p| (p.z - origin.z).abs() > 1e-6) {
            return Err(CadError::Unsupported(
                "sweep along a non-horizontal path".into(),
            ));
        }

        let normals: Vec<DVec3> = edges
            .iter()
            .map(|e| e.direction().cross(DVec3::Z).normalize_or_zero())
            .collect();
        let tangent = first_edge.direction();
        let n0 = normals[0];
        if profile
            .iter()
            .any(|q| (*q - origin).dot(tangent).abs() > 1e-6)
        {
            tracing::warn!("sweep profile is not perpendicular to the path, projecting it");
        }
        let section = Contour::polygon(profile.iter().map(|q| {
            let d = *q - origin;
            DVec2::new(d.dot(n0), d.z)
        }))?;

        let closed = path.is_closed();
        if closed {
            let flat: Vec<DVec2> = points.iter().map(|p| p.truncate()).collect();
            let rail = Contour::polygon(flat.iter().copied())?;
            if rail.is_convex() {
                let outward = signed_area(&flat).signum();
                let body = sweep_around(&section, &rail, origin.z, outward)?;
                tracing::debug!(
                    "swept a {}-point profile around a {}-point convex rail",
                    section.len(),
                    rail.len()
                );
                return Ok(Solid::new(body));
            }
        }

        let last_normal = last_edge.direction().cross(DVec3::Z).normalize_or_zero();
        let mut frames = Vec::with_capacity(points.len());
        for (i, point) in points.iter().enumerate() {
            let after = normals.get(i).copied().unwrap_or(last_normal);
            let before = match i {
                0 if closed => last_normal,
                0 => after,
                _ => normals[i - 1],
            };
            let denom = 1.0 + before.dot(after);
            if denom < 1e-6 {
                return Err(CadError::Unsupported(
                    "sweep path turns back on itself".into(),
                ));
            }
            frames.push((*point, (before + after) / denom));
        }
        let at = |(point, miter): (DVec3, DVec3), s: DVec2| point + miter * s.x + DVec3::Z * s.y;
        let rings: Vec<Vec<DVec3>> = frames
            .iter()
            .map(|frame| section.points().iter().map(|s| at(*frame, *s)).collect())
            .collect();

        let count = rings.len();
        let ns = section.len();
        let mut builder = MeshBuilder::default();
        for k in 0..ns {
            let k2 = (k + 1) % ns;
            builder.surface((0..edges.len()).map(|i| {
                let i2 = (i + 1) % count;
                vec![rings[i][k], rings[i2][k], rings[i2][k2], rings[i][k2]]
            }));
        }
        if !closed {
            let cap = |frame: (DVec3, DVec3)| -> Vec<Vec<DVec3>> {
                if section.is_convex() {
                    vec![section.points().iter().map(|s| at(frame, *s)).collect()]
                } else {
                    triangulate(section.points(), &[])
                        .into_iter()
                        .map(|t| t.iter().map(|s| at(frame, *s)).collect())
                        .collect()
                }
            };
            builder.surface(cap(frames[0]));
            builder.surface(cap(frames[count - 1]).into_iter().map(reversed));
        }
        for ring in &rings {
            builder.loop_edges(ring);
        }
        for k in 0..ns {
            builder
                .edges
                .extend((0..edges.len()).map(|i| (rings[i][k], rings[(i + 1) % count][k])));
        }
        tracing::debug!(
            "swept a {ns}-point profile along {} segments",
            edges.len()
        );
        Ok(Solid::new(builder.finish()?))
    }

    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CadResult<Solid> {
        let body = boolean_bodies(body_of(a)?, body_of(b)?, op)?;
        Ok(Solid::new(body))
    }

    fn transform(&self, solid: &Solid, transform: &Transform) -> CadResult<Solid> {
        let body = body_of(solid)?;
        let matrix = Matrix4::from_column_slice(&transform.matrix().to_cols_array());
        let edges = body
            .edges
            .iter()
            .map(|(a, b)| (transform.apply(*a), transform.apply(*b)))
            .collect();
        Ok(Solid::new(Body {
            mesh: body.mesh.transform(&matrix),
            edges,
            next_face: body.next_face,
        }))
    }

    fn fillet(&self, solid: &Solid, edges: &[EdgeInfo], radius: f64) -> CadResult<Solid> {
        self.treat_edges(solid, edges, radius, false)
    }

    fn chamfer(&self, solid: &Solid, edges: &[EdgeInfo], size: f64) -> CadResult<Solid> {
        self.treat_edges(solid, edges, size, true)
    }

    fn edges(&self, solid: &Solid) -> CadResult<Vec<EdgeInfo>> {
        let body = body_of(solid)?;
        let facets = body.facets();
        let on_surface = |p: DVec3| facets.iter().any(|f| f.contains(p));
        let same = |a: DVec3, b: DVec3| a.distance(b) < 1e-7;
        let mut kept: Vec<(DVec3, DVec3)> = Vec::new();
        for &(a, b) in &body.edges {
            if same(a, b) {
                continue;
            }
            let duplicate = kept
                .iter()
                .any(|&(c, d)| (same(a, c) && same(b, d)) || (same(a, d) && same(b, c)));
            if duplicate || !on_surface((a + b) * 0.5) {
                continue;
            }
            kept.push((a, b));
        }
        Ok(kept
            .into_iter()
            .enumerate()
            .map(|(i, (a, b))| EdgeInfo::new(EdgeId::new(solid.id, i as u32), a, b))
            .collect())
    }

    fn faces(&self, solid: &Solid) -> CadResult<Vec<FaceInfo>> {
        let body = body_of(solid)?;
        let mut groups: BTreeMap<u32, Vec<Facet>> = BTreeMap::new();
        for facet in body.facets() {
            groups.entry(facet.face).or_default().push(facet);
        }
        let mut faces = Vec::with_capacity(groups.len());
        for (label, facets) in groups {
            let area: f64 = facets.iter().map(Facet::area).sum();
            if area < 1e-12 {
                continue;
            }
            let center = facets
                .iter()
                .map(|f| f.centroid() * f.area())
                .sum::<DVec3>()
                / area;
            let normal = facets
                .iter()
                .map(|f| f.normal * f.area())
                .sum::<DVec3>()
                .normalize_or_zero();
            let x_dir = face_x_dir(normal);
            let y_dir = normal.cross(x_dir);
            let mut min = DVec3::splat(f64::INFINITY);
            let mut max = DVec3::splat(f64::NEG_INFINITY);
            let mut x_range = (f64::INFINITY, f64::NEG_INFINITY);
            let mut y_range = (f64::INFINITY, f64::NEG_INFINITY);
            for v in facets.iter().flat_map(|f| f.vertices.iter()) {
                min = min.min(*v);
                max = max.max(*v);
                let (x, y) = (v.dot(x_dir), v.dot(y_dir));
                x_range = (x_range.0.min(x), x_range.1.max(x));
                y_range = (y_range.0.min(y), y_range.1.max(y));
            }
            faces.push(FaceInfo {
                id: FaceId::new(solid.id, label),
                center,
                normal,
                area,
                min,
                max,
                length: x_range.1 - x_range.0,
                width: y_range.1 - y_range.0,
            });
        }
        Ok(faces)
    }

    fn vertices(&self, solid: &Solid) -> CadResult<Vec<DVec3>> {
        let mut vertices: Vec<DVec3> = Vec::new();
        for edge in self.edges(solid)? {
            for p in [edge.start, edge.end] {
                if !vertices.iter().any(|v| v.distance(p) < 1e-7) {
                    vertices.push(p);
                }
            }
        }
        Ok(vertices)
    }

    fn bounding_box(&self, solid: &Solid) -> CadResult<BoundingBox> {
        Ok(body_of(solid)?.bounds())
    }

    fn volume(&self, solid: &Solid) -> CadResult<f64> {
        Ok(body_of(solid)?.volume())
    }

    fn tessellate(&self, solid: &Solid) -> CadResult<TessellatedMesh> {
        let body = body_of(solid)?;
        let mut mesh = TessellatedMesh::new();
        for polygon in &body.mesh.polygons {
            let Some(facet) = Facet::from_polygon(polygon) else {
                continue;
            };
            let normal = facet.normal.as_vec3().to_array();
            for triangle in polygon.triangulate() {
                let base = mesh.vertices.len() as u32;
                for vertex in triangle {
                    mesh.vertices.push(to_glam(&vertex.pos).as_vec3().to_array());
                    mesh.normals.push(normal);
                }
                mesh.indices.extend([base, base + 1, base + 2]);
            }
        }
        Ok(mesh)
    }
}
