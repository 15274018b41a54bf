use enclosure_cad::{CadKernel, CadResult, Contour, ExtrudeOptions, Plane, Sketch, Solid};
use glam::{DVec2, DVec3};

/// ZIF test socket and its lever, reaching out over the board edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zif {
    /// Reference corner of the socket, Z at the socket base
    pub position: DVec3,
    /// How far the lid overhangs the board edge along Y
    pub edge: f64,
}

impl Zif {
    /// Height of the cutter above the socket base
    const HOLE_DEPTH: f64 = 50.0;

    pub fn new(position: DVec3, edge: f64) -> Self {
        Self { position, edge }
    }

    /// Socket body, lever sweep and the two lever guides
    pub fn contours(&self) -> [Contour; 4] {
        let p = self.position.truncate();
        let e = self.edge;
        let body = 47.4 + e;
        [
            Contour::rectangle(
                p + DVec2::new(-7.5, e - 0.5 - body / 2.0),
                17.0,
                body,
            ),
            Contour::rectangle(p + DVec2::new(-8.0, e - 11.5), 18.0, 22.0),
            Contour::rectangle(p + DVec2::new(-8.0, e - 6.5), 20.0, 12.0),
            Contour::rectangle(p + DVec2::new(-8.5, e + 6.0), 21.0, 27.0),
        ]
    }

    pub fn sketch(&self) -> Sketch {
        self.contours().into_iter().collect()
    }

    /// Cutter clearing the socket through the lid and the front wall
    pub fn hole_outwards(&self, kernel: &dyn CadKernel) -> CadResult<Solid> {
        kernel.extrude(
            &self.sketch(),
            &Plane::offset_xy(self.position.z),
            Self::HOLE_DEPTH,
            ExtrudeOptions::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use enclosure_cad::MeshKernel;

    #[test]
    fn test_contours() {
        let zif = Zif::new(DVec3::new(25.0, 32.0, 7.0), 1.0);
        let [body, _, _, guide] = zif.contours();
        let (min, max) = body.bounds();
        assert_abs_diff_eq!(max.y, 32.0 + 1.0 - 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(max.y - min.y, 48.4, epsilon = 1e-9);
        assert_abs_diff_eq!(min.x, 25.0 - 7.5 - 8.5, epsilon = 1e-9);

        let (min, max) = guide.bounds();
        assert_abs_diff_eq!(min.y, 32.0 + 1.0 + 6.0 - 13.5, epsilon = 1e-9);
        assert_abs_diff_eq!(max.x, 25.0 - 8.5 + 10.5, epsilon = 1e-9);
    }

    #[test]
    fn test_hole_outwards() {
        let kernel = MeshKernel::new();
        let zif = Zif::new(DVec3::new(25.0, 32.0, 7.0), 1.0);
        let hole = zif.hole_outwards(&kernel).unwrap();
        let bounds = kernel.bounding_box(&hole).unwrap();
        assert_abs_diff_eq!(bounds.min.z, 7.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bounds.max.z, 57.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bounds.max.y, 32.0 + 1.0 + 6.0 + 13.5, epsilon = 1e-9);
    }
}
