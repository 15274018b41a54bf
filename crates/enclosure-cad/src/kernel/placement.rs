//! Sketch planes and rigid placements

use std::ops::Mul;

use glam::{DAffine3, DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use super::traits::FaceInfo;

/// Local x direction used for a face with the given normal.
///
/// Horizontal faces use world X. Other faces use the horizontal direction
/// `Z × normal`, so vertical faces get local y = +Z.
pub fn face_x_dir(normal: DVec3) -> DVec3 {
    if normal.z.abs() > 0.9 {
        DVec3::X
    } else {
        DVec3::Z.cross(normal).normalize_or_zero()
    }
}

/// An oriented plane in space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Origin of the plane
    pub origin: DVec3,
    /// Local x axis (unit, in the plane)
    pub x_dir: DVec3,
    /// Normal (unit)
    pub z_dir: DVec3,
}

impl Default for Plane {
    fn default() -> Self {
        Self::XY
    }
}

impl Plane {
    /// The world XY plane at the origin
    pub const XY: Plane = Plane {
        origin: DVec3::ZERO,
        x_dir: DVec3::X,
        z_dir: DVec3::Z,
    };

    /// Create a plane; `x_dir` is made orthogonal to the normal
    pub fn new(origin: DVec3, x_dir: DVec3, z_dir: DVec3) -> Self {
        let z_dir = z_dir.normalize_or_zero();
        let x_dir = (x_dir - z_dir * x_dir.dot(z_dir)).normalize_or_zero();
        Self {
            origin,
            x_dir,
            z_dir,
        }
    }

    /// World XY plane lifted to height `z`
    pub fn offset_xy(z: f64) -> Self {
        Self::at(DVec3::new(0.0, 0.0, z))
    }

    /// World XY orientation at `origin`
    pub fn at(origin: DVec3) -> Self {
        Self {
            origin,
            ..Self::XY
        }
    }

    /// Plane of a face: origin at its center, normal along the face normal
    pub fn from_face(face: &FaceInfo) -> Self {
        Self {
            origin: face.center,
            x_dir: face_x_dir(face.normal),
            z_dir: face.normal,
        }
    }

    /// Local y axis
    pub fn y_dir(&self) -> DVec3 {
        self.z_dir.cross(self.x_dir)
    }

    /// Same plane facing the other way (x kept, y and z flipped)
    pub fn reversed(&self) -> Self {
        Self {
            z_dir: -self.z_dir,
            ..*self
        }
    }

    /// Same orientation at another origin
    pub fn shifted(&self, origin: DVec3) -> Self {
        Self { origin, ..*self }
    }

    /// Move the plane along its normal
    pub fn offset(&self, distance: f64) -> Self {
        self.shifted(self.origin + self.z_dir * distance)
    }

    /// Local coordinates to world space
    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.origin + self.x_dir * local.x + self.y_dir() * local.y + self.z_dir * local.z
    }

    /// World point to local coordinates
    pub fn to_local(&self, world: DVec3) -> DVec3 {
        let d = world - self.origin;
        DVec3::new(d.dot(self.x_dir), d.dot(self.y_dir()), d.dot(self.z_dir))
    }
}

/// A rigid placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(pub DAffine3);

impl Default for Transform {
    fn default() -> Self {
        Self(DAffine3::IDENTITY)
    }
}

impl Transform {
    pub fn translation(offset: DVec3) -> Self {
        Self(DAffine3::from_translation(offset))
    }

    /// Rotation from Euler angles in degrees, applied about the fixed X, then
    /// Y, then Z axes
    pub fn rotation_deg(x: f64, y: f64, z: f64) -> Self {
        let q = DQuat::from_rotation_z(z.to_radians())
            * DQuat::from_rotation_y(y.to_radians())
            * DQuat::from_rotation_x(x.to_radians());
        Self(DAffine3::from_quat(q))
    }

    pub fn apply(&self, point: DVec3) -> DVec3 {
        self.0.transform_point3(point)
    }

    /// Column-major 4x4 matrix
    pub fn matrix(&self) -> DMat4 {
        DMat4::from(self.0)
    }
}

impl Mul for Transform {
    type Output = Transform;

    /// `a * b` applies `b` first
    fn mul(self, rhs: Transform) -> Transform {
        Transform(self.0 * rhs.0)
    }
}
