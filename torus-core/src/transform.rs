//! Accumulated rotation state and the fixed-order point rotation
use nalgebra::{Point3, Rotation3};

use crate::geometry::Vertex3;
use crate::motion::Motion;

/// Rotation accumulated around three axes (in radians)
///
/// Angles grow without wrapping; sine and cosine don't care.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationAngles {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationAngles {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Add one frame of `velocity * speed`
    pub fn integrate(&mut self, motion: &Motion) {
        let step = motion.step();
        self.rotate(step.x, step.y, step.z);
    }

    /// The same rotation as a single matrix, `Rz * Ry * Rx`
    pub fn to_rotation(&self) -> Rotation3<f64> {
        Rotation3::from_euler_angles(self.x, self.y, self.z)
    }
}

impl Default for RotationAngles {
    fn default() -> Self {
        Self::zero()
    }
}

/// Rotate a point about X, then Y, then Z.
///
/// Applied as three in-place plane rotations; the order is fixed.
pub fn rotate_point(point: &Vertex3, angles: &RotationAngles) -> Vertex3 {
    let (mut x, mut y, mut z) = (point.x, point.y, point.z);

    let (sin, cos) = angles.x.sin_cos();
    (y, z) = (y * cos - z * sin, y * sin + z * cos);

    let (sin, cos) = angles.y.sin_cos();
    (x, z) = (x * cos + z * sin, -x * sin + z * cos);

    let (sin, cos) = angles.z.sin_cos();
    (x, y) = (x * cos - y * sin, x * sin + y * cos);

    Point3::new(x, y, z)
}
