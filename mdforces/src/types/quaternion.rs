//! Quaternions, used to represent the orientation of anisotropic particles
use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq, UlpsEq};

use super::{Matrix3, Vector3D};

/// A quaternion `w + x i + y j + z k`, stored as a scalar part `w` and a
/// vector part `(x, y, z)`. Orientations are represented by unit quaternions.
#[derive(Copy, Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
pub struct Quaternion {
    /// Scalar part
    pub w: f64,
    /// Vector part
    pub v: Vector3D,
}

impl Default for Quaternion {
    fn default() -> Quaternion {
        Quaternion::identity()
    }
}

impl Quaternion {
    /// Create a new quaternion from its four components
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Quaternion {
        Quaternion { w: w, v: Vector3D::new(x, y, z) }
    }

    /// The identity rotation
    pub fn identity() -> Quaternion {
        Quaternion { w: 1.0, v: Vector3D::zero() }
    }

    /// Create the quaternion rotating by `angle` (in radians) around `axis`.
    /// The axis does not need to be normalized.
    pub fn from_axis_angle(axis: Vector3D, angle: f64) -> Quaternion {
        let (sin, cos) = f64::sin_cos(0.5 * angle);
        Quaternion { w: cos, v: sin * axis.normalized() }
    }

    /// Get the squared norm of this quaternion
    pub fn norm2(&self) -> f64 {
        self.w * self.w + self.v.norm2()
    }

    /// Get a unit quaternion pointing in the same direction as this one. A
    /// zero quaternion normalizes to the identity.
    #[must_use]
    pub fn normalized(&self) -> Quaternion {
        let norm = f64::sqrt(self.norm2());
        if norm < 1e-12 {
            return Quaternion::identity();
        }
        Quaternion { w: self.w / norm, v: self.v / norm }
    }

    /// Get the conjugate of this quaternion, which is also the inverse
    /// rotation for unit quaternions.
    #[must_use]
    pub fn conjugate(&self) -> Quaternion {
        Quaternion { w: self.w, v: -self.v }
    }

    /// Rotate `vector` by this (unit) quaternion, computing `q v q*`
    pub fn rotate(&self, vector: Vector3D) -> Vector3D {
        let t = 2.0 * (self.v ^ vector);
        vector + self.w * t + (self.v ^ t)
    }

    /// Get the rotation matrix corresponding to this (unit) quaternion
    pub fn to_matrix(&self) -> Matrix3 {
        let w = self.w;
        let (x, y, z) = (self.v[0], self.v[1], self.v[2]);

        Matrix3::new([
            [1.0 - 2.0 * (y * y + z * z), 2.0 * (x * y - w * z), 2.0 * (x * z + w * y)],
            [2.0 * (x * y + w * z), 1.0 - 2.0 * (x * x + z * z), 2.0 * (y * z - w * x)],
            [2.0 * (x * z - w * y), 2.0 * (y * z + w * x), 1.0 - 2.0 * (x * x + y * y)],
        ])
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Quaternion;

    /// Hamilton product, `self * other` applies `other` first, then `self`
    fn mul(self, other: Quaternion) -> Quaternion {
        Quaternion {
            w: self.w * other.w - self.v * other.v,
            v: (self.v ^ other.v) + self.w * other.v + other.w * self.v,
        }
    }
}

impl AbsDiffEq for Quaternion {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Quaternion, epsilon: f64) -> bool {
        f64::abs_diff_eq(&self.w, &other.w, epsilon) &&
        Vector3D::abs_diff_eq(&self.v, &other.v, epsilon)
    }
}

impl RelativeEq for Quaternion {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Quaternion, epsilon: f64, max_relative: f64) -> bool {
        f64::relative_eq(&self.w, &other.w, epsilon, max_relative) &&
        Vector3D::relative_eq(&self.v, &other.v, epsilon, max_relative)
    }
}

impl UlpsEq for Quaternion {
    fn default_max_ulps() -> u32 {
        f64::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Quaternion, epsilon: f64, max_ulps: u32) -> bool {
        f64::ulps_eq(&self.w, &other.w, epsilon, max_ulps) &&
        Vector3D::ulps_eq(&self.v, &other.v, epsilon, max_ulps)
    }
}
