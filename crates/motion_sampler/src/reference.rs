//! Reference-frame projection
//!
//! A derived view over raw attitude: `mirror(current * inverse(reference))`.
//! The raw attitude stored in each sample is never altered, so the
//! projection can be recomputed from a recording at any time.

use contracts::{Attitude, TransformedRotation};
use nalgebra::{Quaternion, UnitQuaternion};

/// Captured reference orientation
///
/// Holds the inverse of the reference rotation so each projection is one
/// quaternion product.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceFrame {
    inverse: UnitQuaternion<f64>,
}

impl ReferenceFrame {
    /// Capture `attitude` as the new reference
    pub fn capture(attitude: &Attitude) -> Self {
        Self {
            inverse: attitude_rotation(attitude).inverse(),
        }
    }

    /// Identity reference: projections equal the mirrored raw rotation
    pub fn identity() -> Self {
        Self {
            inverse: UnitQuaternion::identity(),
        }
    }

    /// Rotation of `attitude` relative to this reference, mirrored
    ///
    /// The stored quaternion is the conjugated form `M * R * M` with
    /// `M = diag(-1, 1, 1)`, not the improper product `M * R`.
    pub fn project(&self, attitude: &Attitude) -> TransformedRotation {
        let relative = attitude_rotation(attitude) * self.inverse;
        to_transformed(&mirror(&relative))
    }

    /// Relative rotation before mirroring
    pub fn relative(&self, attitude: &Attitude) -> UnitQuaternion<f64> {
        attitude_rotation(attitude) * self.inverse
    }
}

/// Rotation described by roll/pitch/yaw (radians)
pub fn attitude_rotation(attitude: &Attitude) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(attitude.roll, attitude.pitch, attitude.yaw)
}

/// Conjugate a rotation by the reflection `diag(-1, 1, 1)`
///
/// Viewer space mirrors the device x axis. Reflecting twice keeps the result
/// a proper rotation: axis `(x, y, z)` becomes `(x, -y, -z)`.
pub fn mirror(rotation: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    let q = rotation.quaternion();
    UnitQuaternion::new_unchecked(Quaternion::new(q.w, q.i, -q.j, -q.k))
}

fn to_transformed(rotation: &UnitQuaternion<f64>) -> TransformedRotation {
    let q = rotation.quaternion();
    TransformedRotation {
        x: q.i,
        y: q.j,
        z: q.k,
        w: q.w,
    }
}
