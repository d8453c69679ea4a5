//! Rotations in the plane

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use nalgebra::{Complex, UnitComplex};
use serde::{Deserialize, Serialize};

use super::{HasRotation, Interpolable, Translation2d, EPSILON};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A rotation in the plane, stored as a point on the unit circle.
///
/// The real part of the underlying complex number is the cosine of the angle and the imaginary
/// part the sine. The angle itself is only ever derived, never stored, so there is no wrapping to
/// manage.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Rotation2d {
    q: UnitComplex<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Rotation2d {
    /// Create a rotation from the point `(x, y)`.
    ///
    /// If `normalise` is set the point is scaled onto the unit circle, with the zero vector
    /// giving the identity. Otherwise the point must already be on the unit circle.
    pub fn new(x: f64, y: f64, normalise: bool) -> Self {
        if normalise {
            let magnitude = x.hypot(y);
            if magnitude > EPSILON {
                Self::from_cos_sin(x / magnitude, y / magnitude)
            } else {
                Self::identity()
            }
        } else {
            debug_assert!(
                (x * x + y * y - 1.0).abs() < 1e-6,
                "({}, {}) is not on the unit circle",
                x,
                y
            );
            Self::from_cos_sin(x, y)
        }
    }

    /// The zero rotation.
    pub fn identity() -> Self {
        Self {
            q: UnitComplex::identity(),
        }
    }

    pub fn from_radians(angle_rad: f64) -> Self {
        Self {
            q: UnitComplex::new(angle_rad),
        }
    }

    pub fn from_degrees(angle_deg: f64) -> Self {
        Self::from_radians(angle_deg.to_radians())
    }

    fn from_cos_sin(cos: f64, sin: f64) -> Self {
        Self {
            q: UnitComplex::new_unchecked(Complex::new(cos, sin)),
        }
    }

    /// The underlying unit complex number.
    pub fn as_unit_complex(&self) -> &UnitComplex<f64> {
        &self.q
    }

    pub fn cos(&self) -> f64 {
        self.q.cos_angle()
    }

    pub fn sin(&self) -> f64 {
        self.q.sin_angle()
    }

    /// Tangent of the angle, which is +/- infinity when the rotation is vertical.
    pub fn tan(&self) -> f64 {
        if self.cos().abs() < EPSILON {
            if self.sin() >= 0.0 {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            }
        } else {
            self.sin() / self.cos()
        }
    }

    /// The angle in radians, in the range `(-pi, pi]`.
    pub fn radians(&self) -> f64 {
        self.sin().atan2(self.cos())
    }

    pub fn degrees(&self) -> f64 {
        self.radians().to_degrees()
    }

    /// Compose two rotations by adding their angles.
    ///
    /// The result is renormalised to remove accumulated rounding error.
    pub fn rotate_by(&self, other: &Rotation2d) -> Self {
        Self::new(
            self.cos() * other.cos() - self.sin() * other.sin(),
            self.cos() * other.sin() + self.sin() * other.cos(),
            true,
        )
    }

    /// This rotation turned by a further 90 degrees.
    pub fn normal(&self) -> Self {
        Self::from_cos_sin(-self.sin(), self.cos())
    }

    /// The rotation which undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            q: self.q.inverse(),
        }
    }

    /// True if the two rotations point along the same line, in either direction.
    pub fn is_parallel(&self, other: &Rotation2d) -> bool {
        util::maths::epsilon_equals(
            Translation2d::cross(&self.to_translation(), &other.to_translation()),
            0.0,
            EPSILON,
        )
    }

    /// The unit vector pointing along this rotation.
    pub fn to_translation(&self) -> Translation2d {
        Translation2d::new(self.cos(), self.sin())
    }

    /// The rotation of the axis nearest to this one.
    pub fn nearest_pole(&self) -> Self {
        if self.cos().abs() > self.sin().abs() {
            Self::from_cos_sin(self.cos().signum(), 0.0)
        } else {
            Self::from_cos_sin(0.0, self.sin().signum())
        }
    }

    /// The signed angle, in radians, to turn from this rotation to `other`.
    pub fn distance(&self, other: &Rotation2d) -> f64 {
        self.inverse().rotate_by(other).radians()
    }

    pub fn epsilon_equals(&self, other: &Rotation2d, epsilon: f64) -> bool {
        self.distance(other).abs() < epsilon
    }
}

impl Default for Rotation2d {
    fn default() -> Self {
        Self::identity()
    }
}

impl HasRotation for Rotation2d {
    fn rotation(&self) -> Rotation2d {
        *self
    }
}

impl Interpolable for Rotation2d {
    /// Interpolates the shortest way round the circle.
    fn interpolate(&self, other: &Self, x: f64) -> Self {
        if x <= 0.0 {
            *self
        } else if x >= 1.0 {
            *other
        } else {
            self.rotate_by(&Self::from_radians(self.distance(other) * x))
        }
    }
}

impl PartialEq for Rotation2d {
    fn eq(&self, other: &Self) -> bool {
        self.epsilon_equals(other, EPSILON)
    }
}

impl fmt::Display for Rotation2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3} deg)", self.degrees())
    }
}
