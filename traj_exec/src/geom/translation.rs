//! Translations in the plane

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{fmt, ops};

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::{HasTranslation, Interpolable, Rotation2d, EPSILON};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A shift in the (x, y) plane.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Translation2d {
    vec: Vector2<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Translation2d {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            vec: Vector2::new(x, y),
        }
    }

    /// The zero translation.
    pub fn identity() -> Self {
        Self::new(0.0, 0.0)
    }

    /// The translation which moves `start` onto `end`.
    pub fn between(start: &Translation2d, end: &Translation2d) -> Self {
        Self {
            vec: end.vec - start.vec,
        }
    }

    /// A translation of the given magnitude in the given direction.
    pub fn from_polar(direction: &Rotation2d, magnitude: f64) -> Self {
        Self::new(direction.cos() * magnitude, direction.sin() * magnitude)
    }

    pub fn x(&self) -> f64 {
        self.vec.x
    }

    pub fn y(&self) -> f64 {
        self.vec.y
    }

    /// The underlying vector.
    pub fn as_vector(&self) -> &Vector2<f64> {
        &self.vec
    }

    /// Euclidian length of the translation.
    pub fn norm(&self) -> f64 {
        self.vec.norm()
    }

    /// Squared euclidian length of the translation.
    pub fn norm2(&self) -> f64 {
        self.vec.norm_squared()
    }

    /// Compose two translations by adding their shifts.
    pub fn translate_by(&self, other: &Translation2d) -> Self {
        Self {
            vec: self.vec + other.vec,
        }
    }

    /// Rotate this translation about the origin.
    pub fn rotate_by(&self, rotation: &Rotation2d) -> Self {
        Self::new(
            self.x() * rotation.cos() - self.y() * rotation.sin(),
            self.x() * rotation.sin() + self.y() * rotation.cos(),
        )
    }

    /// The direction this translation points in.
    pub fn direction(&self) -> Rotation2d {
        Rotation2d::new(self.x(), self.y(), true)
    }

    /// The translation which undoes this one.
    pub fn inverse(&self) -> Self {
        Self { vec: -self.vec }
    }

    pub fn scale(&self, s: f64) -> Self {
        Self { vec: self.vec * s }
    }

    /// Linear interpolation or extrapolation towards `other`, without clamping `x`.
    pub fn extrapolate(&self, other: &Translation2d, x: f64) -> Self {
        Self {
            vec: self.vec + (other.vec - self.vec) * x,
        }
    }

    /// Distance between the two points.
    pub fn distance(&self, other: &Translation2d) -> f64 {
        Self::between(self, other).norm()
    }

    pub fn epsilon_equals(&self, other: &Translation2d, epsilon: f64) -> bool {
        util::maths::epsilon_equals(self.x(), other.x(), epsilon)
            && util::maths::epsilon_equals(self.y(), other.y(), epsilon)
    }

    pub fn dot(a: &Translation2d, b: &Translation2d) -> f64 {
        a.vec.dot(&b.vec)
    }

    /// The z component of the 3D cross product of the two translations.
    pub fn cross(a: &Translation2d, b: &Translation2d) -> f64 {
        a.vec.perp(&b.vec)
    }

    /// The unsigned angle between two translations.
    ///
    /// If either translation has zero length the angle is undefined and the identity rotation is
    /// returned.
    pub fn angle_between(a: &Translation2d, b: &Translation2d) -> Rotation2d {
        let cos_angle = Self::dot(a, b) / (a.norm() * b.norm());

        if cos_angle.is_nan() {
            Rotation2d::identity()
        } else {
            Rotation2d::from_radians(util::maths::clamp(cos_angle, -1.0, 1.0).acos())
        }
    }
}

impl Default for Translation2d {
    fn default() -> Self {
        Self::identity()
    }
}

impl HasTranslation for Translation2d {
    fn translation(&self) -> Translation2d {
        *self
    }
}

impl Interpolable for Translation2d {
    fn interpolate(&self, other: &Self, x: f64) -> Self {
        if x <= 0.0 {
            *self
        } else if x >= 1.0 {
            *other
        } else {
            self.extrapolate(other, x)
        }
    }
}

impl PartialEq for Translation2d {
    fn eq(&self, other: &Self) -> bool {
        self.distance(other) < EPSILON
    }
}

impl From<Vector2<f64>> for Translation2d {
    fn from(vec: Vector2<f64>) -> Self {
        Self { vec }
    }
}

impl From<Translation2d> for Vector2<f64> {
    fn from(t: Translation2d) -> Self {
        t.vec
    }
}

impl ops::Add for Translation2d {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.translate_by(&rhs)
    }
}

impl ops::Sub for Translation2d {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::between(&rhs, &self)
    }
}

impl ops::Neg for Translation2d {
    type Output = Self;

    fn neg(self) -> Self {
        self.inverse()
    }
}

impl ops::Mul<f64> for Translation2d {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl fmt::Display for Translation2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3},{:.3})", self.x(), self.y())
    }
}
