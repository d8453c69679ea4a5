//! Twists, i.e. elements of the SE(2) Lie algebra

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use serde::{Deserialize, Serialize};

use super::EPSILON;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A movement along an arc of constant curvature.
///
/// A twist can describe the difference between two poses, a velocity, and so on. It is an element
/// of the tangent space and is only ever scaled, never composed like a pose. Use
/// [`super::Pose2d::exp`] and [`super::Pose2d::log`] to move between twists and poses.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Twist2d {
    /// Forward component
    pub dx: f64,

    /// Lateral component
    pub dy: f64,

    /// Angular component, in radians
    pub dtheta: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Twist2d {
    pub fn new(dx: f64, dy: f64, dtheta: f64) -> Self {
        Self { dx, dy, dtheta }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    pub fn scaled(&self, scale: f64) -> Self {
        Self::new(self.dx * scale, self.dy * scale, self.dtheta * scale)
    }

    /// Length of the translational part.
    pub fn norm(&self) -> f64 {
        // Common case of no lateral motion
        if self.dy == 0.0 {
            self.dx.abs()
        } else {
            self.dx.hypot(self.dy)
        }
    }

    /// Curvature of the arc, zero if the twist has no length and no rotation.
    pub fn curvature(&self) -> f64 {
        if self.dtheta.abs() < EPSILON && self.norm() < EPSILON {
            0.0
        } else {
            self.dtheta / self.norm()
        }
    }
}

impl fmt::Display for Twist2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.3},{:.3},{:.3} deg)",
            self.dx,
            self.dy,
            self.dtheta.to_degrees()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_twist() {
        let t = Twist2d::new(3.0, -4.0, 0.5);
        assert_relative_eq!(t.norm(), 5.0);
        assert_relative_eq!(t.curvature(), 0.1);
        assert_eq!(t.scaled(2.0), Twist2d::new(6.0, -8.0, 1.0));

        assert_relative_eq!(Twist2d::new(-2.0, 0.0, 0.0).norm(), 2.0);
        assert_eq!(Twist2d::identity().curvature(), 0.0);

        // Pure rotation has infinite curvature
        assert!(Twist2d::new(0.0, 0.0, 1.0).curvature().is_infinite());
    }
}
