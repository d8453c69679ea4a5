//! # Geometry module
//!
//! Provides the algebra of 2D rigid body transforms (the SE(2) group) used to describe the
//! vehicle's pose along a trajectory.
//!
//! Every type here is an immutable value type. Capabilities shared between types (having a
//! position, having a heading, having a curvature, being interpolable) are expressed through the
//! small traits in this module rather than through a type hierarchy.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod pose;
mod pose_curv;
mod rotation;
mod translation;
mod twist;

pub use pose::Pose2d;
pub use pose_curv::Pose2dWithCurvature;
pub use rotation::Rotation2d;
pub use translation::Translation2d;
pub use twist::Twist2d;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Tolerance used for all geometric equality checks.
pub const EPSILON: f64 = util::maths::EPSILON;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A type which has a position in the plane.
pub trait HasTranslation {
    fn translation(&self) -> Translation2d;
}

/// A type which has a heading in the plane.
pub trait HasRotation {
    fn rotation(&self) -> Rotation2d;
}

/// A type which carries the curvature of the path it lies on.
pub trait HasCurvature {
    /// Curvature in 1/length units, positive when turning anticlockwise.
    fn curvature(&self) -> f64;

    /// Rate of change of curvature with respect to arc length.
    fn dcurvature_ds(&self) -> f64;
}

/// A type which can be interpolated between two values of itself.
pub trait Interpolable {
    /// Interpolate between `self` (at `x = 0`) and `other` (at `x = 1`).
    ///
    /// `x` is clamped into `[0, 1]`.
    fn interpolate(&self, other: &Self, x: f64) -> Self;
}
