//! # Spline module
//!
//! Continuous paths between poses, the optimiser which smooths a chain of them, and the
//! parameteriser which samples them into a discrete trajectory.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod optimiser;
pub mod parameteriser;
mod quintic;

pub use optimiser::{optimise, OptimiserError, OptimiserParams, OptimiserReport};
pub use parameteriser::{
    parameterise_spline, parameterise_splines, ParameteriserParams, ParameteriserReport,
};
pub use quintic::QuinticHermiteSpline;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::geom::{Pose2d, Pose2dWithCurvature, Rotation2d, Translation2d};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A curve through the plane parameterised by `t` in `[0, 1]`.
pub trait Spline {
    fn get_point(&self, t: f64) -> Translation2d;

    fn get_heading(&self, t: f64) -> Rotation2d;

    fn get_curvature(&self, t: f64) -> f64;

    /// Rate of change of curvature with respect to `t`.
    fn get_dcurvature(&self, t: f64) -> f64;

    /// Rate of change of arc length with respect to `t`.
    fn get_velocity(&self, t: f64) -> f64;

    fn get_pose(&self, t: f64) -> Pose2d {
        Pose2d::new(self.get_point(t), self.get_heading(t))
    }

    /// The pose at `t`, along with the curvature and its derivative with respect to arc length.
    fn get_pose_with_curvature(&self, t: f64) -> Pose2dWithCurvature {
        Pose2dWithCurvature::new(
            self.get_pose(t),
            self.get_curvature(t),
            self.get_dcurvature(t) / self.get_velocity(t),
        )
    }
}
