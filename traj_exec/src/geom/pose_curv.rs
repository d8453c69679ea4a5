//! Poses which also carry the curvature of the path through them

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use serde::{Deserialize, Serialize};
use util::maths::lin_interp;

use super::{
    HasCurvature, HasRotation, HasTranslation, Interpolable, Pose2d, Rotation2d, Translation2d,
    EPSILON,
};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A pose sampled from a path, along with the curvature of the path at that pose and the rate at
/// which that curvature is changing with respect to distance along the path.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct Pose2dWithCurvature {
    pose: Pose2d,
    curvature: f64,
    dcurvature_ds: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Pose2dWithCurvature {
    pub fn new(pose: Pose2d, curvature: f64, dcurvature_ds: f64) -> Self {
        Self {
            pose,
            curvature,
            dcurvature_ds,
        }
    }

    /// A pose on a straight path.
    pub fn from_pose(pose: Pose2d) -> Self {
        Self::new(pose, 0.0, 0.0)
    }

    pub fn identity() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> Pose2d {
        self.pose
    }

    pub fn transform_by(&self, transform: &Pose2d) -> Self {
        Self::new(
            self.pose.transform_by(transform),
            self.curvature,
            self.dcurvature_ds,
        )
    }

    /// Reflect across the x axis, which reverses the direction of turn.
    pub fn mirror(&self) -> Self {
        Self::new(self.pose.mirror(), -self.curvature, -self.dcurvature_ds)
    }

    pub fn distance(&self, other: &Pose2dWithCurvature) -> f64 {
        self.pose.distance(&other.pose)
    }

    pub fn epsilon_equals(&self, other: &Pose2dWithCurvature, epsilon: f64) -> bool {
        self.pose.epsilon_equals(&other.pose, epsilon)
            && util::maths::epsilon_equals(self.curvature, other.curvature, epsilon)
            && util::maths::epsilon_equals(self.dcurvature_ds, other.dcurvature_ds, epsilon)
    }
}

impl HasTranslation for Pose2dWithCurvature {
    fn translation(&self) -> Translation2d {
        self.pose.translation()
    }
}

impl HasRotation for Pose2dWithCurvature {
    fn rotation(&self) -> Rotation2d {
        self.pose.rotation()
    }
}

impl HasCurvature for Pose2dWithCurvature {
    fn curvature(&self) -> f64 {
        self.curvature
    }

    fn dcurvature_ds(&self) -> f64 {
        self.dcurvature_ds
    }
}

impl Interpolable for Pose2dWithCurvature {
    /// The pose follows the arc between the two poses, curvature terms are interpolated linearly.
    fn interpolate(&self, other: &Self, x: f64) -> Self {
        Self::new(
            self.pose.interpolate(&other.pose, x),
            lin_interp(self.curvature, other.curvature, x),
            lin_interp(self.dcurvature_ds, other.dcurvature_ds, x),
        )
    }
}

impl PartialEq for Pose2dWithCurvature {
    fn eq(&self, other: &Self) -> bool {
        self.epsilon_equals(other, EPSILON)
    }
}

impl fmt::Display for Pose2dWithCurvature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, k:{:.4}, dk/ds:{:.4}",
            self.pose, self.curvature, self.dcurvature_ds
        )
    }
}
