//! Rigid transforms in the plane

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use super::{HasRotation, HasTranslation, Interpolable, Rotation2d, Translation2d, Twist2d, EPSILON};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Below this angle the exponential and logarithm maps switch to their Taylor expansions.
const EXP_LOG_EPSILON: f64 = 1e-9;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A pose (rigid transform) in the plane, made up of a translation and a rotation.
///
/// Poses form a group under [`Pose2d::transform_by`], with [`Pose2d::identity`] as the identity
/// element and [`Pose2d::inverse`] as the inverse.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct Pose2d {
    translation: Translation2d,
    rotation: Rotation2d,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Pose2d {
    pub fn new(translation: Translation2d, rotation: Rotation2d) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn from_xy(x: f64, y: f64, rotation: Rotation2d) -> Self {
        Self::new(Translation2d::new(x, y), rotation)
    }

    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_translation(translation: Translation2d) -> Self {
        Self::new(translation, Rotation2d::identity())
    }

    pub fn from_rotation(rotation: Rotation2d) -> Self {
        Self::new(Translation2d::identity(), rotation)
    }

    /// Compose this transform with `other`.
    ///
    /// `other` is expressed in this pose's frame: the result is found by translating by
    /// `other`'s translation rotated into this frame, then rotating by `other`'s rotation. This
    /// is not commutative.
    pub fn transform_by(&self, other: &Pose2d) -> Self {
        Self::new(
            self.translation
                .translate_by(&other.translation.rotate_by(&self.rotation)),
            self.rotation.rotate_by(&other.rotation),
        )
    }

    /// The transform which undoes this one.
    pub fn inverse(&self) -> Self {
        let rotation_inv = self.rotation.inverse();
        Self::new(
            self.translation.inverse().rotate_by(&rotation_inv),
            rotation_inv,
        )
    }

    /// This pose turned by a further 90 degrees.
    pub fn normal(&self) -> Self {
        Self::new(self.translation, self.rotation.normal())
    }

    /// Reflect this pose across the x axis.
    pub fn mirror(&self) -> Self {
        Self::new(
            Translation2d::new(self.translation.x(), -self.translation.y()),
            self.rotation.inverse(),
        )
    }

    /// The pose reached by following the constant curvature motion described by `delta`.
    ///
    /// This is the exponential map of SE(2), see
    /// https://github.com/strasdat/Sophus/blob/master/sophus/se2.hpp.
    pub fn exp(delta: &Twist2d) -> Self {
        let sin_theta = delta.dtheta.sin();
        let cos_theta = delta.dtheta.cos();

        // s = sin(theta)/theta, c = (1 - cos(theta))/theta, both of which are 0/0 at theta = 0
        let (s, c) = if delta.dtheta.abs() < EXP_LOG_EPSILON {
            (
                1.0 - 1.0 / 6.0 * delta.dtheta * delta.dtheta,
                0.5 * delta.dtheta,
            )
        } else {
            (sin_theta / delta.dtheta, (1.0 - cos_theta) / delta.dtheta)
        };

        Self::new(
            Translation2d::new(delta.dx * s - delta.dy * c, delta.dx * c + delta.dy * s),
            Rotation2d::new(cos_theta, sin_theta, false),
        )
    }

    /// The constant curvature motion which reaches `transform`, the inverse of [`Pose2d::exp`].
    pub fn log(transform: &Pose2d) -> Twist2d {
        let dtheta = transform.rotation.radians();
        let half_dtheta = 0.5 * dtheta;
        let cos_minus_one = transform.rotation.cos() - 1.0;

        let half_theta_by_tan_half_dtheta = if cos_minus_one.abs() < EXP_LOG_EPSILON {
            1.0 - 1.0 / 12.0 * dtheta * dtheta
        } else {
            -(half_dtheta * transform.rotation.sin()) / cos_minus_one
        };

        // Scale and rotate by [[h, halfθ], [-halfθ, h]], which is not a pure rotation
        let v = Matrix2::new(
            half_theta_by_tan_half_dtheta,
            half_dtheta,
            -half_dtheta,
            half_theta_by_tan_half_dtheta,
        ) * Vector2::new(transform.translation.x(), transform.translation.y());

        Twist2d::new(v.x, v.y, dtheta)
    }

    /// The twist taking this pose to `other`, expressed in this pose's frame.
    pub fn twist_to(&self, other: &Pose2d) -> Twist2d {
        Self::log(&self.inverse().transform_by(other))
    }

    /// Find the point where the heading lines of the two poses cross.
    ///
    /// Returns `None` if the lines are parallel.
    pub fn intersection(&self, other: &Pose2d) -> Option<Translation2d> {
        if self.rotation.is_parallel(&other.rotation) {
            return None;
        }

        // Solve along whichever line is closer to vertical, so that the tangent of the other
        // line is well conditioned
        if self.rotation.cos().abs() < other.rotation.cos().abs() {
            Self::intersection_internal(self, other)
        } else {
            Self::intersection_internal(other, self)
        }
    }

    fn intersection_internal(a: &Pose2d, b: &Pose2d) -> Option<Translation2d> {
        let tan_b = b.rotation.tan();

        let t = ((a.translation.x() - b.translation.x()) * tan_b + b.translation.y()
            - a.translation.y())
            / (a.rotation.sin() - a.rotation.cos() * tan_b);

        if t.is_finite() {
            Some(
                a.translation
                    .translate_by(&a.rotation.to_translation().scale(t)),
            )
        } else {
            None
        }
    }

    /// True if `other` lies on the straight line through this pose, facing along it.
    pub fn is_colinear(&self, other: &Pose2d) -> bool {
        if !self.rotation.is_parallel(&other.rotation) {
            return false;
        }

        let twist = self.twist_to(other);
        util::maths::epsilon_equals(twist.dy, 0.0, EPSILON)
            && util::maths::epsilon_equals(twist.dtheta, 0.0, EPSILON)
    }

    /// Length of the constant curvature motion between the two poses.
    pub fn distance(&self, other: &Pose2d) -> f64 {
        self.twist_to(other).norm()
    }

    pub fn epsilon_equals(&self, other: &Pose2d, epsilon: f64) -> bool {
        self.translation.epsilon_equals(&other.translation, epsilon)
            && self.rotation.is_parallel(&other.rotation)
    }
}

impl HasTranslation for Pose2d {
    fn translation(&self) -> Translation2d {
        self.translation
    }
}

impl HasRotation for Pose2d {
    fn rotation(&self) -> Rotation2d {
        self.rotation
    }
}

impl Interpolable for Pose2d {
    /// Interpolates along the constant curvature arc joining the two poses.
    fn interpolate(&self, other: &Self, x: f64) -> Self {
        if x <= 0.0 {
            *self
        } else if x >= 1.0 {
            *other
        } else {
            self.transform_by(&Self::exp(&self.twist_to(other).scaled(x)))
        }
    }
}

impl PartialEq for Pose2d {
    fn eq(&self, other: &Self) -> bool {
        self.epsilon_equals(other, EPSILON)
    }
}

impl fmt::Display for Pose2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T:{}, R:{}", self.translation, self.rotation)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn test_poses() -> Vec<Pose2d> {
        vec![
            Pose2d::identity(),
            Pose2d::from_xy(1.0, 2.0, Rotation2d::from_degrees(30.0)),
            Pose2d::from_xy(-5.0, 0.5, Rotation2d::from_degrees(-135.0)),
            Pose2d::from_xy(120.0, -60.0, Rotation2d::from_degrees(179.0)),
            Pose2d::from_xy(0.0, 3.0, Rotation2d::from_radians(1e-10)),
            Pose2d::from_xy(7.0, 0.0, Rotation2d::from_degrees(90.0)),
        ]
    }

    #[test]
    fn test_transform_by() {
        let a = Pose2d::from_xy(2.0, 0.0, Rotation2d::from_degrees(90.0));
        let b = Pose2d::from_xy(1.0, 0.0, Rotation2d::from_degrees(90.0));

        // b's forward is a's left
        let ab = a.transform_by(&b);
        assert!(ab.translation().epsilon_equals(&Translation2d::new(2.0, 1.0), 1e-9));
        assert!(ab
            .rotation()
            .epsilon_equals(&Rotation2d::from_degrees(180.0), 1e-9));

        // Not commutative
        let ba = b.transform_by(&a);
        assert!(ba.translation().epsilon_equals(&Translation2d::new(1.0, 2.0), 1e-9));
    }

    #[test]
    fn test_inverse() {
        for p in test_poses() {
            let identity = p.transform_by(&p.inverse());
            assert!(identity.epsilon_equals(&Pose2d::identity(), 1e-9));
            assert_relative_eq!(identity.rotation().radians(), 0.0, epsilon = 1e-9);

            let identity = p.inverse().transform_by(&p);
            assert!(identity.epsilon_equals(&Pose2d::identity(), 1e-9));
        }
    }

    #[test]
    fn test_exp_log() {
        // exp(log(p)) = p
        for p in test_poses() {
            let p2 = Pose2d::exp(&Pose2d::log(&p));
            assert!(
                p2.translation().epsilon_equals(&p.translation(), 1e-9),
                "{} != {}",
                p2,
                p
            );
            assert!(p2.rotation().epsilon_equals(&p.rotation(), 1e-9));
        }

        // log(exp(t)) = t
        let twists = [
            Twist2d::new(1.0, 0.0, 0.0),
            Twist2d::new(1.0, 0.5, 1e-10),
            Twist2d::new(-2.0, 0.1, 0.9e-9),
            Twist2d::new(0.5, -0.3, 1.1e-9),
            Twist2d::new(1.5, 0.2, 0.3),
            Twist2d::new(0.0, 1.0, -1.2),
        ];
        for t in twists.iter() {
            let t2 = Pose2d::log(&Pose2d::exp(t));
            assert_relative_eq!(t2.dx, t.dx, epsilon = 1e-9);
            assert_relative_eq!(t2.dy, t.dy, epsilon = 1e-9);
            assert_relative_eq!(t2.dtheta, t.dtheta, epsilon = 1e-9);
        }

        // Just above the point where log leaves its series expansion, cos - 1 loses precision
        let t = Twist2d::new(0.7, -0.4, 1e-4);
        let t2 = Pose2d::log(&Pose2d::exp(&t));
        assert_relative_eq!(t2.dx, t.dx, epsilon = 1e-7);
        assert_relative_eq!(t2.dy, t.dy, epsilon = 1e-7);
        assert_relative_eq!(t2.dtheta, t.dtheta, epsilon = 1e-9);
    }

    #[test]
    fn test_log_half_turn() {
        // A half circle of radius 1 ending at (0, 2) facing backwards
        let p = Pose2d::from_xy(0.0, 2.0, Rotation2d::from_radians(PI));
        let t = Pose2d::log(&p);
        assert_relative_eq!(t.dx, PI, epsilon = 1e-9);
        assert_relative_eq!(t.dy, 0.0, epsilon = 1e-9);
        assert_relative_eq!(t.dtheta, PI, epsilon = 1e-9);
        assert_relative_eq!(t.curvature(), 1.0, epsilon = 1e-9);

        let p2 = Pose2d::exp(&t);
        assert!(p2.epsilon_equals(&p, 1e-9), "{} != {}", p2, p);
    }

    #[test]
    fn test_exp_arc() {
        // Quarter circle of radius 1
        let p = Pose2d::exp(&Twist2d::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        assert!(p.translation().epsilon_equals(&Translation2d::new(1.0, 1.0), 1e-9));
        assert!(p
            .rotation()
            .epsilon_equals(&Rotation2d::from_degrees(90.0), 1e-9));
    }

    #[test]
    fn test_interpolate() {
        let a = Pose2d::identity();
        let b = Pose2d::from_xy(1.0, 1.0, Rotation2d::from_degrees(90.0));

        // Half way round the quarter circle
        let mid = a.interpolate(&b, 0.5);
        let angle = std::f64::consts::FRAC_PI_4;
        assert!(mid
            .translation()
            .epsilon_equals(&Translation2d::new(angle.sin(), 1.0 - angle.cos()), 1e-9));
        assert!(mid
            .rotation()
            .epsilon_equals(&Rotation2d::from_degrees(45.0), 1e-9));

        assert_eq!(a.interpolate(&b, -0.1), a);
        assert_eq!(a.interpolate(&b, 1.1), b);

        assert_relative_eq!(a.distance(&b), FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn test_intersection() {
        let a = Pose2d::from_xy(0.0, 0.0, Rotation2d::from_degrees(0.0));
        let b = Pose2d::from_xy(5.0, -5.0, Rotation2d::from_degrees(90.0));
        let c = Pose2d::from_xy(0.0, 2.0, Rotation2d::from_degrees(45.0));

        let i = a.intersection(&b).unwrap();
        assert!(i.epsilon_equals(&Translation2d::new(5.0, 0.0), 1e-9));
        let i = b.intersection(&a).unwrap();
        assert!(i.epsilon_equals(&Translation2d::new(5.0, 0.0), 1e-9));

        let i = a.intersection(&c).unwrap();
        assert!(i.epsilon_equals(&Translation2d::new(-2.0, 0.0), 1e-9));

        let i = b.intersection(&c).unwrap();
        assert!(i.epsilon_equals(&Translation2d::new(5.0, 7.0), 1e-9));

        // Parallel lines never meet
        let d = Pose2d::from_xy(3.0, 3.0, Rotation2d::from_degrees(180.0));
        assert!(a.intersection(&d).is_none());
    }

    #[test]
    fn test_is_colinear() {
        let a = Pose2d::from_xy(0.0, 0.0, Rotation2d::from_degrees(0.0));

        assert!(a.is_colinear(&Pose2d::from_xy(10.0, 0.0, Rotation2d::identity())));
        assert!(a.is_colinear(&Pose2d::from_xy(-10.0, 0.0, Rotation2d::identity())));
        assert!(!a.is_colinear(&Pose2d::from_xy(10.0, 1.0, Rotation2d::identity())));
        assert!(!a.is_colinear(&Pose2d::from_xy(10.0, 0.0, Rotation2d::from_degrees(5.0))));

        let b = Pose2d::from_xy(1.0, 1.0, Rotation2d::from_degrees(45.0));
        assert!(b.is_colinear(&Pose2d::from_xy(3.0, 3.0, Rotation2d::from_degrees(45.0))));
    }

    #[test]
    fn test_mirror() {
        let p = Pose2d::from_xy(1.0, 2.0, Rotation2d::from_degrees(30.0));
        let m = p.mirror();
        assert!(m.translation().epsilon_equals(&Translation2d::new(1.0, -2.0), 1e-12));
        assert!(m
            .rotation()
            .epsilon_equals(&Rotation2d::from_degrees(-30.0), 1e-12));
        assert_eq!(m.mirror(), p);

        let n = p.normal();
        assert_eq!(n.translation(), p.translation());
        assert!(n
            .rotation()
            .epsilon_equals(&Rotation2d::from_degrees(120.0), 1e-12));
    }
}
