//! Quintic Hermite splines

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::Spline;
use crate::geom::{HasRotation, HasTranslation, Pose2d, Rotation2d, Translation2d};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Ratio between the tangent magnitude at each end and the distance between the ends.
const TANGENT_SCALE: f64 = 1.2;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A degree 5 polynomial segment between two poses.
///
/// Position and first derivative (tangent) at each end are fixed when the spline is built. The
/// second derivatives at each end (the "accelerations") start at zero and are the only thing which
/// can be changed afterwards, and doing so produces a new spline.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuinticHermiteSpline {
    x: QuinticAxis,
    y: QuinticAxis,
}

/// One axis of the spline, holding the boundary conditions and the polynomial coefficients
/// derived from them.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
struct QuinticAxis {
    p0: f64,
    d0: f64,
    dd0: f64,
    p1: f64,
    d1: f64,
    dd1: f64,

    /// Coefficients of `a t^5 + b t^4 + c t^3 + d t^2 + e t + f`, in that order
    coeffs: [f64; 6],
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl QuinticHermiteSpline {
    /// Fit a spline from `p0` to `p1`, leaving and arriving along the poses' headings.
    pub fn new(p0: &Pose2d, p1: &Pose2d) -> Self {
        let t0 = p0.translation();
        let t1 = p1.translation();
        let r0 = p0.rotation();
        let r1 = p1.rotation();

        let scale = TANGENT_SCALE * t0.distance(&t1);

        Self {
            x: QuinticAxis::new(
                t0.x(),
                r0.cos() * scale,
                0.0,
                t1.x(),
                r1.cos() * scale,
                0.0,
            ),
            y: QuinticAxis::new(
                t0.y(),
                r0.sin() * scale,
                0.0,
                t1.y(),
                r1.sin() * scale,
                0.0,
            ),
        }
    }

    /// The pose the spline was built to start from.
    pub fn start_pose(&self) -> Pose2d {
        Pose2d::new(
            Translation2d::new(self.x.p0, self.y.p0),
            Rotation2d::new(self.x.d0, self.y.d0, true),
        )
    }

    /// The pose the spline was built to end at.
    pub fn end_pose(&self) -> Pose2d {
        Pose2d::new(
            Translation2d::new(self.x.p1, self.y.p1),
            Rotation2d::new(self.x.d1, self.y.d1, true),
        )
    }

    /// Second derivative of position at `t = 0`.
    pub fn start_accel(&self) -> Vector2<f64> {
        Vector2::new(self.x.dd0, self.y.dd0)
    }

    /// Second derivative of position at `t = 1`.
    pub fn end_accel(&self) -> Vector2<f64> {
        Vector2::new(self.x.dd1, self.y.dd1)
    }

    /// A copy of this spline with a new second derivative at `t = 0`.
    pub fn with_start_accel(&self, accel: Vector2<f64>) -> Self {
        Self {
            x: self.x.with_accels(accel.x, self.x.dd1),
            y: self.y.with_accels(accel.y, self.y.dd1),
        }
    }

    /// A copy of this spline with a new second derivative at `t = 1`.
    pub fn with_end_accel(&self, accel: Vector2<f64>) -> Self {
        Self {
            x: self.x.with_accels(self.x.dd0, accel.x),
            y: self.y.with_accels(self.y.dd0, accel.y),
        }
    }

    /// Square of the rate of change of curvature with respect to `t`.
    pub fn dcurvature2(&self, t: f64) -> f64 {
        let (num, dx2dy2) = self.dcurvature_terms(t);
        num * num / dx2dy2.powi(5)
    }

    /// Integral of [`QuinticHermiteSpline::dcurvature2`] over the spline, approximated by a
    /// left Riemann sum with the given number of samples.
    pub fn sum_dcurvature2(&self, num_samples: usize) -> f64 {
        let dt = 1.0 / num_samples as f64;

        (0..num_samples)
            .map(|i| dt * self.dcurvature2(i as f64 * dt))
            .sum()
    }

    /// Numerator of the dk/dt expression along with `x'^2 + y'^2`.
    fn dcurvature_terms(&self, t: f64) -> (f64, f64) {
        let dx = self.x.d1(t);
        let dy = self.y.d1(t);
        let ddx = self.x.d2(t);
        let ddy = self.y.d2(t);
        let dddx = self.x.d3(t);
        let dddy = self.y.d3(t);

        let dx2dy2 = dx * dx + dy * dy;
        let num =
            (dx * dddy - dddx * dy) * dx2dy2 - 3.0 * (dx * ddy - ddx * dy) * (dx * ddx + dy * ddy);

        (num, dx2dy2)
    }
}

impl Spline for QuinticHermiteSpline {
    fn get_point(&self, t: f64) -> Translation2d {
        Translation2d::new(self.x.value(t), self.y.value(t))
    }

    fn get_heading(&self, t: f64) -> Rotation2d {
        Rotation2d::new(self.x.d1(t), self.y.d1(t), true)
    }

    fn get_curvature(&self, t: f64) -> f64 {
        let dx = self.x.d1(t);
        let dy = self.y.d1(t);
        let dx2dy2 = dx * dx + dy * dy;

        (dx * self.y.d2(t) - self.x.d2(t) * dy) / (dx2dy2 * dx2dy2.sqrt())
    }

    fn get_dcurvature(&self, t: f64) -> f64 {
        let (num, dx2dy2) = self.dcurvature_terms(t);
        num / (dx2dy2 * dx2dy2 * dx2dy2.sqrt())
    }

    fn get_velocity(&self, t: f64) -> f64 {
        self.x.d1(t).hypot(self.y.d1(t))
    }
}

impl QuinticAxis {
    fn new(p0: f64, d0: f64, dd0: f64, p1: f64, d1: f64, dd1: f64) -> Self {
        let mut axis = Self {
            p0,
            d0,
            dd0,
            p1,
            d1,
            dd1,
            coeffs: [0.0; 6],
        };
        axis.compute_coeffs();
        axis
    }

    fn with_accels(&self, dd0: f64, dd1: f64) -> Self {
        Self::new(self.p0, self.d0, dd0, self.p1, self.d1, dd1)
    }

    /// Solve the boundary conditions for the polynomial coefficients.
    fn compute_coeffs(&mut self) {
        let (p0, d0, dd0, p1, d1, dd1) = (self.p0, self.d0, self.dd0, self.p1, self.d1, self.dd1);

        self.coeffs = [
            -6.0 * p0 - 3.0 * d0 - 0.5 * dd0 + 0.5 * dd1 - 3.0 * d1 + 6.0 * p1,
            15.0 * p0 + 8.0 * d0 + 1.5 * dd0 - dd1 + 7.0 * d1 - 15.0 * p1,
            -10.0 * p0 - 6.0 * d0 - 1.5 * dd0 + 0.5 * dd1 - 4.0 * d1 + 10.0 * p1,
            0.5 * dd0,
            d0,
            p0,
        ];
    }

    fn value(&self, t: f64) -> f64 {
        let [a, b, c, d, e, f] = self.coeffs;
        ((((a * t + b) * t + c) * t + d) * t + e) * t + f
    }

    fn d1(&self, t: f64) -> f64 {
        let [a, b, c, d, e, _] = self.coeffs;
        (((5.0 * a * t + 4.0 * b) * t + 3.0 * c) * t + 2.0 * d) * t + e
    }

    fn d2(&self, t: f64) -> f64 {
        let [a, b, c, d, _, _] = self.coeffs;
        ((20.0 * a * t + 12.0 * b) * t + 6.0 * c) * t + 2.0 * d
    }

    fn d3(&self, t: f64) -> f64 {
        let [a, b, c, _, _, _] = self.coeffs;
        (60.0 * a * t + 24.0 * b) * t + 6.0 * c
    }
}
