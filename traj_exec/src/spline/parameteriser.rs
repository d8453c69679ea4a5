//! # Adaptive spline parameteriser
//!
//! Converts splines into a sequence of curvature annotated poses by recursively bisecting the
//! spline's parameter range until the motion between each pair of neighbouring samples is within
//! the configured bounds.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::warn;
use serde::{Deserialize, Serialize};

// Internal
use super::Spline;
use crate::geom::{Pose2d, Pose2dWithCurvature};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Parameters for the parameteriser
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameteriserParams {
    /// Maximum forward motion between samples
    pub max_dx: f64,

    /// Maximum lateral motion between samples
    pub max_dy: f64,

    /// Maximum change in heading between samples, in radians
    pub max_dtheta_rad: f64,

    /// Maximum number of times an interval can be bisected. Intervals which still exceed the
    /// bounds at this depth are accepted anyway.
    pub max_depth: usize,
}

/// Summary of a parameterisation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ParameteriserReport {
    /// Number of samples produced
    pub num_samples: usize,

    /// Number of samples accepted only because the depth limit was reached
    pub num_depth_limited: usize,
}

/// Recursion state for a single spline.
struct Sampler<'a, S: Spline> {
    spline: &'a S,
    params: &'a ParameteriserParams,
    samples: Vec<Pose2dWithCurvature>,
    num_depth_limited: usize,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Default for ParameteriserParams {
    fn default() -> Self {
        Self {
            max_dx: 2.0,
            max_dy: 0.05,
            max_dtheta_rad: 0.1,
            max_depth: 20,
        }
    }
}

impl ParameteriserReport {
    fn accumulate(&mut self, other: &ParameteriserReport) {
        self.num_samples += other.num_samples;
        self.num_depth_limited += other.num_depth_limited;
    }
}

impl<'a, S: Spline> Sampler<'a, S> {
    fn new(spline: &'a S, params: &'a ParameteriserParams) -> Self {
        Self {
            spline,
            params,
            samples: vec![spline.get_pose_with_curvature(0.0)],
            num_depth_limited: 0,
        }
    }

    /// Sample the interval `[t0, t1]`, pushing every accepted sample after `t0`.
    fn segment_arc(&mut self, t0: f64, t1: f64, depth: usize) {
        let p0 = self.spline.get_pose(t0);
        let p1 = self.spline.get_pose(t1);

        // Motion between the two samples, in the frame of the first
        let twist = Pose2d::log(&p0.inverse().transform_by(&p1));

        let within_bounds = twist.dx.abs() <= self.params.max_dx
            && twist.dy.abs() <= self.params.max_dy
            && twist.dtheta.abs() <= self.params.max_dtheta_rad;

        if within_bounds {
            self.samples.push(self.spline.get_pose_with_curvature(t1));
        } else if depth >= self.params.max_depth {
            warn!(
                "Parameteriser depth limit ({}) reached on [{:.6}, {:.6}], accepting sample with \
                 motion {}",
                self.params.max_depth, t0, t1, twist
            );
            self.num_depth_limited += 1;
            self.samples.push(self.spline.get_pose_with_curvature(t1));
        } else {
            let mid = 0.5 * (t0 + t1);
            self.segment_arc(t0, mid, depth + 1);
            self.segment_arc(mid, t1, depth + 1);
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Sample a single spline from `t = 0` to `t = 1`.
///
/// The first sample is always the pose at `t = 0` and the last the pose at `t = 1`.
pub fn parameterise_spline<S: Spline>(
    spline: &S,
    params: &ParameteriserParams,
) -> (Vec<Pose2dWithCurvature>, ParameteriserReport) {
    let mut sampler = Sampler::new(spline, params);
    sampler.segment_arc(0.0, 1.0, 0);

    let report = ParameteriserReport {
        num_samples: sampler.samples.len(),
        num_depth_limited: sampler.num_depth_limited,
    };

    (sampler.samples, report)
}

/// Sample a chain of splines into one continuous sequence.
///
/// The first sample of every spline after the first is a repeat of the previous spline's last
/// sample and is dropped.
pub fn parameterise_splines<S: Spline>(
    splines: &[S],
    params: &ParameteriserParams,
) -> (Vec<Pose2dWithCurvature>, ParameteriserReport) {
    let mut samples = Vec::new();
    let mut report = ParameteriserReport::default();

    for (i, spline) in splines.iter().enumerate() {
        let (spline_samples, spline_report) = parameterise_spline(spline, params);
        report.accumulate(&spline_report);

        if i == 0 {
            samples.extend(spline_samples);
        } else {
            report.num_samples -= 1;
            samples.extend(spline_samples.into_iter().skip(1));
        }
    }

    (samples, report)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::{HasRotation, HasTranslation, Rotation2d};
    use crate::spline::QuinticHermiteSpline;

    fn check_bounds(samples: &[Pose2dWithCurvature], params: &ParameteriserParams) {
        for pair in samples.windows(2) {
            let twist = Pose2d::log(&pair[0].pose().inverse().transform_by(&pair[1].pose()));
            assert!(twist.dx.abs() <= params.max_dx, "dx bound broken: {}", twist);
            assert!(twist.dy.abs() <= params.max_dy, "dy bound broken: {}", twist);
            assert!(
                twist.dtheta.abs() <= params.max_dtheta_rad,
                "dtheta bound broken: {}",
                twist
            );
        }
    }

    #[test]
    fn test_parameterise_spline() {
        let spline = QuinticHermiteSpline::new(
            &Pose2d::from_xy(0.0, 0.0, Rotation2d::identity()),
            &Pose2d::from_xy(60.0, 60.0, Rotation2d::from_degrees(90.0)),
        );
        let params = ParameteriserParams::default();

        let (samples, report) = parameterise_spline(&spline, &params);

        assert_eq!(report.num_samples, samples.len());
        assert_eq!(report.num_depth_limited, 0);
        assert!(samples.len() > 2);

        assert_eq!(samples[0], spline.get_pose_with_curvature(0.0));
        assert_eq!(
            samples[samples.len() - 1],
            spline.get_pose_with_curvature(1.0)
        );

        check_bounds(&samples, &params);
    }

    #[test]
    fn test_straight_spline_uses_dx_bound() {
        let spline = QuinticHermiteSpline::new(
            &Pose2d::from_xy(0.0, 0.0, Rotation2d::identity()),
            &Pose2d::from_xy(10.0, 0.0, Rotation2d::identity()),
        );
        let params = ParameteriserParams::default();

        let (samples, _) = parameterise_spline(&spline, &params);

        // 10 units with at most 2 between samples needs at least 5 intervals
        assert!(samples.len() >= 6);
        check_bounds(&samples, &params);

        for s in samples.iter() {
            approx::assert_relative_eq!(s.translation().y(), 0.0, epsilon = 1e-12);
            approx::assert_relative_eq!(s.rotation().radians(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_depth_limit() {
        let spline = QuinticHermiteSpline::new(
            &Pose2d::from_xy(0.0, 0.0, Rotation2d::identity()),
            &Pose2d::from_xy(100.0, 0.0, Rotation2d::identity()),
        );
        let params = ParameteriserParams {
            max_depth: 2,
            ..Default::default()
        };

        let (samples, report) = parameterise_spline(&spline, &params);

        // Every one of the 4 intervals at depth 2 is still longer than 2 units
        assert_eq!(report.num_depth_limited, 4);
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[4], spline.get_pose_with_curvature(1.0));
    }

    #[test]
    fn test_parameterise_splines() {
        let poses = [
            Pose2d::from_xy(0.0, 0.0, Rotation2d::identity()),
            Pose2d::from_xy(60.0, 0.0, Rotation2d::identity()),
            Pose2d::from_xy(60.0, 60.0, Rotation2d::from_degrees(90.0)),
        ];
        let splines: Vec<_> = poses
            .windows(2)
            .map(|p| QuinticHermiteSpline::new(&p[0], &p[1]))
            .collect();
        let params = ParameteriserParams::default();

        let (samples, report) = parameterise_splines(&splines, &params);
        let (first, _) = parameterise_spline(&splines[0], &params);
        let (second, _) = parameterise_spline(&splines[1], &params);

        // Shared sample appears once
        assert_eq!(samples.len(), first.len() + second.len() - 1);
        assert_eq!(report.num_samples, samples.len());
        assert_eq!(samples[first.len() - 1], first[first.len() - 1]);
        assert_eq!(samples[first.len() - 1].pose(), second[0].pose());
        assert_eq!(samples[first.len()], second[1]);

        check_bounds(&samples, &params);

        let (samples, report) = parameterise_splines::<QuinticHermiteSpline>(&[], &params);
        assert!(samples.is_empty());
        assert_eq!(report, ParameteriserReport::default());
    }
}
