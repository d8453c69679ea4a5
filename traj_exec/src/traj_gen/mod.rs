//! # Trajectory generator
//!
//! Produces a smooth, densely sampled trajectory through an ordered list of waypoints. Each pair
//! of neighbouring waypoints is joined by a quintic spline, the chain of splines is optimised to
//! minimise the change in curvature along it, and the optimised chain is then sampled so that the
//! motion between any two neighbouring samples stays within the configured bounds.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;

pub use params::TrajGenParams;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use crate::geom::{
    HasCurvature, HasRotation, HasTranslation, Pose2d, Pose2dWithCurvature, Rotation2d,
};
use crate::spline::{
    optimise, parameterise_splines, OptimiserError, OptimiserReport, ParameteriserReport,
    QuinticHermiteSpline,
};
use comms_if::traj::{TrajPoint, TrajResponse, Waypoint};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Trajectory generator
#[derive(Debug, Clone, Default)]
pub struct TrajGen {
    params: TrajGenParams,
}

/// Summary of a single trajectory computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajGenReport {
    /// Number of splines in the chain
    pub num_splines: usize,

    pub optimiser: OptimiserReport,

    pub parameteriser: ParameteriserReport,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TrajGenError {
    #[error("At least 2 waypoints are needed to generate a trajectory, but {0} were given")]
    InsufficientWaypoints(usize),

    #[error("Waypoint {index} is at the same position as the waypoint after it")]
    DegenerateSegment { index: usize },

    #[error("Spline optimisation failed: {0}")]
    OptimiserFailed(#[from] OptimiserError),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl TrajGen {
    pub fn new(params: TrajGenParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TrajGenParams {
        &self.params
    }

    /// Compute the trajectory passing through the given poses, in order.
    pub fn compute_trajectory(
        &self,
        waypoints: &[Pose2d],
    ) -> Result<Vec<Pose2dWithCurvature>, TrajGenError> {
        self.compute_trajectory_with_report(waypoints)
            .map(|(traj, _)| traj)
    }

    /// Compute the trajectory passing through the given poses, along with a report on how the
    /// optimiser and parameteriser behaved.
    pub fn compute_trajectory_with_report(
        &self,
        waypoints: &[Pose2d],
    ) -> Result<(Vec<Pose2dWithCurvature>, TrajGenReport), TrajGenError> {
        if waypoints.len() < 2 {
            return Err(TrajGenError::InsufficientWaypoints(waypoints.len()));
        }

        // A spline between coincident points has no tangent, and so no heading or curvature
        if let Some(index) = waypoints.windows(2).position(|pair| {
            pair[0].translation().distance(&pair[1].translation()) < crate::geom::EPSILON
        }) {
            return Err(TrajGenError::DegenerateSegment { index });
        }

        info!("Computing trajectory through {} waypoints", waypoints.len());

        let splines: Vec<QuinticHermiteSpline> = waypoints
            .windows(2)
            .map(|pair| QuinticHermiteSpline::new(&pair[0], &pair[1]))
            .collect();

        let (splines, optimiser_report) = optimise(&splines, &self.params.optimiser)?;

        debug!(
            "Spline chain optimised in {} iterations, cost {:.6} -> {:.6}",
            optimiser_report.iterations,
            optimiser_report.initial_cost,
            optimiser_report.final_cost
        );

        let (traj, parameteriser_report) =
            parameterise_splines(&splines, &self.params.parameteriser);

        let report = TrajGenReport {
            num_splines: splines.len(),
            optimiser: optimiser_report,
            parameteriser: parameteriser_report,
        };

        debug!("Trajectory report: {:?}", report);
        info!("Trajectory generated with {} points", traj.len());

        Ok((traj, report))
    }

    /// Compute the trajectory through the given waypoints.
    pub fn compute_from_waypoints(
        &self,
        waypoints: &[Waypoint],
    ) -> Result<Vec<Pose2dWithCurvature>, TrajGenError> {
        let poses: Vec<Pose2d> = waypoints.iter().map(|w| Pose2d::from(*w)).collect();
        self.compute_trajectory(&poses)
    }

    /// Compute the trajectory through the given waypoints as a response for the wire.
    ///
    /// Too few waypoints is a valid response rather than an error.
    pub fn compute_response(&self, waypoints: &[Waypoint]) -> Result<TrajResponse, TrajGenError> {
        self.compute_response_with_report(waypoints)
            .map(|(response, _)| response)
    }

    /// As [`TrajGen::compute_response`], also giving the report if a trajectory was generated.
    pub fn compute_response_with_report(
        &self,
        waypoints: &[Waypoint],
    ) -> Result<(TrajResponse, Option<TrajGenReport>), TrajGenError> {
        let poses: Vec<Pose2d> = waypoints.iter().map(|w| Pose2d::from(*w)).collect();

        match self.compute_trajectory_with_report(&poses) {
            Ok((traj, report)) => Ok((
                TrajResponse::Points(traj.into_iter().map(TrajPoint::from).collect()),
                Some(report),
            )),
            Err(TrajGenError::InsufficientWaypoints(n)) => {
                warn!("Only {} waypoint(s) given, no trajectory generated", n);
                Ok((TrajResponse::InsufficientWaypoints, None))
            }
            Err(e) => Err(e),
        }
    }
}

impl From<Waypoint> for Pose2d {
    fn from(waypoint: Waypoint) -> Self {
        Pose2d::from_xy(
            waypoint.x_m,
            waypoint.y_m,
            Rotation2d::from_degrees(waypoint.heading_deg),
        )
    }
}

impl From<Pose2dWithCurvature> for TrajPoint {
    fn from(pose: Pose2dWithCurvature) -> Self {
        TrajPoint {
            x: pose.translation().x(),
            y: pose.translation().y(),
            rotation: pose.rotation().radians(),
            curvature: pose.curvature(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_insufficient_waypoints() {
        let traj_gen = TrajGen::default();

        assert_eq!(
            traj_gen.compute_trajectory(&[]).unwrap_err(),
            TrajGenError::InsufficientWaypoints(0)
        );
        assert_eq!(
            traj_gen.compute_trajectory(&[Pose2d::identity()]).unwrap_err(),
            TrajGenError::InsufficientWaypoints(1)
        );
        assert_eq!(
            traj_gen.compute_response(&[Waypoint::new(1.0, 2.0, 3.0)]).unwrap(),
            TrajResponse::InsufficientWaypoints
        );
        assert_eq!(
            traj_gen.compute_response_with_report(&[]).unwrap(),
            (TrajResponse::InsufficientWaypoints, None)
        );
    }

    #[test]
    fn test_response_with_report() {
        let traj_gen = TrajGen::default();
        let waypoints = [Waypoint::new(-10.0, 0.0, 0.0), Waypoint::new(50.0, 0.0, 0.0)];

        let (response, report) = traj_gen.compute_response_with_report(&waypoints).unwrap();
        let report = report.unwrap();

        assert_eq!(response, traj_gen.compute_response(&waypoints).unwrap());
        assert_eq!(report.num_splines, 1);
        match response {
            TrajResponse::Points(points) => {
                assert_eq!(points.len(), report.parameteriser.num_samples);
                assert_relative_eq!(points[0].x, -10.0, epsilon = 1e-9);
            }
            TrajResponse::InsufficientWaypoints => panic!("Expected points"),
        }
    }

    #[test]
    fn test_degenerate_segment() {
        let traj_gen = TrajGen::default();
        let waypoints = [
            Waypoint::new(0.0, 0.0, 0.0),
            Waypoint::new(10.0, 0.0, 0.0),
            Waypoint::new(10.0, 0.0, 90.0),
        ];

        assert_eq!(
            traj_gen.compute_from_waypoints(&waypoints).unwrap_err(),
            TrajGenError::DegenerateSegment { index: 1 }
        );
        assert!(traj_gen.compute_response(&waypoints).is_err());
    }

    #[test]
    fn test_waypoint_conversion() {
        let pose = Pose2d::from(Waypoint::new(3.0, -4.0, 90.0));
        assert_relative_eq!(pose.translation().x(), 3.0);
        assert_relative_eq!(pose.translation().y(), -4.0);
        assert_relative_eq!(pose.rotation().degrees(), 90.0, epsilon = 1e-9);

        let point = TrajPoint::from(Pose2dWithCurvature::new(pose, 0.25, 1.0));
        assert_relative_eq!(point.x, 3.0);
        assert_relative_eq!(point.y, -4.0);
        assert_relative_eq!(point.rotation, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(point.curvature, 0.25);
    }

    #[test]
    fn test_report() {
        let traj_gen = TrajGen::default();
        let waypoints = [
            Pose2d::from_xy(0.0, 0.0, Rotation2d::identity()),
            Pose2d::from_xy(30.0, 10.0, Rotation2d::from_degrees(30.0)),
            Pose2d::from_xy(60.0, 40.0, Rotation2d::from_degrees(60.0)),
        ];

        let (traj, report) = traj_gen.compute_trajectory_with_report(&waypoints).unwrap();

        assert_eq!(report.num_splines, 2);
        assert_eq!(report.parameteriser.num_samples, traj.len());
        assert_eq!(report.parameteriser.num_depth_limited, 0);
        assert!(report.optimiser.final_cost <= report.optimiser.initial_cost);

        assert!(traj[0].pose().epsilon_equals(&waypoints[0], 1e-9));
        assert!(traj[traj.len() - 1].pose().epsilon_equals(&waypoints[2], 1e-9));
    }
}
