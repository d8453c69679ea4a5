//! # Spline chain curvature optimiser
//!
//! Smooths a chain of quintic splines by adjusting the second derivatives shared at each junction
//! between neighbouring splines, so as to minimise the integral of the squared rate of change of
//! curvature over the whole chain.
//!
//! The descent is a simple greedy one: a finite difference gradient, normalised to a fixed step,
//! followed by a parabolic line search along the negative gradient. Every iteration takes a chain
//! and produces a new one, the input chain is never modified.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{debug, trace};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use super::QuinticHermiteSpline;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Parameters for the optimiser
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimiserParams {
    /// Perturbation used when estimating the gradient by forward differences
    pub fd_epsilon: f64,

    /// Length the gradient is normalised to before the line search
    pub step_size: f64,

    /// If an iteration improves the cost by less than this the optimiser stops
    pub min_delta: f64,

    /// Number of samples per spline used to integrate the cost
    pub num_samples: usize,

    /// Maximum number of iterations to run
    pub max_iterations: usize,
}

/// Summary of an optimiser run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimiserReport {
    /// Cost of the chain before optimisation
    pub initial_cost: f64,

    /// Cost of the returned chain
    pub final_cost: f64,

    /// Number of iterations run
    pub iterations: usize,

    /// True if the optimiser stopped because the improvement dropped below the minimum, false if
    /// it hit the iteration limit
    pub converged: bool,
}

/// One point of the line search, `x` being the distance moved along the descent direction.
#[derive(Debug, Clone, Copy)]
struct LinePoint {
    x: f64,
    cost: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OptimiserError {
    #[error("The cost gradient at junction {junction} is not finite")]
    NonFiniteGradient { junction: usize },

    #[error("The cost of the spline chain is not finite")]
    NonFiniteCost,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Default for OptimiserParams {
    fn default() -> Self {
        Self {
            fd_epsilon: 1e-5,
            step_size: 1.0,
            min_delta: 0.001,
            num_samples: 100,
            max_iterations: 100,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Optimise the given chain of splines, returning the new chain along with a report of the run.
///
/// Chains of fewer than two splines have no junctions to optimise and are returned unchanged.
pub fn optimise(
    splines: &[QuinticHermiteSpline],
    params: &OptimiserParams,
) -> Result<(Vec<QuinticHermiteSpline>, OptimiserReport), OptimiserError> {
    let mut chain = splines.to_vec();

    let initial_cost = sum_dcurvature2(&chain, params.num_samples);
    if !initial_cost.is_finite() {
        return Err(OptimiserError::NonFiniteCost);
    }

    let mut report = OptimiserReport {
        initial_cost,
        final_cost: initial_cost,
        iterations: 0,
        converged: true,
    };

    if chain.len() < 2 {
        return Ok((chain, report));
    }

    report.converged = false;
    let mut prev_cost = initial_cost;

    while report.iterations < params.max_iterations {
        chain = run_iteration(&chain, params)?;
        report.iterations += 1;

        let cost = sum_dcurvature2(&chain, params.num_samples);
        if !cost.is_finite() {
            return Err(OptimiserError::NonFiniteCost);
        }

        debug!(
            "Optimiser iteration {}: cost {:.6} (delta {:.6})",
            report.iterations,
            cost,
            prev_cost - cost
        );

        let improvement = prev_cost - cost;
        prev_cost = cost;

        if improvement < params.min_delta {
            report.converged = true;
            break;
        }
    }

    report.final_cost = prev_cost;

    Ok((chain, report))
}

/// Total cost of a chain of splines, the sum of each spline's integrated squared rate of change
/// of curvature.
pub fn sum_dcurvature2(splines: &[QuinticHermiteSpline], num_samples: usize) -> f64 {
    splines.iter().map(|s| s.sum_dcurvature2(num_samples)).sum()
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Run a single descent step on the chain.
fn run_iteration(
    chain: &[QuinticHermiteSpline],
    params: &OptimiserParams,
) -> Result<Vec<QuinticHermiteSpline>, OptimiserError> {
    let num_junctions = chain.len() - 1;

    // Junctions between colinear splines are already optimal so get no gradient
    let active: Vec<bool> = chain
        .windows(2)
        .map(|pair| !is_colinear_junction(&pair[0], &pair[1]))
        .collect();

    // Estimate the gradient with respect to each junction's second derivatives. Only the two
    // splines either side of the junction are affected by a change, so only their costs need to
    // be compared.
    let mut gradient: Vec<Vector2<f64>> = vec![Vector2::zeros(); num_junctions];

    for (i, grad) in gradient.iter_mut().enumerate() {
        if !active[i] {
            continue;
        }

        let left = &chain[i];
        let right = &chain[i + 1];
        let original = left.sum_dcurvature2(params.num_samples)
            + right.sum_dcurvature2(params.num_samples);

        for axis in 0..2 {
            let mut delta = Vector2::zeros();
            delta[axis] = params.fd_epsilon;

            let (probe_left, probe_right) = displace_junction(left, right, delta);
            let probed = probe_left.sum_dcurvature2(params.num_samples)
                + probe_right.sum_dcurvature2(params.num_samples);

            grad[axis] = (probed - original) / params.fd_epsilon;
        }

        if !(grad.x.is_finite() && grad.y.is_finite()) {
            return Err(OptimiserError::NonFiniteGradient { junction: i });
        }
    }

    trace!("Optimiser gradient: {:?}", gradient);

    let magnitude = gradient
        .iter()
        .map(|g| g.norm_squared())
        .sum::<f64>()
        .sqrt();

    // A flat cost means there's nowhere to go
    if magnitude == 0.0 {
        return Ok(chain.to_vec());
    }

    // Unit descent direction for each junction
    let direction: Vec<Vector2<f64>> = gradient.iter().map(|g| -g / magnitude).collect();

    // Sample the cost either side of the current point along the descent direction
    let probe = |x: f64| -> (Vec<QuinticHermiteSpline>, LinePoint) {
        let moved = displace_chain(chain, &direction, &active, x);
        let cost = sum_dcurvature2(&moved, params.num_samples);
        (moved, LinePoint { x, cost })
    };

    let (minus_chain, minus) = probe(-params.step_size);
    let current = LinePoint {
        x: 0.0,
        cost: sum_dcurvature2(chain, params.num_samples),
    };
    let (plus_chain, plus) = probe(params.step_size);

    // Best of the three probes, preferring to stay put on ties
    let mut best_chain = chain.to_vec();
    let mut best = current;
    if minus.cost < best.cost {
        best = minus;
        best_chain = minus_chain;
    }
    if plus.cost < best.cost {
        best = plus;
        best_chain = plus_chain;
    }

    let vertex_x = fit_parabola(&minus, &current, &plus);

    if vertex_x.is_finite() {
        let (vertex_chain, vertex) = probe(vertex_x);
        trace!(
            "Line search: -{:.3} -> {:.6}, 0 -> {:.6}, +{:.3} -> {:.6}, vertex {:.4} -> {:.6}",
            params.step_size,
            minus.cost,
            current.cost,
            params.step_size,
            plus.cost,
            vertex.x,
            vertex.cost
        );

        if vertex.cost <= best.cost {
            return Ok(vertex_chain);
        }
    } else {
        trace!("Line search parabola is degenerate, taking best probe");
    }

    Ok(best_chain)
}

/// True if the junction between the two splines should be left alone.
fn is_colinear_junction(left: &QuinticHermiteSpline, right: &QuinticHermiteSpline) -> bool {
    left.start_pose().is_colinear(&right.start_pose())
        || left.end_pose().is_colinear(&right.end_pose())
}

/// Move the second derivative shared by two neighbouring splines by `delta`.
fn displace_junction(
    left: &QuinticHermiteSpline,
    right: &QuinticHermiteSpline,
    delta: Vector2<f64>,
) -> (QuinticHermiteSpline, QuinticHermiteSpline) {
    (
        left.with_end_accel(left.end_accel() + delta),
        right.with_start_accel(right.start_accel() + delta),
    )
}

/// Move every active junction a distance `x` along its direction.
fn displace_chain(
    chain: &[QuinticHermiteSpline],
    direction: &[Vector2<f64>],
    active: &[bool],
    x: f64,
) -> Vec<QuinticHermiteSpline> {
    let mut moved = chain.to_vec();

    for i in 0..direction.len() {
        if !active[i] {
            continue;
        }

        let (left, right) = displace_junction(&moved[i], &moved[i + 1], direction[i] * x);
        moved[i] = left;
        moved[i + 1] = right;
    }

    moved
}

/// Fit a parabola through three points and return the `x` coordinate of its vertex.
///
/// If the points are colinear the result is not finite.
fn fit_parabola(p1: &LinePoint, p2: &LinePoint, p3: &LinePoint) -> f64 {
    let a = p3.x * (p2.cost - p1.cost) + p2.x * (p1.cost - p3.cost) + p1.x * (p3.cost - p2.cost);
    let b = p3.x * p3.x * (p1.cost - p2.cost)
        + p2.x * p2.x * (p3.cost - p1.cost)
        + p1.x * p1.x * (p2.cost - p3.cost);

    -b / (2.0 * a)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::{Pose2d, Rotation2d};

    fn chain(poses: &[Pose2d]) -> Vec<QuinticHermiteSpline> {
        poses
            .windows(2)
            .map(|p| QuinticHermiteSpline::new(&p[0], &p[1]))
            .collect()
    }

    fn s_curve() -> Vec<QuinticHermiteSpline> {
        chain(&[
            Pose2d::from_xy(0.0, 0.0, Rotation2d::from_degrees(0.0)),
            Pose2d::from_xy(50.0, 20.0, Rotation2d::from_degrees(45.0)),
            Pose2d::from_xy(90.0, 80.0, Rotation2d::from_degrees(60.0)),
            Pose2d::from_xy(140.0, 90.0, Rotation2d::from_degrees(-10.0)),
        ])
    }

    #[test]
    fn test_fit_parabola() {
        // y = (x - 0.5)^2 + 1
        let f = |x: f64| LinePoint {
            x,
            cost: (x - 0.5).powi(2) + 1.0,
        };
        approx::assert_relative_eq!(fit_parabola(&f(-1.0), &f(0.0), &f(1.0)), 0.5);

        // Straight line has no vertex
        let g = |x: f64| LinePoint { x, cost: 2.0 * x };
        assert!(!fit_parabola(&g(-1.0), &g(0.0), &g(1.0)).is_finite());
    }

    #[test]
    fn test_optimise_reduces_cost() {
        let splines = s_curve();
        let params = OptimiserParams::default();

        let (optimised, report) = optimise(&splines, &params).unwrap();

        assert_eq!(optimised.len(), splines.len());
        assert!(report.final_cost <= report.initial_cost);
        assert!(report.iterations >= 1);
        assert!(report.iterations <= params.max_iterations);
        approx::assert_relative_eq!(
            report.final_cost,
            sum_dcurvature2(&optimised, params.num_samples),
            max_relative = 1e-12
        );

        // Input chain untouched
        assert_eq!(splines, s_curve());

        // Boundary conditions survive optimisation
        for (a, b) in splines.iter().zip(optimised.iter()) {
            assert_eq!(a.start_pose(), b.start_pose());
            assert_eq!(a.end_pose(), b.end_pose());
        }

        // Neighbouring splines share their junction second derivatives
        for pair in optimised.windows(2) {
            assert_eq!(pair[0].end_accel(), pair[1].start_accel());
        }
    }

    #[test]
    fn test_iterations_monotonic() {
        let splines = s_curve();
        let params = OptimiserParams::default();

        let active: Vec<bool> = splines
            .windows(2)
            .map(|p| !is_colinear_junction(&p[0], &p[1]))
            .collect();
        assert!(active.iter().all(|a| *a));

        let mut chain = splines;
        let mut prev = sum_dcurvature2(&chain, params.num_samples);
        for _ in 0..20 {
            chain = run_iteration(&chain, &params).unwrap();
            let cost = sum_dcurvature2(&chain, params.num_samples);
            assert!(cost <= prev + 1e-12, "cost increased from {} to {}", prev, cost);
            prev = cost;
        }
    }

    #[test]
    fn test_iteration_limit() {
        let params = OptimiserParams {
            max_iterations: 2,
            min_delta: -1.0,
            ..Default::default()
        };

        let (_, report) = optimise(&s_curve(), &params).unwrap();
        assert_eq!(report.iterations, 2);
        assert!(!report.converged);
    }

    #[test]
    fn test_colinear_chain_untouched() {
        let splines = chain(&[
            Pose2d::from_xy(0.0, 0.0, Rotation2d::identity()),
            Pose2d::from_xy(50.0, 0.0, Rotation2d::identity()),
            Pose2d::from_xy(100.0, 0.0, Rotation2d::identity()),
        ]);

        let (optimised, report) = optimise(&splines, &OptimiserParams::default()).unwrap();
        assert_eq!(optimised, splines);
        assert_eq!(report.iterations, 1);
        assert!(report.converged);
        approx::assert_relative_eq!(report.final_cost, 0.0);
    }

    #[test]
    fn test_short_chains() {
        let (optimised, report) = optimise(&[], &OptimiserParams::default()).unwrap();
        assert!(optimised.is_empty());
        assert_eq!(report.iterations, 0);

        let single = chain(&[
            Pose2d::identity(),
            Pose2d::from_xy(10.0, 10.0, Rotation2d::from_degrees(90.0)),
        ]);
        let (optimised, report) = optimise(&single, &OptimiserParams::default()).unwrap();
        assert_eq!(optimised, single);
        assert_eq!(report.iterations, 0);
        assert_eq!(report.initial_cost, report.final_cost);
    }

    #[test]
    fn test_degenerate_spline_reported() {
        // Coincident poses give a spline with no tangent, so the curvature is undefined
        let p = Pose2d::from_xy(1.0, 1.0, Rotation2d::identity());
        let splines = chain(&[p, p, Pose2d::from_xy(5.0, 3.0, Rotation2d::identity())]);

        assert_eq!(
            optimise(&splines, &OptimiserParams::default()).unwrap_err(),
            OptimiserError::NonFiniteCost
        );
    }
}
