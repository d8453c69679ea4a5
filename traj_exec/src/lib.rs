//! # Trajectory library
//!
//! This library generates smooth, curvature bounded trajectories through an ordered list of
//! waypoints, and allows other crates in the workspace (and the `traj_exec` executable) to use the
//! generator.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Geometry module - translations, rotations, poses and twists in the plane
pub mod geom;

/// Spline module - quintic splines, the curvature optimiser and the parameteriser
pub mod spline;

/// Trajectory generator - turns waypoints into a sampled trajectory
pub mod traj_gen;
