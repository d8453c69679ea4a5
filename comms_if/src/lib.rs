//! # Communications interface crate.
//!
//! Provides the external interface of the trajectory generator, i.e. the formats that requests
//! arrive in and responses are sent back as.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Waypoint strings and trajectory responses
pub mod traj;
