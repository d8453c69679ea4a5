//! Trajectory generator parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::spline::{OptimiserParams, ParameteriserParams};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Parameters for the trajectory generator.
///
/// Any table or key missing from a parameter file takes its default value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajGenParams {
    /// Curvature optimiser parameters
    pub optimiser: OptimiserParams,

    /// Spline sampling parameters
    pub parameteriser: ParameteriserParams,
}
