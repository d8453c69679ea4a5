//! # Trajectory interface
//!
//! Defines the external interface of the trajectory generator: the waypoint
//! string that requests a trajectory and the response rendered back to the
//! caller.
//!
//! ## Waypoint strings
//!
//! A waypoint string is a `;` separated list of waypoints, each of which is a
//! `,` separated triple `x,y,heading_deg`, for example `0,0,0;60,0,0;60,60,90`.
//!
//! Any field may be the literal token `NaN`, which is read as `0`. Any other
//! token which isn't a finite number is rejected with a
//! [`WaypointParseError`]. A single trailing `;` is allowed.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Separates waypoints in a waypoint string.
pub const WAYPOINT_SEPARATOR: char = ';';

/// Separates the fields of a single waypoint.
pub const FIELD_SEPARATOR: char = ',';

/// Token which is read as zero in any waypoint field.
pub const NAN_TOKEN: &str = "NaN";

/// Wire response sent when there are not enough waypoints to build a trajectory.
pub const INSUFFICIENT_WAYPOINTS_SENTINEL: &str = "no";

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A waypoint the trajectory must pass through.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Position along the x axis
    pub x_m: f64,

    /// Position along the y axis
    pub y_m: f64,

    /// Heading of the vehicle at the waypoint, anticlockwise from the +ve x axis.
    pub heading_deg: f64,
}

/// A single sample of a generated trajectory.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajPoint {
    pub x: f64,
    pub y: f64,

    /// Heading in radians, in the range `(-pi, pi]`.
    pub rotation: f64,

    /// Curvature in 1/length units, positive when turning left.
    pub curvature: f64,
}

/// JSON body of a successful response.
#[derive(Serialize)]
struct PointsBodyRef<'a> {
    points: &'a [TrajPoint],
}

#[derive(Deserialize)]
struct PointsBody {
    points: Vec<TrajPoint>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The result of a trajectory request.
#[derive(Debug, Clone, PartialEq)]
pub enum TrajResponse {
    /// The sampled trajectory
    Points(Vec<TrajPoint>),

    /// Fewer than two waypoints were given, so no trajectory exists.
    InsufficientWaypoints,
}

/// Formats a [`TrajResponse`] can be rendered in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

/// Names a field within a waypoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaypointField {
    X,
    Y,
    Heading,
}

#[derive(Debug, Error, PartialEq)]
pub enum WaypointParseError {
    #[error("Waypoint {index} has {found} fields, expected 3 (x,y,heading_deg)")]
    WrongFieldCount { index: usize, found: usize },

    #[error("Waypoint {index} has an invalid {field} value \"{token}\"")]
    InvalidToken {
        index: usize,
        field: WaypointField,
        token: String,
    },
}

#[derive(Debug, Error)]
pub enum TrajResponseError {
    #[error("Could not serialise the response to JSON: {0}")]
    JsonError(serde_json::Error),

    #[error("Could not serialise the response to CSV: {0}")]
    CsvError(csv::Error),

    #[error("Could not flush the CSV writer: {0}")]
    CsvFlushError(std::io::Error),

    #[error("The CSV output was not valid UTF-8: {0}")]
    Utf8Error(std::string::FromUtf8Error),
}

#[derive(Debug, Error)]
#[error("Unknown output format \"{0}\", expected \"json\" or \"csv\"")]
pub struct UnknownFormatError(String);

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Waypoint {
    pub fn new(x_m: f64, y_m: f64, heading_deg: f64) -> Self {
        Self {
            x_m,
            y_m,
            heading_deg,
        }
    }
}

impl TrajResponse {
    /// Render the response in the given format.
    pub fn render(&self, format: OutputFormat) -> Result<String, TrajResponseError> {
        match format {
            OutputFormat::Json => self.to_wire(),
            OutputFormat::Csv => self.to_csv(),
        }
    }

    /// Render the response as it is sent on the wire.
    ///
    /// A trajectory is rendered as `{"points":[{"x":..,"y":..,"rotation":..,"curvature":..}]}`,
    /// while [`TrajResponse::InsufficientWaypoints`] is rendered as the bare string `no`.
    pub fn to_wire(&self) -> Result<String, TrajResponseError> {
        match self {
            TrajResponse::Points(points) => serde_json::to_string(&PointsBodyRef { points })
                .map_err(TrajResponseError::JsonError),
            TrajResponse::InsufficientWaypoints => Ok(INSUFFICIENT_WAYPOINTS_SENTINEL.into()),
        }
    }

    /// Render the points as CSV with a header row.
    ///
    /// [`TrajResponse::InsufficientWaypoints`] is rendered the same as on the wire.
    pub fn to_csv(&self) -> Result<String, TrajResponseError> {
        let points = match self {
            TrajResponse::Points(p) => p,
            TrajResponse::InsufficientWaypoints => {
                return Ok(INSUFFICIENT_WAYPOINTS_SENTINEL.into())
            }
        };

        let mut bytes = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut bytes);
            for point in points {
                writer
                    .serialize(point)
                    .map_err(TrajResponseError::CsvError)?;
            }
            writer.flush().map_err(TrajResponseError::CsvFlushError)?;
        }

        String::from_utf8(bytes).map_err(TrajResponseError::Utf8Error)
    }

    /// Parse a wire response back into a [`TrajResponse`].
    pub fn from_wire(wire: &str) -> Result<Self, TrajResponseError> {
        if wire.trim() == INSUFFICIENT_WAYPOINTS_SENTINEL {
            return Ok(TrajResponse::InsufficientWaypoints);
        }

        let body: PointsBody = serde_json::from_str(wire).map_err(TrajResponseError::JsonError)?;
        Ok(TrajResponse::Points(body.points))
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(UnknownFormatError(s.into())),
        }
    }
}

impl fmt::Display for WaypointField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaypointField::X => write!(f, "x"),
            WaypointField::Y => write!(f, "y"),
            WaypointField::Heading => write!(f, "heading"),
        }
    }
}

impl FromStr for Waypoint {
    type Err = WaypointParseError;

    /// Parse a single `x,y,heading_deg` waypoint, reporting errors against index 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_waypoint(0, s)
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Parse a waypoint string into a list of waypoints.
///
/// An empty string gives an empty list.
pub fn parse_waypoints(waypoints_str: &str) -> Result<Vec<Waypoint>, WaypointParseError> {
    let waypoints_str = waypoints_str.trim();

    if waypoints_str.is_empty() {
        return Ok(Vec::new());
    }

    // Allow a single trailing separator
    let waypoints_str = waypoints_str
        .strip_suffix(WAYPOINT_SEPARATOR)
        .unwrap_or(waypoints_str);

    waypoints_str
        .split(WAYPOINT_SEPARATOR)
        .enumerate()
        .map(|(index, wp_str)| parse_waypoint(index, wp_str))
        .collect()
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Parse the waypoint at the given index of a waypoint string.
fn parse_waypoint(index: usize, wp_str: &str) -> Result<Waypoint, WaypointParseError> {
    let fields: Vec<&str> = match wp_str.trim() {
        "" => Vec::new(),
        s => s.split(FIELD_SEPARATOR).collect(),
    };

    if fields.len() != 3 {
        return Err(WaypointParseError::WrongFieldCount {
            index,
            found: fields.len(),
        });
    }

    Ok(Waypoint {
        x_m: parse_field(index, WaypointField::X, fields[0])?,
        y_m: parse_field(index, WaypointField::Y, fields[1])?,
        heading_deg: parse_field(index, WaypointField::Heading, fields[2])?,
    })
}

/// Parse a single field, reading [`NAN_TOKEN`] as zero.
fn parse_field(
    index: usize,
    field: WaypointField,
    token: &str,
) -> Result<f64, WaypointParseError> {
    let token = token.trim();

    if token == NAN_TOKEN {
        trace!("Waypoint {} has a NaN {}, reading it as 0", index, field);
        return Ok(0.0);
    }

    // Rust will happily parse "inf" or "nan", neither of which are valid here
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(WaypointParseError::InvalidToken {
            index,
            field,
            token: token.into(),
        }),
    }
}
