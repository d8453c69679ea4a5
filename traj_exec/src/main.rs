//! # Trajectory Generation Executable
//!
//! This executable generates a trajectory through a list of waypoints given on the command line
//! and prints it to stdout, either as the JSON wire response or as CSV. Logs are written to
//! stderr so they never mix with the output.
//!
//! Waypoints are given as `x,y,heading_deg` triples separated by `;`, for example:
//!
//! ```text
//! traj_exec "0,0,0;60,0,0;60,60,90"
//! ```

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Result};
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

// Internal
use comms_if::traj::{parse_waypoints, OutputFormat};
use traj_lib::traj_gen::{TrajGen, TrajGenParams};
use util::logger::{logger_init, LevelFilter};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Generate a smooth trajectory through a list of waypoints
#[derive(Debug, StructOpt)]
#[structopt(name = "traj_exec")]
struct Opts {
    /// Parameter file to load, defaults are used if not given
    #[structopt(short, long, parse(from_os_str))]
    params: Option<PathBuf>,

    /// Output format, either "json" or "csv"
    #[structopt(short, long, default_value = "json")]
    format: OutputFormat,

    /// Minimum level of log records to show (info, debug or trace)
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,

    /// Also write the log to this file
    #[structopt(long, parse(from_os_str))]
    log_file: Option<PathBuf>,

    /// Log the optimiser and parameteriser report as JSON
    #[structopt(long)]
    report: bool,

    /// Waypoints as "x,y,heading_deg" separated by ";"
    #[structopt(allow_hyphen_values = true)]
    waypoints: String,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    logger_init(opts.log_level, opts.log_file.as_deref())
        .wrap_err("Failed to initialise logging")?;

    info!("Trajectory Generation Executable\n");

    // ---- LOAD PARAMETERS ----

    let params: TrajGenParams = match opts.params {
        Some(ref path) => util::params::load(path)
            .wrap_err_with(|| format!("Failed to load parameters from {:?}", path))?,
        None => {
            info!("No parameter file given, using defaults");
            TrajGenParams::default()
        }
    };

    info!("Parameters loaded");

    // ---- GENERATE ----

    let waypoints = parse_waypoints(&opts.waypoints).wrap_err("Failed to parse waypoints")?;

    let traj_gen = TrajGen::new(params);

    let (response, report) = traj_gen
        .compute_response_with_report(&waypoints)
        .wrap_err("Failed to generate the trajectory")?;

    if let (true, Some(report)) = (opts.report, report) {
        info!(
            "Report:\n{}",
            serde_json::to_string_pretty(&report).wrap_err("Failed to serialise report")?
        );
    }

    // ---- OUTPUT ----

    println!(
        "{}",
        response
            .render(opts.format)
            .wrap_err("Failed to render the trajectory")?
    );

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_negative_first_waypoint() {
        let opts = Opts::from_iter_safe(&["traj_exec", "-10,0,0;50,0,0"]).unwrap();
        assert_eq!(opts.waypoints, "-10,0,0;50,0,0");
        assert!(opts.params.is_none());

        let opts =
            Opts::from_iter_safe(&["traj_exec", "-f", "csv", "--report", "-10,-5,90;0,0,0"])
                .unwrap();
        assert_eq!(opts.waypoints, "-10,-5,90;0,0,0");
        assert_eq!(opts.format, OutputFormat::Csv);
        assert!(opts.report);
    }
}
