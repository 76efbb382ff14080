//! Locate and near commands.

use geofix::format_distance;

use super::common::{describe_sample, resolve_options};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the locate command.
pub struct LocateArgs {
    pub timeout_ms: Option<u64>,
    pub maximum_age_ms: Option<u64>,
    pub json: bool,
}

/// Acquire the current location and print it.
pub fn run(args: LocateArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("locate");

    let options = resolve_options(runner.config(), args.timeout_ms, args.maximum_age_ms);
    let sample = runner.acquire(options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&sample)?);
    } else {
        println!("{}", describe_sample(&sample));
    }
    Ok(())
}

/// Acquire the current location and print the distance to a target point.
pub fn run_near(lat: f64, lon: f64, timeout_ms: Option<u64>) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("near");

    let options = resolve_options(runner.config(), timeout_ms, None);
    let here = runner.acquire(options)?;

    println!("You are at {}", describe_sample(&here));
    println!(
        "Distance to {:.6}, {:.6}: {}",
        lat,
        lon,
        format_distance(here.distance_to_km(lat, lon))
    );
    Ok(())
}
