//! Geofix CLI - Command-line interface
//!
//! Acquires the current location through the configured platform and
//! measures great-circle distances.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::locate::LocateArgs;

#[derive(Debug, Parser)]
#[command(name = "geofix", version, about = "Current location and great-circle distance")]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Great-circle distance between two points
    #[command(allow_negative_numbers = true)]
    Distance {
        /// Latitude of the first point in degrees
        lat1: f64,
        /// Longitude of the first point in degrees
        lon1: f64,
        /// Latitude of the second point in degrees
        lat2: f64,
        /// Longitude of the second point in degrees
        lon2: f64,
        /// Print the raw kilometer value instead of a formatted distance
        #[arg(long)]
        raw: bool,
    },

    /// Acquire and print the current location
    Locate {
        /// Platform timeout in milliseconds (overrides config)
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Accept a cached fix up to this age in milliseconds (overrides config)
        #[arg(long)]
        maximum_age_ms: Option<u64>,
        /// Print the sample as JSON
        #[arg(long)]
        json: bool,
    },

    /// Distance from the current location to a point
    #[command(allow_negative_numbers = true)]
    Near {
        /// Target latitude in degrees
        lat: f64,
        /// Target longitude in degrees
        lon: f64,
        /// Platform timeout in milliseconds (overrides config)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    geofix::logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
            raw,
        } => commands::distance::run(lat1, lon1, lat2, lon2, raw),
        Commands::Locate {
            timeout_ms,
            maximum_age_ms,
            json,
        } => commands::locate::run(LocateArgs {
            timeout_ms,
            maximum_age_ms,
            json,
        }),
        Commands::Near {
            lat,
            lon,
            timeout_ms,
        } => commands::locate::run_near(lat, lon, timeout_ms),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
