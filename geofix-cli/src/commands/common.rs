//! Common helpers shared across CLI commands.

use std::time::Duration;

use geofix::config::ConfigFile;
use geofix::location::{LocationSample, PositionOptions};

/// Resolve request options from CLI args and config.
///
/// CLI takes precedence, then config, then the built-in defaults.
pub fn resolve_options(
    config: &ConfigFile,
    timeout_ms: Option<u64>,
    maximum_age_ms: Option<u64>,
) -> PositionOptions {
    let mut options = config.position_options();
    if let Some(ms) = timeout_ms {
        options = options.with_timeout(Duration::from_millis(ms));
    }
    if let Some(ms) = maximum_age_ms {
        options = options.with_maximum_age(Duration::from_millis(ms));
    }
    options
}

/// One-line human-readable rendering of a sample.
pub fn describe_sample(sample: &LocationSample) -> String {
    let mut line = format!("{:.6}, {:.6}", sample.latitude, sample.longitude);
    if let Some(accuracy) = sample.accuracy {
        line.push_str(&format!(" (±{} m)", accuracy.round() as i64));
    }
    if let Some(timestamp) = sample.timestamp {
        line.push_str(&format!(" at {} ms", timestamp));
    }
    line
}
