//! CLI error type.

use geofix::config::ConfigError;
use geofix::LocationErrorKind;
use thiserror::Error;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Location acquisition ended in failure.
    #[error("{0}")]
    Location(#[from] LocationErrorKind),

    /// The async runtime could not be created.
    #[error("Failed to create Tokio runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// Output could not be rendered.
    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}
