//! Shared setup for commands that acquire a location.

use geofix::config::ConfigFile;
use geofix::location::{AcquisitionState, LocationAcquirer, LocationSample, PositionOptions};
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::error::CliError;

/// Owns the loaded configuration and the runtime that drives requests.
pub struct CliRunner {
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Load configuration and build a runtime.
    pub fn new() -> Result<Self, CliError> {
        Self::with_config(ConfigFile::load()?)
    }

    /// Build a runner around an already loaded configuration.
    pub fn with_config(config: ConfigFile) -> Result<Self, CliError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .build()?;
        Ok(Self { config, runtime })
    }

    /// Loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log which command is running and against what platform.
    pub fn log_startup(&self, command: &str) {
        info!(
            command,
            version = geofix::VERSION,
            fixed_position = self.config.fixed_position.is_some(),
            "Starting geofix"
        );
    }

    /// Acquire the current location once and wait for the outcome.
    pub fn acquire(&self, options: PositionOptions) -> Result<LocationSample, CliError> {
        let acquirer = LocationAcquirer::start(
            self.config.position_provider(),
            options,
            self.runtime.handle(),
        );
        debug!(?acquirer, "Acquisition started");

        let state = self.runtime.block_on(async {
            let mut updates = acquirer.subscribe();
            let state = match updates.wait_for(|s| s.is_terminal()).await {
                Ok(state) => state.clone(),
                // The sender lives in `acquirer`, which outlives this future.
                Err(_) => acquirer.current_state(),
            };
            state
        });

        match state {
            AcquisitionState::Succeeded(sample) => Ok(sample),
            AcquisitionState::Failed(kind) => Err(CliError::Location(kind)),
            AcquisitionState::Idle | AcquisitionState::Pending => {
                unreachable!("wait_for returned a non-terminal state")
            }
        }
    }
}
