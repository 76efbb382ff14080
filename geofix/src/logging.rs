//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence when set; otherwise the level is `info`, or
/// `debug` for this crate when `verbose` is true. Calling it twice is a
/// no-op, so tests and binaries can both call it freely.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "info,geofix=debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
