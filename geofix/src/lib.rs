//! Geofix - device location and great-circle distance
//!
//! This library acquires the device's current position through an
//! asynchronous, possibly failing platform primitive and normalizes the
//! outcome into a stable state, and measures and formats geodesic distance
//! between coordinates.
//!
//! - [`location`] - One-shot position acquisition ([`location::LocationAcquirer`])
//! - [`geo`] - Haversine distance and display formatting
//! - [`config`] - INI configuration file
//! - [`logging`] - Tracing subscriber setup

pub mod config;
pub mod geo;
pub mod location;
pub mod logging;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geo::{distance_km, format_distance};
pub use location::{AcquisitionState, LocationAcquirer, LocationErrorKind, LocationSample};
