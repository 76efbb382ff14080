//! Device location acquisition.
//!
//! Requests the current position from the host platform through a
//! [`PositionProvider`], and exposes the outcome as an [`AcquisitionState`]
//! on a [`LocationAcquirer`]. Failures are data, never errors: every
//! platform failure ends up as [`AcquisitionState::Failed`] with a
//! [`LocationErrorKind`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use geofix::location::{FixedPositionProvider, LocationAcquirer, PositionOptions};
//!
//! let provider = Arc::new(FixedPositionProvider::new(51.5074, -0.1278));
//! let acquirer = LocationAcquirer::start(Some(provider), PositionOptions::default(), &handle);
//!
//! match acquirer.current_state() {
//!     AcquisitionState::Succeeded(sample) => println!("{}, {}", sample.latitude, sample.longitude),
//!     AcquisitionState::Failed(kind) => println!("{}", kind),
//!     _ => println!("Locating..."),
//! }
//! ```

mod acquirer;
mod fixed;
mod platform;
mod types;

pub use acquirer::LocationAcquirer;
pub use fixed::FixedPositionProvider;
pub use platform::{BoxFuture, PositionProvider};
pub use types::{
    AcquisitionState, LocationErrorKind, LocationSample, PlatformError, PlatformFix,
    PositionOptions, DEFAULT_MAXIMUM_AGE, DEFAULT_TIMEOUT, PERMISSION_DENIED,
    POSITION_UNAVAILABLE, TIMEOUT,
};

#[cfg(test)]
pub use platform::tests::MockPositionProvider;
