//! Core types for location acquisition.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo;

/// Default platform timeout for a single acquisition (15 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Default maximum age of a cached platform fix (5 minutes).
pub const DEFAULT_MAXIMUM_AGE: Duration = Duration::from_millis(300_000);

/// Platform error code: the user or OS denied access to the position.
pub const PERMISSION_DENIED: u16 = 1;

/// Platform error code: the platform could not determine a fix.
pub const POSITION_UNAVAILABLE: u16 = 2;

/// Platform error code: no fix arrived within the requested timeout.
pub const TIMEOUT: u16 = 3;

/// A single position reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Horizontal accuracy radius in meters, when the platform reports one.
    pub accuracy: Option<f64>,
    /// Epoch milliseconds at which the platform took the reading.
    pub timestamp: Option<i64>,
}

impl LocationSample {
    /// Create a sample without accuracy or timestamp.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp: None,
        }
    }

    /// Great-circle distance from this sample to another point, in kilometers.
    pub fn distance_to_km(&self, latitude: f64, longitude: f64) -> f64 {
        geo::distance_km(self.latitude, self.longitude, latitude, longitude)
    }
}

impl From<PlatformFix> for LocationSample {
    fn from(fix: PlatformFix) -> Self {
        Self {
            latitude: fix.latitude,
            longitude: fix.longitude,
            accuracy: fix.accuracy,
            // The reading's own time, never the time we observed it.
            timestamp: Some(fix.timestamp_ms),
        }
    }
}

/// Why an acquisition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum LocationErrorKind {
    /// The platform exposes no positioning capability.
    #[error("Location is not supported on this device")]
    Unsupported,

    /// The user or operating system denied access.
    #[error("Location permission was denied")]
    PermissionDenied,

    /// The platform could not determine a position.
    #[error("Location information is unavailable")]
    PositionUnavailable,

    /// No position arrived within the requested window.
    #[error("Location request timed out")]
    Timeout,

    /// Any other platform failure.
    #[error("An unknown error occurred while getting location")]
    Unknown,
}

impl LocationErrorKind {
    /// Classify a raw platform error code.
    ///
    /// Total over `u16`: anything that is not one of the three known codes is
    /// [`LocationErrorKind::Unknown`]. `Unsupported` is never produced here,
    /// it comes from capability detection instead.
    pub fn from_platform_code(code: u16) -> Self {
        match code {
            PERMISSION_DENIED => Self::PermissionDenied,
            POSITION_UNAVAILABLE => Self::PositionUnavailable,
            TIMEOUT => Self::Timeout,
            _ => Self::Unknown,
        }
    }
}

impl From<&PlatformError> for LocationErrorKind {
    fn from(error: &PlatformError) -> Self {
        Self::from_platform_code(error.code)
    }
}

/// State of the most recently triggered acquisition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum AcquisitionState {
    /// No request issued yet.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The latest request produced a position.
    Succeeded(LocationSample),
    /// The latest request failed.
    Failed(LocationErrorKind),
}

impl AcquisitionState {
    /// True while a request is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// True once the latest request has succeeded or failed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    /// The acquired sample, if the latest request succeeded.
    pub fn sample(&self) -> Option<&LocationSample> {
        match self {
            Self::Succeeded(sample) => Some(sample),
            _ => None,
        }
    }

    /// The failure kind, if the latest request failed.
    pub fn error(&self) -> Option<LocationErrorKind> {
        match self {
            Self::Failed(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// Parameters passed to the platform with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Ask the platform for its most accurate source.
    pub high_accuracy: bool,
    /// Give up when no fix arrives within this window.
    pub timeout: Duration,
    /// Accept a cached platform fix no older than this.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: DEFAULT_TIMEOUT,
            maximum_age: DEFAULT_MAXIMUM_AGE,
        }
    }
}

impl PositionOptions {
    /// Set the platform timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum accepted age of a cached fix.
    pub fn with_maximum_age(mut self, maximum_age: Duration) -> Self {
        self.maximum_age = maximum_age;
        self
    }

    /// Set whether high accuracy is preferred.
    pub fn with_high_accuracy(mut self, high_accuracy: bool) -> Self {
        self.high_accuracy = high_accuracy;
        self
    }
}

/// A successful reading as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformFix {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    /// Epoch milliseconds of the reading.
    pub timestamp_ms: i64,
}

/// A failed reading as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("platform error {code}: {message}")]
pub struct PlatformError {
    /// Raw platform code, see [`PERMISSION_DENIED`], [`POSITION_UNAVAILABLE`], [`TIMEOUT`].
    pub code: u16,
    /// Free-form platform message, kept for diagnostics only.
    pub message: String,
}

impl PlatformError {
    /// Create a platform error.
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Classified kind of this error.
    pub fn kind(&self) -> LocationErrorKind {
        LocationErrorKind::from(self)
    }
}
