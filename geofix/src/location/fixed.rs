//! Position provider that serves a configured coordinate.
//!
//! Stands in for positioning hardware on hosts that have none (desktops,
//! CI). It honors the request options the way a real platform does: a fix
//! within `maximum_age` is served from cache with its original timestamp,
//! and a fresh fix slower than `timeout` fails with a timeout code.

use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::debug;

use super::platform::{BoxFuture, PositionProvider};
use super::types::{PlatformError, PlatformFix, PositionOptions, PERMISSION_DENIED, TIMEOUT};

/// What the provider answers with.
#[derive(Debug, Clone, Copy)]
enum Behavior {
    Serve {
        latitude: f64,
        longitude: f64,
        accuracy: Option<f64>,
    },
    Deny,
}

/// Serves a fixed coordinate as if it came from positioning hardware.
#[derive(Debug)]
pub struct FixedPositionProvider {
    behavior: Behavior,
    latency: Duration,
    last_fix: Mutex<Option<PlatformFix>>,
}

impl FixedPositionProvider {
    /// Create a provider that reports the given coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            behavior: Behavior::Serve {
                latitude,
                longitude,
                accuracy: None,
            },
            latency: Duration::ZERO,
            last_fix: Mutex::new(None),
        }
    }

    /// Create a provider that always refuses access.
    pub fn denied() -> Self {
        Self {
            behavior: Behavior::Deny,
            latency: Duration::ZERO,
            last_fix: Mutex::new(None),
        }
    }

    /// Report this accuracy radius (meters) with every fix.
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        if let Behavior::Serve {
            accuracy: ref mut a,
            ..
        } = self.behavior
        {
            *a = Some(accuracy);
        }
        self
    }

    /// Simulate the time a fresh hardware fix takes.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Most recent fix produced, if any.
    pub fn last_fix(&self) -> Option<PlatformFix> {
        *self.last_fix.lock()
    }

    fn cached(&self, maximum_age: Duration, now_ms: i64) -> Option<PlatformFix> {
        let fix = (*self.last_fix.lock())?;
        let age_ms = now_ms.saturating_sub(fix.timestamp_ms);
        (age_ms >= 0 && age_ms as u128 <= maximum_age.as_millis()).then_some(fix)
    }
}

impl PositionProvider for FixedPositionProvider {
    fn name(&self) -> &str {
        match self.behavior {
            Behavior::Serve { .. } => "fixed",
            Behavior::Deny => "fixed (denied)",
        }
    }

    fn current_position(
        &self,
        options: PositionOptions,
    ) -> BoxFuture<'_, Result<PlatformFix, PlatformError>> {
        Box::pin(async move {
            let (latitude, longitude, accuracy) = match self.behavior {
                Behavior::Serve {
                    latitude,
                    longitude,
                    accuracy,
                } => (latitude, longitude, accuracy),
                Behavior::Deny => {
                    return Err(PlatformError::new(
                        PERMISSION_DENIED,
                        "Location access is switched off",
                    ))
                }
            };

            if let Some(fix) = self.cached(options.maximum_age, Utc::now().timestamp_millis()) {
                debug!(timestamp_ms = fix.timestamp_ms, "Serving cached fix");
                return Ok(fix);
            }

            tokio::time::timeout(options.timeout, tokio::time::sleep(self.latency))
                .await
                .map_err(|_| {
                    PlatformError::new(
                        TIMEOUT,
                        format!("No fix within {} ms", options.timeout.as_millis()),
                    )
                })?;

            let fix = PlatformFix {
                latitude,
                longitude,
                accuracy,
                timestamp_ms: Utc::now().timestamp_millis(),
            };
            *self.last_fix.lock() = Some(fix);
            Ok(fix)
        })
    }
}
