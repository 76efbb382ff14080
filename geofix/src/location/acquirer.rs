//! One-shot location acquisition with latest-request-wins semantics.
//!
//! # Architecture
//!
//! - `LocationAcquirer` - Cloneable handle owning the shared acquisition state
//! - `Shared` - Generation counter plus current [`AcquisitionState`], behind one lock
//! - Each trigger hands a single platform request to the runtime and tags it
//!   with the generation it was issued under
//!
//! A completion only updates state when its generation is still current.
//! Older requests cannot be aborted (the platform has no cancellation), so
//! their outcomes are dropped on arrival instead.
//!
//! # Example
//!
//! ```ignore
//! let acquirer = LocationAcquirer::start(Some(provider), PositionOptions::default(), &handle);
//!
//! let mut updates = acquirer.subscribe();
//! let state = updates.wait_for(|s| s.is_terminal()).await?.clone();
//!
//! if let AcquisitionState::Failed(kind) = state {
//!     println!("{}", kind);
//!     acquirer.request_location(); // manual retry
//! }
//! ```

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::platform::PositionProvider;
use super::types::{AcquisitionState, LocationErrorKind, LocationSample, PositionOptions};

/// State guarded together so the generation check and the write are atomic.
#[derive(Debug, Default)]
struct Shared {
    generation: u64,
    state: AcquisitionState,
}

/// Acquires the device position on demand.
///
/// Cheap to clone; clones share the same state and the same generation
/// counter. Holds no platform subscription, so dropping it needs no cleanup.
/// Requests already in flight still run to completion and are then ignored.
#[derive(Clone)]
pub struct LocationAcquirer {
    provider: Option<Arc<dyn PositionProvider>>,
    options: PositionOptions,
    runtime: Handle,
    shared: Arc<Mutex<Shared>>,
    updates: Arc<watch::Sender<AcquisitionState>>,
    in_flight: Arc<AtomicUsize>,
}

impl LocationAcquirer {
    /// Create an acquirer and immediately trigger the first acquisition.
    ///
    /// # Arguments
    ///
    /// * `provider` - Platform positioning capability, `None` if the host has none
    /// * `options` - Parameters sent with every platform request
    /// * `runtime` - Tokio runtime that drives platform requests
    pub fn start(
        provider: Option<Arc<dyn PositionProvider>>,
        options: PositionOptions,
        runtime: &Handle,
    ) -> Self {
        let (updates, _) = watch::channel(AcquisitionState::Idle);

        let acquirer = Self {
            provider,
            options,
            runtime: runtime.clone(),
            shared: Arc::new(Mutex::new(Shared::default())),
            updates: Arc::new(updates),
            in_flight: Arc::new(AtomicUsize::new(0)),
        };

        acquirer.request_location();
        acquirer
    }

    /// Create an acquirer for a host without positioning capability.
    ///
    /// Every acquisition fails with [`LocationErrorKind::Unsupported`].
    pub fn unsupported(runtime: &Handle) -> Self {
        Self::start(None, PositionOptions::default(), runtime)
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> AcquisitionState {
        self.shared.lock().state.clone()
    }

    /// Subscribe to state transitions.
    ///
    /// The receiver starts at the current state; only transitions accepted
    /// for the latest request are published.
    pub fn subscribe(&self) -> watch::Receiver<AcquisitionState> {
        self.updates.subscribe()
    }

    /// Generation of the most recently triggered request.
    pub fn generation(&self) -> u64 {
        self.shared.lock().generation
    }

    /// Number of platform requests that have not completed yet, stale ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Options sent with every platform request.
    pub fn options(&self) -> PositionOptions {
        self.options
    }

    /// Trigger a new acquisition.
    ///
    /// State becomes `Pending` right away (or `Failed(Unsupported)` when the
    /// host has no positioning capability). Any request still in flight is
    /// superseded: its outcome will be discarded when it arrives.
    pub fn request_location(&self) {
        let Some(provider) = self.provider.as_ref().map(Arc::clone) else {
            let generation = self.begin(AcquisitionState::Failed(LocationErrorKind::Unsupported));
            warn!(generation, "Location requested but platform has no positioning capability");
            return;
        };

        let generation = self.begin(AcquisitionState::Pending);
        let options = self.options;
        info!(
            generation,
            provider = provider.name(),
            high_accuracy = options.high_accuracy,
            timeout_ms = options.timeout.as_millis() as u64,
            maximum_age_ms = options.maximum_age.as_millis() as u64,
            "Requesting current position"
        );

        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let acquirer = self.clone();
        self.runtime.spawn(async move {
            let outcome = provider.current_position(options).await;

            let state = match outcome {
                Ok(fix) => AcquisitionState::Succeeded(LocationSample::from(fix)),
                Err(error) => {
                    let kind = error.kind();
                    warn!(
                        generation,
                        code = error.code,
                        message = %error.message,
                        kind = ?kind,
                        "Position request failed"
                    );
                    AcquisitionState::Failed(kind)
                }
            };

            acquirer.complete(generation, state);
            acquirer.in_flight.fetch_sub(1, Ordering::AcqRel);
        });
    }

    /// Start a new generation in `state` and return its number.
    fn begin(&self, state: AcquisitionState) -> u64 {
        let mut shared = self.shared.lock();
        shared.generation += 1;
        shared.state = state.clone();
        self.updates.send_replace(state);
        shared.generation
    }

    /// Apply a completion if it belongs to the latest request.
    ///
    /// Returns false when the completion was stale and dropped.
    fn complete(&self, generation: u64, state: AcquisitionState) -> bool {
        let mut shared = self.shared.lock();
        if shared.generation != generation {
            debug!(
                generation,
                current = shared.generation,
                "Discarding stale position result"
            );
            return false;
        }

        if let AcquisitionState::Succeeded(sample) = &state {
            info!(
                generation,
                latitude = sample.latitude,
                longitude = sample.longitude,
                accuracy = ?sample.accuracy,
                timestamp = ?sample.timestamp,
                "Position acquired"
            );
        }

        shared.state = state.clone();
        self.updates.send_replace(state);
        true
    }
}

impl fmt::Debug for LocationAcquirer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationAcquirer")
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .field("options", &self.options)
            .field("shared", &*self.shared.lock())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::platform::tests::fix_at;
    use crate::location::MockPositionProvider;
    use crate::location::types::{PlatformError, PERMISSION_DENIED, POSITION_UNAVAILABLE, TIMEOUT};
    use std::time::Duration;

    fn mock_acquirer() -> (Arc<MockPositionProvider>, LocationAcquirer) {
        let mock = Arc::new(MockPositionProvider::new());
        let provider: Arc<dyn PositionProvider> = mock.clone();
        let acquirer =
            LocationAcquirer::start(Some(provider), PositionOptions::default(), &Handle::current());
        (mock, acquirer)
    }

    async fn wait_terminal(acquirer: &LocationAcquirer) -> AcquisitionState {
        let mut rx = acquirer.subscribe();
        let state = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.is_terminal()))
            .await
            .expect("state never became terminal")
            .expect("acquirer dropped")
            .clone();
        state
    }

    async fn wait_settled(acquirer: &LocationAcquirer) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while acquirer.in_flight() > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("requests never settled");
    }

    #[tokio::test]
    async fn test_unsupported_fails_without_pending() {
        let acquirer = LocationAcquirer::unsupported(&Handle::current());

        assert_eq!(
            acquirer.current_state(),
            AcquisitionState::Failed(LocationErrorKind::Unsupported)
        );
        assert_eq!(acquirer.in_flight(), 0);

        acquirer.request_location();
        assert_eq!(
            acquirer.current_state(),
            AcquisitionState::Failed(LocationErrorKind::Unsupported)
        );
        assert_eq!(acquirer.generation(), 2);
    }

    #[tokio::test]
    async fn test_starts_pending_and_issues_one_request() {
        let (mock, acquirer) = mock_acquirer();

        assert_eq!(acquirer.current_state(), AcquisitionState::Pending);
        mock.wait_for_requests(1).await;
        assert_eq!(mock.request_count(), 1);
        assert_eq!(mock.received_options(), vec![PositionOptions::default()]);
    }

    #[tokio::test]
    async fn test_success_keeps_reading_timestamp() {
        let (mock, acquirer) = mock_acquirer();
        mock.wait_for_requests(1).await;

        mock.complete(0, Ok(fix_at(51.5074, -0.1278, 1_000)));
        let state = wait_terminal(&acquirer).await;

        let sample = state.sample().copied().unwrap();
        assert_eq!(sample.timestamp, Some(1_000));
        assert_eq!(sample.latitude, 51.5074);
        assert_eq!(sample.accuracy, Some(10.0));
    }

    #[tokio::test]
    async fn test_failure_codes_are_classified() {
        let cases = [
            (PERMISSION_DENIED, LocationErrorKind::PermissionDenied),
            (POSITION_UNAVAILABLE, LocationErrorKind::PositionUnavailable),
            (TIMEOUT, LocationErrorKind::Timeout),
            (42, LocationErrorKind::Unknown),
        ];

        for (code, expected) in cases {
            let (mock, acquirer) = mock_acquirer();
            mock.wait_for_requests(1).await;
            mock.complete(0, Err(PlatformError::new(code, "test")));

            assert_eq!(
                wait_terminal(&acquirer).await,
                AcquisitionState::Failed(expected)
            );
        }
    }

    #[tokio::test]
    async fn test_late_result_of_superseded_request_is_discarded() {
        let (mock, acquirer) = mock_acquirer();
        acquirer.request_location();
        mock.wait_for_requests(2).await;

        // Second request finishes first
        mock.complete(1, Ok(fix_at(2.0, 2.0, 2_000)));
        let state = wait_terminal(&acquirer).await;
        assert_eq!(state.sample().unwrap().timestamp, Some(2_000));

        // First request arrives late and must not overwrite
        mock.complete(0, Ok(fix_at(1.0, 1.0, 1_000)));
        wait_settled(&acquirer).await;

        assert_eq!(
            acquirer.current_state().sample().unwrap().timestamp,
            Some(2_000)
        );
    }

    #[tokio::test]
    async fn test_late_failure_does_not_clobber_pending() {
        let (mock, acquirer) = mock_acquirer();
        acquirer.request_location();
        mock.wait_for_requests(2).await;

        mock.complete(0, Err(PlatformError::new(TIMEOUT, "late")));
        wait_settled_one(&acquirer).await;
        assert_eq!(acquirer.current_state(), AcquisitionState::Pending);

        mock.complete(1, Err(PlatformError::new(PERMISSION_DENIED, "denied")));
        assert_eq!(
            wait_terminal(&acquirer).await,
            AcquisitionState::Failed(LocationErrorKind::PermissionDenied)
        );
    }

    async fn wait_settled_one(acquirer: &LocationAcquirer) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while acquirer.in_flight() > 1 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("first request never settled");
    }

    #[tokio::test]
    async fn test_retry_after_failure_resets_to_pending() {
        let (mock, acquirer) = mock_acquirer();
        mock.wait_for_requests(1).await;
        mock.complete(0, Err(PlatformError::new(POSITION_UNAVAILABLE, "no fix")));
        assert!(wait_terminal(&acquirer).await.error().is_some());

        acquirer.request_location();
        assert_eq!(acquirer.current_state(), AcquisitionState::Pending);

        mock.wait_for_requests(2).await;
        mock.complete(1, Ok(fix_at(3.0, 4.0, 3_000)));
        let state = wait_terminal(&acquirer).await;
        assert_eq!(state.sample().unwrap().longitude, 4.0);
        assert_eq!(acquirer.generation(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let (mock, acquirer) = mock_acquirer();
        let other = acquirer.clone();
        mock.wait_for_requests(1).await;

        other.request_location();
        assert_eq!(acquirer.generation(), 2);

        mock.wait_for_requests(2).await;
        mock.complete(1, Ok(fix_at(5.0, 6.0, 5_000)));
        assert!(wait_terminal(&acquirer).await.sample().is_some());
    }

    #[tokio::test]
    async fn test_debug_output_names_provider() {
        let (_mock, acquirer) = mock_acquirer();
        let debug = format!("{:?}", acquirer);
        assert!(debug.contains("mock"));
        assert!(debug.contains("Pending"));
    }
}
