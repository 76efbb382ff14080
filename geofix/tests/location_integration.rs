//! Integration tests for location acquisition.
//!
//! These tests drive the public surface end to end:
//! - Config file → provider → acquirer → terminal state
//! - Latest-request-wins when a slow request is superseded by a fast one
//! - Composing an acquired sample with distance formatting
//!
//! Run with: `cargo test --test location_integration`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use geofix::config::ConfigFile;
use geofix::location::{
    AcquisitionState, BoxFuture, FixedPositionProvider, LocationAcquirer, LocationErrorKind,
    PlatformError, PlatformFix, PositionOptions, PositionProvider,
};
use geofix::{distance_km, format_distance};

// ============================================================================
// Helpers
// ============================================================================

async fn wait_terminal(acquirer: &LocationAcquirer) -> AcquisitionState {
    let mut rx = acquirer.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.is_terminal()))
        .await
        .expect("state never became terminal")
        .expect("acquirer dropped")
        .clone();
    state
}

/// Provider whose n-th request answers after `delays[n]` with timestamp `n`.
struct ScriptedProvider {
    delays: Vec<Duration>,
    calls: AtomicUsize,
}

impl PositionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn current_position(
        &self,
        _options: PositionOptions,
    ) -> BoxFuture<'_, Result<PlatformFix, PlatformError>> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays[index];
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(PlatformFix {
                latitude: index as f64,
                longitude: 0.0,
                accuracy: None,
                timestamp_ms: index as i64,
            })
        })
    }
}

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_config_to_succeeded_state() {
    let config = ConfigFile::parse(
        "[location]\ntimeout_ms = 1000\n\n[fixed_position]\nlatitude = 51.5074\nlongitude = -0.1278\naccuracy = 30\n",
    )
    .unwrap();

    let acquirer = LocationAcquirer::start(
        config.position_provider(),
        config.position_options(),
        &Handle::current(),
    );

    let state = wait_terminal(&acquirer).await;
    let sample = state.sample().copied().expect("expected a sample");
    assert_eq!(sample.latitude, 51.5074);
    assert_eq!(sample.accuracy, Some(30.0));
    assert!(sample.timestamp.is_some());
}

#[tokio::test]
async fn test_config_without_position_is_unsupported() {
    let config = ConfigFile::parse("[location]\ntimeout_ms = 1000\n").unwrap();

    let acquirer = LocationAcquirer::start(
        config.position_provider(),
        config.position_options(),
        &Handle::current(),
    );

    // Observable synchronously, no pending phase.
    assert_eq!(
        acquirer.current_state(),
        AcquisitionState::Failed(LocationErrorKind::Unsupported)
    );
}

#[tokio::test]
async fn test_platform_timeout_surfaces_as_failed_state() {
    let provider: Arc<dyn PositionProvider> =
        Arc::new(FixedPositionProvider::new(0.0, 0.0).with_latency(Duration::from_secs(30)));
    let options = PositionOptions::default().with_timeout(Duration::from_millis(20));

    let acquirer = LocationAcquirer::start(Some(provider), options, &Handle::current());

    assert_eq!(
        wait_terminal(&acquirer).await,
        AcquisitionState::Failed(LocationErrorKind::Timeout)
    );
}

#[tokio::test]
async fn test_denied_then_manual_retry_stays_denied() {
    let provider: Arc<dyn PositionProvider> = Arc::new(FixedPositionProvider::denied());
    let acquirer =
        LocationAcquirer::start(Some(provider), PositionOptions::default(), &Handle::current());

    assert_eq!(
        wait_terminal(&acquirer).await,
        AcquisitionState::Failed(LocationErrorKind::PermissionDenied)
    );

    acquirer.request_location();
    assert_eq!(acquirer.current_state(), AcquisitionState::Pending);
    assert_eq!(
        wait_terminal(&acquirer).await,
        AcquisitionState::Failed(LocationErrorKind::PermissionDenied)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_first_request_loses_to_second() {
    let provider: Arc<dyn PositionProvider> = Arc::new(ScriptedProvider {
        delays: vec![Duration::from_millis(200), Duration::from_millis(10)],
        calls: Default::default(),
    });

    let acquirer =
        LocationAcquirer::start(Some(provider), PositionOptions::default(), &Handle::current());
    acquirer.request_location();

    let state = wait_terminal(&acquirer).await;
    assert_eq!(state.sample().unwrap().timestamp, Some(1));

    // Let the first request finish and be discarded.
    tokio::time::timeout(Duration::from_secs(5), async {
        while acquirer.in_flight() > 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    assert_eq!(acquirer.current_state().sample().unwrap().timestamp, Some(1));
    assert_eq!(acquirer.generation(), 2);
}

#[tokio::test]
async fn test_distance_from_acquired_location() {
    let provider: Arc<dyn PositionProvider> =
        Arc::new(FixedPositionProvider::new(51.5074, -0.1278));
    let acquirer =
        LocationAcquirer::start(Some(provider), PositionOptions::default(), &Handle::current());

    let state = wait_terminal(&acquirer).await;
    let here = state.sample().unwrap();

    let km = here.distance_to_km(48.8566, 2.3522);
    assert_eq!(km, distance_km(51.5074, -0.1278, 48.8566, 2.3522));
    assert_eq!(format_distance(km), "343.6 km");
}
