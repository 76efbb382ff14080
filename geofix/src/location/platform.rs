//! Platform position provider abstraction.
//!
//! The host platform's "get current position" primitive sits behind the
//! [`PositionProvider`] trait so acquisition logic can run against real
//! hardware, a fixed coordinate, or a scripted mock in tests.

use std::future::Future;
use std::pin::Pin;

use super::types::{PlatformError, PlatformFix, PositionOptions};

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A one-shot source of the device's current position.
///
/// Each call is an independent request that eventually yields exactly one
/// outcome: a [`PlatformFix`] or a [`PlatformError`]. Implementations are
/// not required to support cancellation; callers discard outcomes they no
/// longer care about.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so requests can be driven from any
/// task on the runtime.
pub trait PositionProvider: Send + Sync {
    /// Human-readable provider name for logs.
    fn name(&self) -> &str;

    /// Request the current position.
    ///
    /// # Arguments
    ///
    /// * `options` - Accuracy preference, timeout, and accepted cache age
    fn current_position(
        &self,
        options: PositionOptions,
    ) -> BoxFuture<'_, Result<PlatformFix, PlatformError>>;
}
