//! Admission contract for per-client quotas.

use crate::domain::entities::Admission;
use crate::error::AppError;
use async_trait::async_trait;

/// Fixed-window admission control keyed by client identity.
///
/// # Implementations
///
/// - [`crate::infrastructure::memory::InMemoryRateLimiter`]
/// - [`crate::infrastructure::redis_store::RedisRateLimiter`]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Decides whether `client_key` may make another create request.
    ///
    /// Resetting an elapsed window, checking the quota and spending one unit
    /// are atomic with respect to other calls for the same key. A client with
    /// no window yet gets a fresh one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] when a remote backend is unreachable.
    async fn admit(&self, client_key: &str) -> Result<Admission, AppError>;

    /// Drops windows that have elapsed, returning how many were removed.
    async fn purge_idle(&self) -> Result<usize, AppError>;
}
