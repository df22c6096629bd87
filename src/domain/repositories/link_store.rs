//! Storage contract for short link records.

use crate::domain::entities::{LinkRecord, Resolution};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Duration;

/// Keyed store of [`LinkRecord`]s with per-key atomic insertion.
///
/// # Implementations
///
/// - [`crate::infrastructure::memory::InMemoryLinkStore`] - sharded in-process map
/// - [`crate::infrastructure::redis_store::RedisLinkStore`] - Redis `SET NX PX`
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Inserts a record for `short_id` unless a live record already holds it.
    ///
    /// The occupancy check and the write happen as one step per key, so two
    /// concurrent calls for the same identifier never both succeed. Expired
    /// records count as absent and are overwritten.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` when the record was stored
    /// - `Ok(None)` when the identifier is held by a live record
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] when the backend is unreachable.
    async fn try_create(
        &self,
        short_id: &str,
        original_url: &str,
        ttl: Duration,
    ) -> Result<Option<LinkRecord>, AppError>;

    /// Looks up `short_id`, distinguishing unknown from expired identifiers.
    async fn resolve(&self, short_id: &str) -> Result<Resolution, AppError>;

    /// Returns true if a live record holds `short_id`.
    ///
    /// Advisory only: callers must rely on [`LinkStore::try_create`] for correctness.
    async fn exists(&self, short_id: &str) -> Result<bool, AppError>;

    /// Physically removes expired records and returns how many were dropped.
    ///
    /// Backends that expire keys on their own return `Ok(0)`.
    async fn purge_expired(&self) -> Result<usize, AppError>;

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;
}
