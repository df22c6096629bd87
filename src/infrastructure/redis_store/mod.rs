//! Redis storage backends.
//!
//! Links and quotas share one [`ConnectionManager`] and are separated by key
//! prefix (`link:` and `quota:`). Both rely on Redis key expiry, so the
//! sweeper has nothing to do for them.

mod link_store;
mod rate_limiter;

pub use link_store::RedisLinkStore;
pub use rate_limiter::RedisRateLimiter;

use redis::{Client, aio::ConnectionManager};
use tracing::info;

use crate::error::AppError;

/// Connects to Redis and validates the connection with a PING.
///
/// # Errors
///
/// Returns [`AppError::Storage`] if the URL is invalid, the connection cannot
/// be established, or the PING fails.
pub async fn connect(redis_url: &str) -> Result<ConnectionManager, AppError> {
    let client = Client::open(redis_url)
        .map_err(|e| AppError::Storage(format!("Failed to create Redis client: {e}")))?;

    let manager = ConnectionManager::new(client)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to connect to Redis: {e}")))?;

    let mut test_conn = manager.clone();
    redis::cmd("PING")
        .query_async::<String>(&mut test_conn)
        .await
        .map_err(|e| AppError::Storage(format!("Redis PING failed: {e}")))?;

    info!("Connected to Redis");

    Ok(manager)
}
