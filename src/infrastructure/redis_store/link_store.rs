//! Redis-backed link store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use redis::{AsyncCommands, aio::ConnectionManager};
use tracing::{debug, error};

use crate::domain::clock::Clock;
use crate::domain::entities::{LinkRecord, Resolution};
use crate::domain::repositories::LinkStore;
use crate::error::{AppError, map_redis_error};

/// [`LinkStore`] keeping each record as a JSON string under `link:{short_id}`.
///
/// Insertion is a single `SET key value NX PX ttl`, which makes the occupancy
/// check and the write atomic on the server. The key TTL equals the link TTL,
/// so Redis reclaims expired identifiers by itself.
pub struct RedisLinkStore {
    conn: ConnectionManager,
    clock: Arc<dyn Clock>,
    key_prefix: String,
}

impl RedisLinkStore {
    pub fn new(conn: ConnectionManager, clock: Arc<dyn Clock>) -> Self {
        Self {
            conn,
            clock,
            key_prefix: "link:".to_string(),
        }
    }

    /// Uses a custom namespace; handy to isolate test runs.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn build_key(&self, short_id: &str) -> String {
        format!("{}{}", self.key_prefix, short_id)
    }
}

#[async_trait]
impl LinkStore for RedisLinkStore {
    async fn try_create(
        &self,
        short_id: &str,
        original_url: &str,
        ttl: Duration,
    ) -> Result<Option<LinkRecord>, AppError> {
        let record = LinkRecord::new(short_id, original_url, self.clock.now(), ttl);
        let payload = serde_json::to_string(&record)
            .map_err(|e| AppError::Storage(format!("Failed to encode link record: {e}")))?;

        let key = self.build_key(short_id);
        let mut conn = self.conn.clone();
        let ttl_ms = ttl.num_milliseconds().max(1);

        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(payload)
            .arg("NX")
            .arg("PX")
            .arg(ttl_ms)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        if reply.is_none() {
            debug!(short_id, "Identifier already taken");
            return Ok(None);
        }

        Ok(Some(record))
    }

    async fn resolve(&self, short_id: &str) -> Result<Resolution, AppError> {
        let key = self.build_key(short_id);
        let mut conn = self.conn.clone();

        let stored: Option<String> = conn.get(&key).await.map_err(map_redis_error)?;
        let Some(stored) = stored else {
            return Ok(Resolution::NotFound);
        };

        let record: LinkRecord = serde_json::from_str(&stored).map_err(|e| {
            error!(short_id, error = %e, "Corrupt link record in Redis");
            AppError::Storage(format!("Corrupt link record: {e}"))
        })?;

        // Covers the gap between the record's expiry and Redis evicting the key.
        if record.is_expired_at(self.clock.now()) {
            return Ok(Resolution::Expired);
        }

        Ok(Resolution::Found(record))
    }

    async fn exists(&self, short_id: &str) -> Result<bool, AppError> {
        let key = self.build_key(short_id);
        let mut conn = self.conn.clone();
        conn.exists(&key).await.map_err(map_redis_error)
    }

    async fn purge_expired(&self) -> Result<usize, AppError> {
        Ok(0)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .is_ok()
    }
}
