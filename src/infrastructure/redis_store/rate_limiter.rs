//! Redis-backed fixed-window rate limiter.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::Duration;
use redis::{Script, aio::ConnectionManager};

use crate::domain::entities::Admission;
use crate::domain::repositories::RateLimiter;
use crate::error::{AppError, map_redis_error};

/// Admission in one round trip.
///
/// The counter key holds the remaining quota and expires with the window, so
/// a missing key (or one without TTL) means a new window. Returns
/// `{allowed, remaining, reset_ms, fresh}`.
const ADMIT_LUA: &str = r#"
local limit = tonumber(ARGV[1])
local window_ms = tonumber(ARGV[2])
local ttl = redis.call('PTTL', KEYS[1])
if ttl <= 0 then
  redis.call('SET', KEYS[1], limit - 1, 'PX', window_ms)
  return {1, limit - 1, window_ms, 1}
end
local remaining = tonumber(redis.call('GET', KEYS[1]))
if remaining <= 0 then
  return {0, 0, ttl, 0}
end
remaining = redis.call('DECR', KEYS[1])
return {1, remaining, ttl, 0}
"#;

static ADMIT_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(ADMIT_LUA));

/// [`RateLimiter`] storing one counter per client under `quota:{client_key}`.
///
/// Redis runs scripts one at a time, so reset, check and decrement are atomic
/// for every client across all service instances.
pub struct RedisRateLimiter {
    conn: ConnectionManager,
    limit: u32,
    window: Duration,
    key_prefix: String,
}

impl RedisRateLimiter {
    pub fn new(conn: ConnectionManager, limit: u32, window: Duration) -> Self {
        Self {
            conn,
            limit,
            window,
            key_prefix: "quota:".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn build_key(&self, client_key: &str) -> String {
        format!("{}{}", self.key_prefix, client_key)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn admit(&self, client_key: &str) -> Result<Admission, AppError> {
        let mut conn = self.conn.clone();

        let (allowed, remaining, reset_ms, fresh): (i64, i64, i64, i64) = ADMIT_SCRIPT
            .key(self.build_key(client_key))
            .arg(self.limit)
            .arg(self.window.num_milliseconds())
            .invoke_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        let reset_in_seconds = (reset_ms.max(0) as u64).div_ceil(1000);

        if allowed == 0 {
            return Ok(Admission::denied(reset_in_seconds));
        }

        Ok(Admission::allowed(
            remaining.max(0) as u32,
            reset_in_seconds,
            fresh == 1,
        ))
    }

    async fn purge_idle(&self) -> Result<usize, AppError> {
        Ok(0)
    }
}
