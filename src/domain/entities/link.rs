//! Link record representing a short identifier mapping.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A short identifier mapped to its original URL.
///
/// A record is live until `expires_at` and expired strictly after it. Expired
/// records are treated as absent: their identifier can be claimed again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub short_id: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl LinkRecord {
    /// Creates a record expiring `ttl` after `created_at`, clamped to the
    /// latest representable instant.
    pub fn new(
        short_id: impl Into<String>,
        original_url: impl Into<String>,
        created_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            short_id: short_id.into(),
            original_url: original_url.into(),
            created_at,
            expires_at: created_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Returns true if the record has passed its expiry time at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Outcome of looking up a short identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(LinkRecord),
    /// A record exists but its TTL has run out.
    Expired,
    NotFound,
}
