//! DTOs for the link shortening endpoint.

use serde::{Deserialize, Serialize};

use crate::application::services::ShortenOutcome;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    /// The original URL. A missing scheme defaults to `http://`.
    pub url: String,

    /// Optional custom identifier. Empty strings are treated as absent.
    #[serde(default)]
    pub short: Option<String>,

    /// Optional lifetime in hours, defaulting to the configured TTL.
    #[serde(default)]
    pub expiry: Option<i64>,
}

/// Created link together with the caller's quota state.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ShortenResponse {
    pub url: String,
    pub short: String,
    /// Lifetime in hours.
    pub expiry: i64,
    /// Create requests left in the current window.
    pub rate_limit: u32,
    /// Seconds until the window resets; 0 when this request opened the window.
    pub rate_limit_reset: u64,
}

impl From<ShortenOutcome> for ShortenResponse {
    fn from(outcome: ShortenOutcome) -> Self {
        Self {
            url: outcome.record.original_url,
            short: outcome.record.short_id,
            expiry: outcome.expiry_hours,
            rate_limit: outcome.admission.remaining,
            rate_limit_reset: outcome.admission.reported_reset(),
        }
    }
}
