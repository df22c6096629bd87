//! Per-IP burst protection using a token bucket.
//!
//! This guard sits in front of every route and only absorbs floods. The
//! per-client creation quota reported in API responses is enforced by the
//! service layer, not here. Rejections still use the JSON error body of
//! [`AppError`].

use anyhow::{Context, Result};
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::config::Config;
use crate::error::{AppError, ErrorBody};

/// Burst limiter keyed by the socket peer address.
///
/// Requests exceeding the bucket receive `429 Too Many Requests`.
pub fn layer(
    config: &Config,
) -> Result<GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(config.burst_replenish_ms)
        .burst_size(config.burst_size)
        .finish()
        .context("invalid burst limiter settings")?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)).error_handler(rejection_response))
}

/// Burst limiter keyed by the forwarded client address.
///
/// Reads `X-Forwarded-For`, `X-Real-IP` and `Forwarded` before falling back
/// to the peer address. Use only behind a trusted reverse proxy.
pub fn proxied_layer(
    config: &Config,
) -> Result<GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_millisecond(config.burst_replenish_ms)
        .burst_size(config.burst_size)
        .finish()
        .context("invalid burst limiter settings")?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)).error_handler(rejection_response))
}

/// Renders a governor rejection in the service's error format.
fn rejection_response(e: GovernorError) -> Response {
    match e {
        GovernorError::TooManyRequests { wait_time, headers } => {
            tracing::debug!(wait_time, "Burst limit hit");
            let error = AppError::RateLimitExceeded {
                reset_in_seconds: wait_time.max(1),
            };
            match headers {
                Some(headers) => (headers, error).into_response(),
                None => error.into_response(),
            }
        }
        GovernorError::UnableToExtractKey => {
            AppError::BadRequest("Could not determine the client address.".to_string())
                .into_response()
        }
        GovernorError::Other { code, msg, headers } => {
            let body = Json(ErrorBody {
                error: msg.unwrap_or_else(|| {
                    code.canonical_reason()
                        .unwrap_or("Request rejected.")
                        .to_string()
                }),
                rate_limit_reset: None,
            });
            match headers {
                Some(headers) => (code, headers, body).into_response(),
                None => (code, body).into_response(),
            }
        }
    }
}
