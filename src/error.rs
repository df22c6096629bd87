//! Application error type and its HTTP representation.
//!
//! Every failure a request can hit is an [`AppError`] variant. Handlers return
//! `Result<_, AppError>` and the [`IntoResponse`] impl turns the error into the
//! wire shape consumed by clients:
//!
//! ```json
//! { "error": "Rate limit exceeded. Try again in 1740 seconds.", "rate_limit_reset": 1740 }
//! ```
//!
//! `error` is always a sentence meant for end users. Backend detail (Redis
//! messages, corrupt payloads) is logged and replaced by a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// JSON body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_reset: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The submitted URL is malformed, uses a forbidden scheme or points back at this service.
    #[error("{0}")]
    InvalidUrl(String),

    /// The custom alias has a bad length, bad characters or is reserved.
    #[error("{0}")]
    InvalidAlias(String),

    #[error("Expiry must be between 1 and {max_hours} hours.")]
    InvalidExpiry { max_hours: i64 },

    #[error("The short link \"{alias}\" is already in use.")]
    AliasTaken { alias: String },

    #[error("Rate limit exceeded. Try again in {reset_in_seconds} seconds.")]
    RateLimitExceeded { reset_in_seconds: u64 },

    /// Every generated candidate collided with a live record.
    #[error("Could not allocate a short link after {attempts} attempts.")]
    GenerationExhausted { attempts: usize },

    #[error("Short link not found.")]
    NotFound { short_id: String },

    /// Storage backend failure. The message is logged, never sent to clients.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The request body could not be decoded.
    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl(_)
            | AppError::InvalidAlias(_)
            | AppError::InvalidExpiry { .. }
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AliasTaken { .. } => StatusCode::FORBIDDEN,
            AppError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::GenerationExhausted { .. } | AppError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the end user.
    pub fn public_message(&self) -> String {
        match self {
            AppError::GenerationExhausted { .. } => {
                "Could not allocate a short link right now. Please try again.".to_string()
            }
            AppError::Storage(_) => {
                "The service is temporarily unavailable. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidUrl(_) => "invalid_url",
            AppError::InvalidAlias(_) => "invalid_alias",
            AppError::InvalidExpiry { .. } => "invalid_expiry",
            AppError::AliasTaken { .. } => "alias_taken",
            AppError::RateLimitExceeded { .. } => "rate_limited",
            AppError::GenerationExhausted { .. } => "generation_exhausted",
            AppError::NotFound { .. } => "not_found",
            AppError::Storage(_) => "storage",
            AppError::BadRequest(_) => "bad_request",
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        let rate_limit_reset = match self {
            AppError::RateLimitExceeded { reset_in_seconds } => Some(*reset_in_seconds),
            _ => None,
        };

        ErrorBody {
            error: self.public_message(),
            rate_limit_reset,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_error_body())).into_response()
    }
}

pub fn map_redis_error(e: redis::RedisError) -> AppError {
    tracing::error!(error = %e, "Redis command failed");
    AppError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidUrl("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::AliasTaken {
                alias: "mylink".into()
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::RateLimitExceeded {
                reset_in_seconds: 10
            }
            .status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::NotFound {
                short_id: "x".into()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::GenerationExhausted { attempts: 5 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rate_limit_body_carries_reset() {
        let body = AppError::RateLimitExceeded {
            reset_in_seconds: 1740,
        }
        .to_error_body();

        assert_eq!(body.rate_limit_reset, Some(1740));
        assert!(body.error.contains("1740 seconds"));
    }

    #[test]
    fn test_other_bodies_omit_reset() {
        let body = AppError::AliasTaken {
            alias: "mylink".into(),
        }
        .to_error_body();

        assert!(body.rate_limit_reset.is_none());
        assert_eq!(body.error, "The short link \"mylink\" is already in use.");

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("rate_limit_reset").is_none());
    }

    #[test]
    fn test_storage_detail_is_hidden() {
        let err = AppError::Storage("connection refused (os error 111)".into());
        let body = err.to_error_body();

        assert!(!body.error.contains("os error"));
        assert!(err.to_string().contains("os error"));
    }
}
