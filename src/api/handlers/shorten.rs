//! Handler for link shortening endpoint.

use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, State, rejection::JsonRejection},
    http::HeaderMap,
};

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_key::client_key;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /api/v1`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "short": "my-link",   // optional
///   "expiry": 48          // optional, hours
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "short": "my-link",
///   "expiry": 48,
///   "rate_limit": 9,
///   "rate_limit_reset": 0
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request for malformed JSON, invalid URLs, aliases or expiry
/// - 403 Forbidden if the custom alias is already in use
/// - 429 Too Many Requests once the client's quota is spent
/// - 500 Internal Server Error when no free identifier could be generated
pub async fn shorten_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let client = client_key(&headers, addr, state.behind_proxy);

    let outcome = state
        .shorten_service
        .handle_create(
            &payload.url,
            payload.short.as_deref(),
            payload.expiry,
            &client,
        )
        .await?;

    Ok(Json(ShortenResponse::from(outcome)))
}
