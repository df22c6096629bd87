//! API route configuration.

use crate::api::handlers::shorten_handler;
use crate::state::AppState;
use axum::{Router, routing::post};

/// Versioned API routes.
///
/// # Endpoints
///
/// - `POST /v1` - Create a short link
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/v1", post(shorten_handler))
}
