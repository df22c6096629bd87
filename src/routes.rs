//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short}`  - Short link redirect
//! - `GET  /health`   - Storage health check
//! - `POST /api/v1`   - Create a short link
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Burst limiting** - Per-IP token bucket (proxy-aware when configured)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{burst_limit, tracing};
use crate::config::Config;
use crate::state::AppState;
use anyhow::Result;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes without middleware, for wiring into custom stacks.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{short}", get(redirect_handler))
        .nest("/api", api::routes::api_routes())
}

/// Routes with state, burst limiting and tracing applied.
///
/// # Errors
///
/// Returns an error if the burst limiter settings are invalid.
pub fn build_router(state: AppState, config: &Config) -> Result<Router> {
    let router = service_routes().with_state(state);

    let router = if config.behind_proxy {
        router.layer(burst_limit::proxied_layer(config)?)
    } else {
        router.layer(burst_limit::layer(config)?)
    };

    Ok(router.layer(tracing::layer()))
}

/// Constructs the application service with trailing slashes trimmed.
pub fn app_router(state: AppState, config: &Config) -> Result<NormalizePath<Router>> {
    let router = build_router(state, config)?;

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
