//! HTTP server initialization and runtime setup.
//!
//! Selects the storage backends, spawns the expiry sweeper and drives the
//! Axum server lifecycle.

use crate::application::services::{ShortenPolicy, ShortenService};
use crate::config::Config;
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::repositories::{LinkStore, RateLimiter};
use crate::domain::sweeper::run_expiry_sweeper;
use crate::infrastructure::memory::{InMemoryLinkStore, InMemoryRateLimiter};
use crate::infrastructure::redis_store::{self, RedisLinkStore, RedisRateLimiter};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomIdGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Storage backends shared by the service and the sweeper.
pub struct Backends {
    pub links: Arc<dyn LinkStore>,
    pub limiter: Arc<dyn RateLimiter>,
    /// Whether expired state must be swept in-process.
    pub needs_sweeper: bool,
}

/// Builds the storage backends selected by `config`.
///
/// With a Redis URL both tables live in Redis and expire there; an
/// unreachable Redis is a startup error. Otherwise both live in memory.
///
/// # Errors
///
/// Returns an error if Redis is configured but cannot be reached.
pub async fn build_backends(config: &Config, clock: Arc<dyn Clock>) -> Result<Backends> {
    let window = chrono::Duration::seconds(config.rate_limit_window_seconds as i64);

    if let Some(redis_url) = &config.redis_url {
        let conn = redis_store::connect(redis_url)
            .await
            .context("Redis is configured but unreachable")?;

        tracing::info!("Storage: Redis");
        return Ok(Backends {
            links: Arc::new(RedisLinkStore::new(conn.clone(), clock)),
            limiter: Arc::new(RedisRateLimiter::new(conn, config.rate_limit, window)),
            needs_sweeper: false,
        });
    }

    tracing::info!("Storage: in-memory");
    Ok(Backends {
        links: Arc::new(InMemoryLinkStore::new(clock.clone())),
        limiter: Arc::new(InMemoryRateLimiter::new(config.rate_limit, window, clock)),
        needs_sweeper: true,
    })
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backends (Redis or in-memory)
/// - Background expiry sweeper (in-memory only)
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Redis is configured but unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let backends = build_backends(&config, clock).await?;

    let sweeper = if backends.needs_sweeper && config.sweep_interval_seconds > 0 {
        let period = std::time::Duration::from_secs(config.sweep_interval_seconds);
        tracing::info!("Expiry sweeper started (every {}s)", config.sweep_interval_seconds);
        Some(tokio::spawn(run_expiry_sweeper(
            backends.links.clone(),
            backends.limiter.clone(),
            period,
        )))
    } else {
        None
    };

    let generator = Arc::new(RandomIdGenerator::new(config.short_id_length));
    let service = Arc::new(ShortenService::new(
        backends.links,
        backends.limiter,
        generator,
        ShortenPolicy::from(&config),
    ));

    let state = AppState::new(service, config.behind_proxy);
    let app = app_router(state, &config)?;

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(handle) = sweeper {
        handle.abort();
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
