#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use snaplink::application::services::{ShortenPolicy, ShortenService};
use snaplink::config::Config;
use snaplink::domain::clock::{Clock, ManualClock};
use snaplink::infrastructure::memory::{InMemoryLinkStore, InMemoryRateLimiter};
use snaplink::routes::build_router;
use snaplink::state::AppState;
use snaplink::utils::code_generator::RandomIdGenerator;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

/// Injects a fixed peer address, standing in for `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Config for handler tests: proxy headers trusted so each test can pick its
/// client with `X-Forwarded-For`, and a burst guard wide enough to stay out of the way.
pub fn test_config() -> Config {
    Config {
        public_domain: "short.example".to_string(),
        behind_proxy: true,
        burst_replenish_ms: 1,
        burst_size: 1000,
        ..Config::default()
    }
}

pub fn create_test_state(config: &Config, clock: ManualClock) -> AppState {
    let clock: Arc<dyn Clock> = Arc::new(clock);
    let window = chrono::Duration::seconds(config.rate_limit_window_seconds as i64);

    let links = Arc::new(InMemoryLinkStore::new(clock.clone()));
    let limiter = Arc::new(InMemoryRateLimiter::new(config.rate_limit, window, clock));
    let generator = Arc::new(RandomIdGenerator::new(config.short_id_length));

    let service = Arc::new(ShortenService::new(
        links,
        limiter,
        generator,
        ShortenPolicy::from(config),
    ));

    AppState::new(service, config.behind_proxy)
}

pub fn create_test_router(config: &Config, clock: ManualClock) -> Router {
    let state = create_test_state(config, clock);
    build_router(state, config)
        .unwrap()
        .layer(MockConnectInfoLayer)
}

/// Test server over in-memory storage plus the clock driving it.
pub fn create_test_server() -> (TestServer, ManualClock) {
    let clock = ManualClock::default();
    let app = create_test_router(&test_config(), clock.clone());
    (TestServer::new(app).unwrap(), clock)
}
