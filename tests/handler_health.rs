mod common;

use serde_json::Value;

#[tokio::test]
async fn test_health_endpoint_success() {
    let (server, _clock) = common::create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let (server, _clock) = common::create_test_server();

    let json = server.get("/health").await.json::<Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("storage").is_some());
}

#[tokio::test]
async fn test_health_is_not_a_short_link() {
    let (server, _clock) = common::create_test_server();

    let response = server
        .post("/api/v1")
        .json(&serde_json::json!({ "url": "https://example.com", "short": "health" }))
        .await;

    response.assert_status_bad_request();
}

mod degraded {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::Duration;
    use snaplink::application::services::{ShortenPolicy, ShortenService};
    use snaplink::domain::clock::ManualClock;
    use snaplink::domain::entities::{LinkRecord, Resolution};
    use snaplink::domain::repositories::LinkStore;
    use snaplink::error::AppError;
    use snaplink::infrastructure::memory::InMemoryRateLimiter;
    use snaplink::routes::build_router;
    use snaplink::state::AppState;
    use snaplink::utils::code_generator::RandomIdGenerator;
    use std::sync::Arc;

    /// Store whose backend never answers.
    struct UnreachableStore;

    #[async_trait]
    impl LinkStore for UnreachableStore {
        async fn try_create(
            &self,
            _short_id: &str,
            _original_url: &str,
            _ttl: Duration,
        ) -> Result<Option<LinkRecord>, AppError> {
            Err(AppError::Storage("connection refused".to_string()))
        }

        async fn resolve(&self, _short_id: &str) -> Result<Resolution, AppError> {
            Err(AppError::Storage("connection refused".to_string()))
        }

        async fn exists(&self, _short_id: &str) -> Result<bool, AppError> {
            Err(AppError::Storage("connection refused".to_string()))
        }

        async fn purge_expired(&self) -> Result<usize, AppError> {
            Ok(0)
        }

        async fn health_check(&self) -> bool {
            false
        }
    }

    fn server() -> TestServer {
        let config = crate::common::test_config();
        let limiter = Arc::new(InMemoryRateLimiter::new(
            config.rate_limit,
            Duration::seconds(config.rate_limit_window_seconds as i64),
            Arc::new(ManualClock::default()),
        ));
        let service = Arc::new(ShortenService::new(
            Arc::new(UnreachableStore),
            limiter,
            Arc::new(RandomIdGenerator::new(7)),
            ShortenPolicy::from(&config),
        ));
        let state = AppState::new(service, config.behind_proxy);
        let app = build_router(state, &config)
            .unwrap()
            .layer(crate::common::MockConnectInfoLayer);

        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_storage() {
        let response = server().get("/health").await;

        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        let json = response.json::<Value>();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["checks"]["storage"]["status"], "error");
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error_without_detail() {
        let response = server()
            .post("/api/v1")
            .json(&serde_json::json!({ "url": "https://example.com" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response.json::<Value>();
        assert!(!json["error"].as_str().unwrap().contains("connection refused"));
    }
}
