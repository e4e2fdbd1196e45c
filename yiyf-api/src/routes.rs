//! API route configuration.

use std::sync::Arc;

use axum::{
    handler::HandlerWithoutStateExt,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;

use crate::cors::enforce_origin;
use crate::handlers;
use crate::state::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Creates the API router with all routes configured.
///
/// Anything that is not an API route is looked up in the public directory;
/// misses there fall through to the JSON 404 handler.
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(handlers::not_found.into_service());

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Programs
        .route("/api/programs", get(handlers::list_programs))
        .route("/api/programs/refresh", post(handlers::refresh_programs))
        .route("/api/programs/update", post(handlers::update_programs))

        // Static site
        .fallback_service(static_files)

        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(state.clone(), enforce_origin))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use yiyf_cache::{ProgramCacheService, ServiceConfig};
    use yiyf_core::error::{Result, YiyfError};
    use yiyf_core::traits::{FixtureStore, ProgramSource};
    use yiyf_core::types::ProgramRecord;
    use yiyf_facilities::MemoryFacilityStore;
    use yiyf_fixtures::{default_fixture, MemoryFixtureStore};

    use crate::state::{ApiConfig, Environment};

    struct OfflineSource;

    #[async_trait]
    impl ProgramSource for OfflineSource {
        async fn fetch_programs(&self) -> Result<Vec<ProgramRecord>> {
            Err(YiyfError::HttpError("site unreachable".into()))
        }
    }

    struct StaticSource(Vec<ProgramRecord>);

    #[async_trait]
    impl ProgramSource for StaticSource {
        async fn fetch_programs(&self) -> Result<Vec<ProgramRecord>> {
            Ok(self.0.clone())
        }
    }

    struct TestApp {
        router: Router,
        fixtures: Arc<MemoryFixtureStore>,
        _public: TempDir,
    }

    impl TestApp {
        fn new(source: Arc<dyn ProgramSource>, environment: Environment) -> Self {
            let public = tempfile::tempdir().unwrap();
            std::fs::write(
                public.path().join("index.html"),
                "<!doctype html><title>청소년 프로그램</title>",
            )
            .unwrap();

            let config = ApiConfig {
                environment,
                public_dir: public.path().to_path_buf(),
                ..Default::default()
            };

            let fixtures = Arc::new(MemoryFixtureStore::new());
            let service = ProgramCacheService::new(ServiceConfig::default(), source, fixtures.clone());
            let state = AppState::new(config, Arc::new(service), Arc::new(MemoryFacilityStore::new()));

            Self {
                router: create_router(Arc::new(state)),
                fixtures,
                _public: public,
            }
        }

        fn offline() -> Self {
            Self::new(Arc::new(OfflineSource), Environment::Development)
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn get(&self, uri: &str) -> Response {
            self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
        }

        async fn post_json(&self, uri: &str, body: &str) -> Response {
            self.send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
        }
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn header_str<'a>(response: &'a Response, name: &str) -> &'a str {
        response.headers().get(name).unwrap().to_str().unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = TestApp::offline();

        let response = app.get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "OK");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_programs_fall_back_to_fixture() {
        let app = TestApp::offline();

        let response = app.get("/api/programs").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, "x-cache-status"), "MISS");
        assert_eq!(header_str(&response, "x-data-count"), "8");
        assert_eq!(header_str(&response, "cache-control"), "public, max-age=300");
        assert!(header_str(&response, "last-modified").ends_with("GMT"));

        let body = json_body(response).await;
        let programs = body.as_array().unwrap();
        assert_eq!(programs.len(), default_fixture().len());
        assert!(programs.iter().all(|p| p["image"].is_string()));
        assert!(programs.iter().all(|p| p["lastUpdated"].is_string()));

        let second = app.get("/api/programs").await;
        assert_eq!(header_str(&second, "x-cache-status"), "HIT");
    }

    #[tokio::test]
    async fn test_refresh_then_list_counts_match() {
        let scraped = vec![
            ProgramRecord::new("청소년 역사 체험 프로그램").with_periods("2025-08-30 ~ 2025-09-13", ""),
            ProgramRecord::new("동천청소년문화의집 운영위원회 모집"),
            ProgramRecord::new("수지맞은 베이킹교실 5차 활동"),
        ];
        let app = TestApp::new(Arc::new(StaticSource(scraped)), Environment::Development);

        let response = app.post_json("/api/programs/refresh", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 3);
        assert!(body["lastUpdated"].is_string());

        let response = app.get("/api/programs").await;
        assert_eq!(header_str(&response, "x-cache-status"), "HIT");
        let programs = json_body(response).await;
        assert_eq!(programs.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_rejects_non_array() {
        let app = TestApp::offline();
        let warm = app.get("/api/programs").await;
        assert_eq!(header_str(&warm, "x-cache-status"), "MISS");
        let before = app.fixtures.snapshot();

        let response = app
            .post_json("/api/programs/update", r#"{"programs": "not-an-array"}"#)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());

        assert_eq!(app.fixtures.snapshot(), before);
        let after = app.get("/api/programs").await;
        assert_eq!(header_str(&after, "x-cache-status"), "HIT");
    }

    #[tokio::test]
    async fn test_update_rejects_empty_list() {
        let app = TestApp::offline();
        let before = app.fixtures.snapshot();

        let response = app
            .post_json("/api/programs/update", r#"{"programs": []}"#)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], false);
        assert_eq!(app.fixtures.snapshot(), before);

        let response = app.post_json("/api/programs/refresh", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["count"], 8);
    }

    #[tokio::test]
    async fn test_update_rejects_missing_title_and_bad_json() {
        let app = TestApp::offline();

        let response = app
            .post_json("/api/programs/update", r#"{"programs": [{"title": "  "}]}"#)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.post_json("/api/programs/update", "{not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], false);

        let response = app.post_json("/api/programs/update", "{}").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_replaces_served_programs() {
        let app = TestApp::offline();

        // Warm the cache first; the update must invalidate it.
        assert_eq!(
            header_str(&app.get("/api/programs").await, "x-data-count"),
            "8"
        );

        let response = app
            .post_json(
                "/api/programs/update",
                r#"{"programs": [
                    {"title": "처인성어울림센터 아트살롱 2회차 활동"},
                    {"title": "꿈드림 멘토 모집", "applicationPeriod": "2025-10-01 ~ 2025-10-15"}
                ]}"#,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["count"], 2);

        let stored = app.fixtures.load().await.unwrap();
        assert_eq!(stored.source, "manual_update");

        let response = app.get("/api/programs").await;
        assert_eq!(header_str(&response, "x-cache-status"), "MISS");
        let programs = json_body(response).await;
        assert_eq!(programs[0]["title"], "처인성어울림센터 아트살롱 2회차 활동");
        assert_eq!(programs[0]["applicationPeriod"], "정보 없음");
        assert_eq!(programs[1]["applicationPeriod"], "2025-10-01 ~ 2025-10-15");
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let app = TestApp::offline();
        let huge = format!(r#"{{"programs": ["{}"]}}"#, "가".repeat(MAX_BODY_BYTES));

        let response = app.post_json("/api/programs/update", &huge).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let app = TestApp::offline();

        let response = app.get("/api/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["path"], "/api/nope");

        let response = app.post_json("/no/such/thing", "{}").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_served_from_public_dir() {
        let app = TestApp::offline();

        let response = app.get("/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("청소년 프로그램"));
    }

    #[tokio::test]
    async fn test_production_rejects_unknown_origin() {
        let app = TestApp::new(Arc::new(OfflineSource), Environment::Production);

        let with_origin = |origin: &str| {
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, origin)
                .body(Body::empty())
                .unwrap()
        };

        let response = app.send(with_origin("https://evil.example")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
        assert!(body["message"].is_string());

        let response = app.send(with_origin("https://yiyf.cloudtype.app")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_development_allows_any_origin() {
        let app = TestApp::offline();

        let response = app
            .send(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
