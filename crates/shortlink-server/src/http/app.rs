use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::http::handlers::{
    create_url_handler, get_short_url_handler, get_url_handler, health_handler, redirect_handler,
};
use crate::http::state::AppState;

pub struct App {}

impl App {
    /// Builds the HTTP front: the public redirect route, the JSON gateway
    /// under `/v1`, and a health probe.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/{short_code}", get(redirect_handler))
            .nest(
                "/v1",
                Router::new()
                    .route("/urls", post(create_url_handler))
                    .route("/urls/{short_url}", get(get_url_handler))
                    .route("/short-urls", get(get_short_url_handler)),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use async_trait::async_trait;
    use shortlink_cache::{MokaUrlCache, NoopUrlCache};
    use shortlink_core::store::Result as StoreResult;
    use shortlink_core::{NewUrlRecord, ShortCode, StorageError, UrlRecord, UrlStore};
    use shortlink_generator::{FlakeGenerator, FlakeSettings, Obfuscator};
    use shortlink_service::ResolutionService;
    use shortlink_storage::InMemoryStore;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// A store whose database is unreachable.
    struct UnavailableStore;

    #[async_trait]
    impl UrlStore for UnavailableStore {
        async fn insert(&self, _record: NewUrlRecord) -> StoreResult<UrlRecord> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }

        async fn find_by_id(&self, _id: i64) -> StoreResult<Option<UrlRecord>> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }

        async fn find_by_short_code(&self, _code: &ShortCode) -> StoreResult<Option<UrlRecord>> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }

        async fn find_by_original_url(&self, _url: &str) -> StoreResult<Option<UrlRecord>> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }
    }

    fn generator() -> FlakeGenerator {
        FlakeGenerator::new(FlakeSettings::builder().build(), Obfuscator::default()).unwrap()
    }

    fn router() -> Router {
        let service =
            ResolutionService::new(InMemoryStore::new(), MokaUrlCache::new(), generator());
        App::router(AppState::new(Arc::new(service)))
    }

    fn router_with_failing_store() -> Router {
        let service = ResolutionService::new(UnavailableStore, NoopUrlCache::new(), generator());
        App::router(AppState::new(Arc::new(service)))
    }

    async fn send(router: &Router, request: Request<Body>) -> Response {
        router.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn create(router: &Router, url: &str) -> Value {
        let response = send(router, post_json("/v1/urls", json!({ "original_url": url }))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = send(&router(), get("/health")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn create_returns_created_record() {
        let router = router();

        let body = create(&router, "https://example.com/a").await;

        assert_eq!(body["id"], 1);
        assert_eq!(body["original_url"], "https://example.com/a");
        assert!(body["short_url"].as_str().is_some_and(|s| !s.is_empty()));
        assert!(body["created_at"].is_string());
    }

    #[tokio::test]
    async fn redirect_sends_found_with_location() {
        let router = router();
        let created = create(&router, "https://example.com/a?b=c").await;
        let code = created["short_url"].as_str().unwrap();

        let response = send(&router, get(&format!("/{code}"))).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://example.com/a?b=c"
        );
    }

    #[tokio::test]
    async fn redirect_unknown_code_is_not_found() {
        let response = send(&router(), get("/doesNotExist")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "URL not found" })
        );
    }

    #[tokio::test]
    async fn redirect_malformed_code_is_not_found() {
        let response = send(&router(), get("/a")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "URL not found" })
        );
    }

    #[tokio::test]
    async fn redirect_store_failure_is_internal_error() {
        let response = send(&router_with_failing_store(), get("/abc123")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "internal server error" })
        );
    }

    #[tokio::test]
    async fn gateway_store_failure_is_internal_error() {
        let router = router_with_failing_store();

        let response = send(&router, get("/v1/urls/abc123")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = send(
            &router,
            post_json("/v1/urls", json!({ "original_url": "https://example.com" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn get_url_from_cache_omits_id_and_created_at() {
        let router = router();
        let created = create(&router, "https://example.com/a").await;
        let code = created["short_url"].as_str().unwrap();

        let response = send(&router, get(&format!("/v1/urls/{code}"))).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "original_url": "https://example.com/a", "short_url": code })
        );
    }

    #[tokio::test]
    async fn get_url_resolves_created_code() {
        let router = router();
        let created = create(&router, "https://example.com/a").await;
        let code = created["short_url"].as_str().unwrap();

        let response = send(&router, get(&format!("/v1/urls/{code}"))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["original_url"], "https://example.com/a");
        assert_eq!(body["short_url"], code);
    }

    #[tokio::test]
    async fn get_short_url_by_original_url() {
        let router = router();
        let created = create(&router, "https://example.com/a").await;

        let response = send(
            &router,
            get("/v1/short-urls?original_url=https%3A%2F%2Fexample.com%2Fa"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "short_url": created["short_url"] })
        );
    }

    #[tokio::test]
    async fn gateway_errors_use_json_bodies() {
        let router = router();

        let response = send(
            &router,
            post_json("/v1/urls", json!({ "original_url": "ftp://example.com" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());

        let response = send(
            &router,
            post_json("/v1/urls", json!({ "original_url": "https://example.com/a\u{1}b" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&router, post_json("/v1/urls", json!({}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&router, get("/v1/urls/missing")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&router, get("/v1/short-urls")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &router,
            get("/v1/short-urls?original_url=https%3A%2F%2Fnowhere.example"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
