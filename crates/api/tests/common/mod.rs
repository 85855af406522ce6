#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use weatherwatch_api::config::ServerConfig;
use weatherwatch_api::router::build_app_router;
use weatherwatch_api::state::AppState;
use weatherwatch_core::clock::ObservationClock;
use weatherwatch_core::thresholds::AlertThreshold;
use weatherwatch_db::PgReadingStore;
use weatherwatch_events::AlertDispatcher;
use weatherwatch_openweather::OpenWeatherClient;
use weatherwatch_pipeline::{CollectionCycle, SummaryService};

/// Nothing listens on the discard port, so every fetch fails fast.
pub const UNREACHABLE_SOURCE: &str = "http://127.0.0.1:9";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router over `pool`.
///
/// The source points at [`UNREACHABLE_SOURCE`] and the notifier is
/// log-only, so lookups exercise the degraded path without network access.
pub fn build_test_app(pool: PgPool) -> Router {
    let source = OpenWeatherClient::new(
        UNREACHABLE_SOURCE,
        "test-key",
        Arc::new(ObservationClock::new()),
    )
    .expect("client should build");
    let store = Arc::new(PgReadingStore::new(pool.clone()));

    let collector = CollectionCycle::new(
        Arc::new(source),
        Arc::clone(&store),
        Arc::new(AlertDispatcher::new()),
        AlertThreshold::default(),
        Duration::from_secs(5),
    );

    let config = test_config();
    let state = AppState {
        pool,
        collector,
        lookup_timeout: config.lookup_timeout(),
        summaries: SummaryService::new(store),
    };

    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
