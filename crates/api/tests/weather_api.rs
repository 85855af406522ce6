//! Integration tests for the interactive lookup endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn unreachable_source_yields_placeholder_view(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/weather", json!({ "city": "Atlantis" })).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["city"], "Location not found");
    assert_eq!(json["data"]["country"], "");
    assert_eq!(json["data"]["temperature"], "N/A");
    assert_eq!(json["data"]["humidity"], "N/A");
    assert_eq!(json["data"]["wind"], "N/A");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM readings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_city_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/weather", json!({ "city": "   " })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "city is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_city_field_is_a_client_error(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/weather", json!({})).await;

    assert!(response.status().is_client_error());
}
