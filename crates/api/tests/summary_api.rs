//! Integration tests for the summary endpoints.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get};
use sqlx::PgPool;
use weatherwatch_core::collection::ReadingStore;
use weatherwatch_core::reading::Reading;
use weatherwatch_db::PgReadingStore;

async fn seed(pool: &PgPool, location: &str, temps: &[f64], minutes_ago: i64) {
    let store = PgReadingStore::new(pool.clone());
    let observed_at = Utc::now() - Duration::minutes(minutes_ago);
    for temp in temps {
        let reading = Reading {
            location: location.to_string(),
            temperature_celsius: *temp,
            humidity_percent: 55.0,
            wind_speed: 3.1,
            country: Some("IN".to_string()),
            observed_at,
        };
        store.append(&reading).await.expect("append should succeed");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn location_summary_over_default_window(pool: PgPool) {
    seed(&pool, "Delhi", &[30.0, 40.0, 20.0], 60).await;
    seed(&pool, "Delhi", &[99.0], 60 * 30).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/summaries/locations/Delhi").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["location"], "Delhi");
    assert_eq!(data["sample_count"], 3);
    assert_eq!(data["avg_temp"], 30.0);
    assert_eq!(data["min_temp"], 20.0);
    assert_eq!(data["max_temp"], 40.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn location_without_readings_has_zero_samples(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/summaries/locations/Kolkata?hours=6").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["sample_count"], 0);
    assert!(json["data"]["avg_temp"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn hours_out_of_range_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/summaries/locations/Delhi?hours=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/summaries/locations/Delhi?hours=169").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn daily_summary_groups_by_location(pool: PgPool) {
    seed(&pool, "Mumbai", &[31.0], 0).await;
    seed(&pool, "Delhi", &[38.0, 36.0], 0).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/summaries/daily").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = json["data"].as_array().expect("data should be an array");
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["location"], "Delhi");
    assert_eq!(data[0]["sample_count"], 2);
    assert_eq!(data[0]["max_temp"], 38.0);
    assert_eq!(data[1]["location"], "Mumbai");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn location_named_daily_is_reachable(pool: PgPool) {
    seed(&pool, "daily", &[25.0], 10).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/summaries/locations/daily").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["location"], "daily");
    assert_eq!(json["data"]["sample_count"], 1);
}
