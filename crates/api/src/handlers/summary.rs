//! Aggregated temperature statistics.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use weatherwatch_core::reading::AggregateSummary;
use weatherwatch_pipeline::summary::trailing_window;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default trailing window for per-location summaries.
const DEFAULT_HOURS: u32 = 24;

/// Longest trailing window accepted (one week).
const MAX_HOURS: u32 = 168;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// How many hours back from now to aggregate (default: 24).
    pub hours: Option<u32>,
}

/// GET /api/v1/summaries/daily
///
/// One summary per location with readings observed since midnight UTC.
pub async fn daily(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AggregateSummary>>>> {
    let summaries = state.summaries.daily_summaries(Utc::now()).await?;
    Ok(Json(DataResponse { data: summaries }))
}

/// GET /api/v1/summaries/locations/{location}?hours=N
pub async fn for_location(
    State(state): State<AppState>,
    Path(location): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<DataResponse<AggregateSummary>>> {
    let hours = query.hours.unwrap_or(DEFAULT_HOURS);
    if !(1..=MAX_HOURS).contains(&hours) {
        return Err(AppError::BadRequest(format!(
            "hours must be between 1 and {MAX_HOURS}"
        )));
    }

    let (start, end) = trailing_window(Utc::now(), hours);
    let summary = state.summaries.summarize(&location, start, end).await?;
    Ok(Json(DataResponse { data: summary }))
}
