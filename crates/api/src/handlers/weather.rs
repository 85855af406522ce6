//! Interactive single-location lookup.
//!
//! Runs the same fetch -> store -> alert pipeline as a scheduled cycle and
//! renders the reading for display. A lookup that produced no stored reading
//! answers with a placeholder view rather than an error status.

use std::time::Duration;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use weatherwatch_core::collection::{Notifier, ReadingSource, ReadingStore};
use weatherwatch_core::error::CoreError;
use weatherwatch_core::reading::{format_celsius, Reading};
use weatherwatch_pipeline::{CollectionCycle, LocationOutcome};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub city: String,
}

/// Display form of a reading. Every field is preformatted text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub city: String,
    pub country: String,
    /// Degrees Celsius to two decimals.
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
}

/// Shown when the location could not be resolved or recorded.
pub const NOT_FOUND_CITY: &str = "Location not found";

const UNAVAILABLE: &str = "N/A";

impl WeatherView {
    pub fn not_found() -> Self {
        Self {
            city: NOT_FOUND_CITY.to_string(),
            country: String::new(),
            temperature: UNAVAILABLE.to_string(),
            humidity: UNAVAILABLE.to_string(),
            wind: UNAVAILABLE.to_string(),
        }
    }
}

impl From<&Reading> for WeatherView {
    fn from(reading: &Reading) -> Self {
        Self {
            city: reading.location.clone(),
            country: reading.country.clone().unwrap_or_default(),
            temperature: format_celsius(reading.temperature_celsius),
            humidity: reading.humidity_percent.to_string(),
            wind: reading.wind_speed.to_string(),
        }
    }
}

/// Map a pipeline outcome to what the caller sees.
///
/// A failed alert does not hide the reading; a failed fetch or write does.
pub fn view_for(outcome: &LocationOutcome) -> WeatherView {
    match outcome {
        LocationOutcome::Recorded { reading, .. } | LocationOutcome::NotifyFailed { reading, .. } => {
            WeatherView::from(reading)
        }
        LocationOutcome::FetchFailed(_)
        | LocationOutcome::PersistFailed { .. }
        | LocationOutcome::Aborted(_) => WeatherView::not_found(),
    }
}

/// Run the pipeline for `city`, giving up once `limit` elapses.
///
/// An abandoned lookup is reported as [`LocationOutcome::Aborted`].
pub async fn collect_within<S, R, N>(
    cycle: &CollectionCycle<S, R, N>,
    city: &str,
    limit: Duration,
) -> LocationOutcome
where
    S: ReadingSource,
    R: ReadingStore,
    N: Notifier,
{
    match tokio::time::timeout(limit, cycle.collect_one(city)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            let limit_ms = limit.as_millis() as u64;
            tracing::warn!(city, limit_ms, "Interactive lookup exceeded its deadline");
            LocationOutcome::Aborted(format!("lookup timed out after {limit_ms}ms"))
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/weather
pub async fn lookup(
    State(state): State<AppState>,
    Json(input): Json<LookupRequest>,
) -> AppResult<Json<DataResponse<WeatherView>>> {
    let city = input.city.trim();
    if city.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "city is required".to_string(),
        )));
    }

    let outcome = collect_within(&state.collector, city, state.lookup_timeout).await;
    tracing::info!(city, outcome = outcome.kind(), "Interactive lookup");

    Ok(Json(DataResponse {
        data: view_for(&outcome),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use chrono::Utc;
    use weatherwatch_core::error::{FetchError, NotifyError, StoreError};
    use weatherwatch_core::reading::AggregateSummary;
    use weatherwatch_core::thresholds::AlertThreshold;
    use weatherwatch_core::types::Timestamp;

    use super::*;

    struct SlowSource(Duration);

    impl ReadingSource for SlowSource {
        async fn fetch(&self, location: &str) -> Result<Reading, FetchError> {
            tokio::time::sleep(self.0).await;
            Ok(Reading {
                location: location.to_string(),
                ..reading()
            })
        }
    }

    struct NullStore;

    impl ReadingStore for NullStore {
        async fn append(&self, _reading: &Reading) -> Result<(), StoreError> {
            Ok(())
        }

        async fn aggregate(
            &self,
            _location: Option<&str>,
            _window_start: Timestamp,
            _window_end: Timestamp,
        ) -> Result<Vec<AggregateSummary>, StoreError> {
            Ok(Vec::new())
        }
    }

    struct NullNotifier;

    impl Notifier for NullNotifier {
        async fn notify(&self, _location: &str, _temperature_celsius: f64) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    fn slow_cycle(delay: Duration) -> CollectionCycle<SlowSource, NullStore, NullNotifier> {
        CollectionCycle::new(
            Arc::new(SlowSource(delay)),
            Arc::new(NullStore),
            Arc::new(NullNotifier),
            AlertThreshold::default(),
            Duration::from_secs(15),
        )
    }

    fn reading() -> Reading {
        Reading {
            location: "Delhi".to_string(),
            temperature_celsius: 31.4,
            humidity_percent: 78.0,
            wind_speed: 4.12,
            country: Some("IN".to_string()),
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn recorded_reading_is_formatted() {
        let view = view_for(&LocationOutcome::Recorded {
            reading: reading(),
            alerted: false,
        });
        assert_eq!(
            view,
            WeatherView {
                city: "Delhi".to_string(),
                country: "IN".to_string(),
                temperature: "31.40".to_string(),
                humidity: "78".to_string(),
                wind: "4.12".to_string(),
            }
        );
    }

    #[test]
    fn failed_alert_still_shows_reading() {
        let view = view_for(&LocationOutcome::NotifyFailed {
            reading: reading(),
            error: NotifyError::Timeout(15),
        });
        assert_eq!(view.city, "Delhi");
    }

    #[test]
    fn fetch_or_persist_failure_shows_placeholder() {
        let fetch = view_for(&LocationOutcome::FetchFailed(FetchError::new("city not found")));
        assert_eq!(fetch, WeatherView::not_found());
        assert_eq!(fetch.temperature, "N/A");

        let persist = view_for(&LocationOutcome::PersistFailed {
            reading: reading(),
            error: StoreError::Backend("down".to_string()),
        });
        assert_eq!(persist.city, NOT_FOUND_CITY);
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_past_deadline_renders_placeholder() {
        let cycle = slow_cycle(Duration::from_secs(10));

        let outcome = collect_within(&cycle, "Delhi", Duration::from_secs(5)).await;

        assert_matches!(&outcome, LocationOutcome::Aborted(msg) => {
            assert!(msg.contains("timed out"));
        });
        assert_eq!(view_for(&outcome), WeatherView::not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_within_deadline_renders_reading() {
        let cycle = slow_cycle(Duration::from_secs(2));

        let outcome = collect_within(&cycle, "Delhi", Duration::from_secs(5)).await;

        assert_matches!(outcome, LocationOutcome::Recorded { .. });
        assert_eq!(view_for(&outcome).city, "Delhi");
    }
}
