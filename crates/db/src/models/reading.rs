//! Reading entity models and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use weatherwatch_core::reading::{AggregateSummary, Reading};
use weatherwatch_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Readings (append-only)
// ---------------------------------------------------------------------------

/// A persisted reading row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StoredReading {
    pub id: DbId,
    pub location: String,
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub wind_speed: f64,
    pub country: Option<String>,
    pub observed_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for inserting a new reading row.
#[derive(Debug, Clone)]
pub struct CreateReading<'a> {
    pub location: &'a str,
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub wind_speed: f64,
    pub country: Option<&'a str>,
    pub observed_at: Timestamp,
}

impl<'a> From<&'a Reading> for CreateReading<'a> {
    fn from(reading: &'a Reading) -> Self {
        Self {
            location: &reading.location,
            temperature_celsius: reading.temperature_celsius,
            humidity_percent: reading.humidity_percent,
            wind_speed: reading.wind_speed,
            country: reading.country.as_deref(),
            observed_at: reading.observed_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// One `GROUP BY location` row of the windowed temperature aggregate.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReadingAggregate {
    pub location: String,
    pub sample_count: i64,
    pub avg_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

impl ReadingAggregate {
    /// Attach the query window to produce the domain summary.
    pub fn into_summary(self, window_start: Timestamp, window_end: Timestamp) -> AggregateSummary {
        AggregateSummary {
            location: self.location,
            window_start,
            window_end,
            avg_temp: self.avg_temp,
            min_temp: self.min_temp,
            max_temp: self.max_temp,
            sample_count: self.sample_count,
        }
    }
}
