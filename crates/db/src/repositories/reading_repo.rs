//! Repository for the `readings` table (append-only time-series).

use sqlx::PgPool;
use weatherwatch_core::types::Timestamp;

use crate::models::reading::{CreateReading, ReadingAggregate, StoredReading};

/// Column list for `readings` SELECT queries (includes `id` and `created_at`).
const COLUMNS: &str = "\
    id, location, temperature_celsius, humidity_percent, wind_speed, \
    country, observed_at, created_at";

/// Column list for `readings` INSERT statements (excludes auto-generated `id` and `created_at`).
const INSERT_COLUMNS: &str = "\
    location, temperature_celsius, humidity_percent, wind_speed, \
    country, observed_at";

/// Provides query operations for readings.
pub struct ReadingRepo;

impl ReadingRepo {
    /// Append a single reading.
    pub async fn insert(
        pool: &PgPool,
        reading: &CreateReading<'_>,
    ) -> Result<StoredReading, sqlx::Error> {
        let query = format!(
            "INSERT INTO readings ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StoredReading>(&query)
            .bind(reading.location)
            .bind(reading.temperature_celsius)
            .bind(reading.humidity_percent)
            .bind(reading.wind_speed)
            .bind(reading.country)
            .bind(reading.observed_at)
            .fetch_one(pool)
            .await
    }

    /// Temperature statistics per location over `[window_start, window_end)`.
    ///
    /// The reduction runs in PostgreSQL (`COUNT/AVG/MIN/MAX ... GROUP BY`),
    /// so the cost on this side is one row per location regardless of how
    /// many readings fall in the window. Locations without readings in the
    /// window are absent from the result. When `location` is `Some`, only
    /// that location is considered.
    pub async fn aggregate(
        pool: &PgPool,
        location: Option<&str>,
        window_start: Timestamp,
        window_end: Timestamp,
    ) -> Result<Vec<ReadingAggregate>, sqlx::Error> {
        let query = "\
            SELECT location, \
                COUNT(*) AS sample_count, \
                AVG(temperature_celsius) AS avg_temp, \
                MIN(temperature_celsius) AS min_temp, \
                MAX(temperature_celsius) AS max_temp \
            FROM readings \
            WHERE observed_at >= $1 AND observed_at < $2 \
              AND ($3::TEXT IS NULL OR location = $3) \
            GROUP BY location \
            ORDER BY location";
        sqlx::query_as::<_, ReadingAggregate>(query)
            .bind(window_start)
            .bind(window_end)
            .bind(location)
            .fetch_all(pool)
            .await
    }
}
