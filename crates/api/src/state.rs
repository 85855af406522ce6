use std::time::Duration;

use weatherwatch_db::PgReadingStore;
use weatherwatch_pipeline::SummaryService;
use weatherwatch_worker::wiring::Collector;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: weatherwatch_db::DbPool,
    /// The same per-location pipeline the scheduler runs.
    pub collector: Collector,
    /// Upper bound on one interactive lookup, kept under the request timeout.
    pub lookup_timeout: Duration,
    /// Windowed statistics over stored readings.
    pub summaries: SummaryService<PgReadingStore>,
}
