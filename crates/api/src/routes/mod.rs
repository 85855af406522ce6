pub mod health;
pub mod summary;
pub mod weather;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// POST /weather                      interactive lookup (fetch, store, alert)
/// GET  /summaries/daily              today's per-location statistics
/// GET  /summaries/locations/{location}?hours=N trailing-window statistics
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(weather::router())
        .nest("/summaries", summary::router())
}
