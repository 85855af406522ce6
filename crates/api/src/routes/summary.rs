use axum::routing::get;
use axum::Router;

use crate::handlers::summary;
use crate::state::AppState;

/// Routes mounted at `/summaries`.
///
/// ```text
/// GET /daily                -> daily
/// GET /locations/{location}  -> for_location
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/daily", get(summary::daily))
        .route("/locations/{location}", get(summary::for_location))
}
