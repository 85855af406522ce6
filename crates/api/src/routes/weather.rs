use axum::routing::post;
use axum::Router;

use crate::handlers::weather;
use crate::state::AppState;

/// Interactive lookup route.
pub fn router() -> Router<AppState> {
    Router::new().route("/weather", post(weather::lookup))
}
