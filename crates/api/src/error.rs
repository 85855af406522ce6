use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use weatherwatch_core::error::{CoreError, StoreError};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `weatherwatch_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The reading store failed or timed out.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            AppError::Store(err) => {
                tracing::error!(error = %err, "Reading store error");
                match err {
                    StoreError::Timeout(_) => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "STORE_TIMEOUT",
                        "The reading store did not respond in time".to_string(),
                    ),
                    StoreError::Backend(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    ),
                }
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
