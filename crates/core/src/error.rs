//! Error taxonomy shared across the workspace.
//!
//! [`CoreError`] covers configuration and request validation. The three
//! pipeline errors ([`FetchError`], [`StoreError`], [`NotifyError`]) are the
//! failure types of the collaborator seams in [`crate::collection`]; each is
//! caught and logged per location by the collection cycle.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Failure to obtain a reading from the external source.
///
/// Transport failures, malformed payloads, and provider-level error codes all
/// collapse into this single type. `message` carries the provider's own
/// message when one was returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Fetch failed: {message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure to append to or query the reading store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The backing database rejected or failed the operation.
    #[error("Store error: {0}")]
    Backend(String),

    /// The operation did not complete within the configured call timeout.
    #[error("Store operation timed out after {0}s")]
    Timeout(u64),
}

/// Failure to deliver an alert notification.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotifyError {
    /// One or more configured delivery channels failed.
    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    /// Delivery did not complete within the configured call timeout.
    #[error("Notification timed out after {0}s")]
    Timeout(u64),
}
