//! Error types for list workspaces.

use thiserror::Error;

/// Main error type for list operations.
///
/// Absent keys are not errors; they produce [`Outcome::Absent`](crate::Outcome::Absent).
#[derive(Debug, Error)]
pub enum ListError {
    #[error("Element {index} is not callable (found {found})")]
    NotCallable { index: usize, found: &'static str },

    #[error("Invocation failed: {0}")]
    Invocation(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid arguments for {operation}: {reason}")]
    InvalidArguments {
        operation: &'static str,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ListError {
    fn from(e: serde_json::Error) -> Self {
        ListError::Config(e.to_string())
    }
}

/// Result type for list operations.
pub type Result<T> = std::result::Result<T, ListError>;
