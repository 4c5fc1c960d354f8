//! Task error types.

use thiserror::Error;

/// Errors that can occur while building, updating, or querying tasks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// Structured input is malformed (e.g. a due date not shaped `YYYY-MM-DD`).
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A value fails a domain constraint.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A value of the wrong kind was supplied for a field.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Search was invoked with a blank keyword.
    #[error("Search keyword cannot be empty")]
    EmptyKeyword,

    /// No task exists with the given ID.
    #[error("Task not found: {0}")]
    NotFound(String),
}

impl TaskError {
    pub(crate) fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    pub(crate) fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    pub(crate) fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }
}

impl From<serde_json::Error> for TaskError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidFormat(e.to_string())
    }
}

/// Result type for task operations.
pub type TaskResult<T> = Result<T, TaskError>;
