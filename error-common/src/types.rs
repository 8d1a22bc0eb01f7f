use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification shared by every component error.
///
/// Storage-layer exception types never cross a component boundary; they are
/// mapped onto one of these kinds together with a human readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The referenced entity or record does not exist
    NotFound,
    /// Caller supplied input that cannot be processed
    Validation,
    /// The persistence layer failed during a read or a write
    StorageFailure,
    /// Anything not classified above
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation_error",
            ErrorKind::StorageFailure => "storage_failure",
            ErrorKind::Unexpected => "unexpected_error",
        }
    }

    /// Stable error code for this kind, see [`crate::codes`]
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => crate::codes::lookup::RECORD_NOT_FOUND,
            ErrorKind::Validation => crate::codes::validation::INVALID_INPUT,
            ErrorKind::StorageFailure => crate::codes::storage::QUERY_FAILED,
            ErrorKind::Unexpected => crate::codes::system::UNEXPECTED,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-level error enum
#[derive(Error, Debug)]
pub enum IcareError {
    /// Network communication errors
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server start-up and serving errors
    #[error("Server error: {0}")]
    ServerError(String),

    /// Database bootstrap errors (pool creation, migrations)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for process-level operations
pub type Result<T> = std::result::Result<T, IcareError>;
