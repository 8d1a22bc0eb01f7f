use error_common::{codes, ErrorKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("{context}: {message}")]
    QueryFailed { context: String, message: String },

    #[error("Entity not found: {0}")]
    SequenceNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Stored code {code:?} for entity {entity} is not in PREFIX+DIGITS form")]
    InvalidSequenceCode { entity: String, code: String },

    #[error("Migration error: {0}")]
    MigrationError(String),
}

impl DatabaseError {
    /// Wrap a driver error with the operation that was running.
    ///
    /// Meant for `map_err`, so the raw `sqlx::Error` never leaves this crate:
    ///
    /// ```ignore
    /// query.fetch_all(&pool).await.map_err(DatabaseError::query("fetching stores"))?;
    /// ```
    pub fn query(context: impl Into<String>) -> impl FnOnce(sqlx::Error) -> DatabaseError {
        let context = context.into();
        move |err| {
            let err = DatabaseError::from_sqlx(&context, err);
            tracing::error!(error = %err, "Database operation failed");
            err
        }
    }

    fn from_sqlx(context: &str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionFailed(format!("{context}: {err}"))
            }
            other => DatabaseError::QueryFailed {
                context: context.to_string(),
                message: other.to_string(),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DatabaseError::SequenceNotFound(_) => ErrorKind::NotFound,
            DatabaseError::Validation(_) | DatabaseError::InvalidCoordinates(_) => {
                ErrorKind::Validation
            }
            DatabaseError::ConnectionFailed(_)
            | DatabaseError::QueryFailed { .. }
            | DatabaseError::MigrationError(_) => ErrorKind::StorageFailure,
            DatabaseError::InvalidSequenceCode { .. } => ErrorKind::Unexpected,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DatabaseError::SequenceNotFound(_) => codes::lookup::SEQUENCE_NOT_FOUND,
            DatabaseError::InvalidCoordinates(_) => codes::validation::COORDINATE_OUT_OF_RANGE,
            DatabaseError::ConnectionFailed(_) => codes::storage::CONNECTION_FAILED,
            DatabaseError::QueryFailed { message, .. } if message.contains("duplicate key") => {
                codes::storage::CONSTRAINT_VIOLATION
            }
            other => other.kind().code(),
        }
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
