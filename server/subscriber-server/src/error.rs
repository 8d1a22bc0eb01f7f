use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use database_layer::DatabaseError;
use error_common::{codes, ErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Error type
    #[schema(example = "not_found")]
    pub error_type: String,
    /// Stable machine-readable code
    #[schema(example = "LOOKUP_2001")]
    pub error_code: String,
    /// Human-readable error message
    pub message: String,
    /// Field-specific validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<HashMap<String, Vec<String>>>,
    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Suggested actions for resolving the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Standard API success response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResponseMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: Option<HashMap<String, Vec<String>>>,
    },

    #[error("{message}")]
    NotFound { message: String },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Bad request: {message}")]
    BadRequest { message: String },
}

impl ApiError {
    /// Validation error attributed to a single request field.
    ///
    /// `field` may be a path such as `self.cart_products`; only its last
    /// segment is reported.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let name = field.rsplit('.').next().unwrap_or(field).trim();
        let mut field_errors = HashMap::new();
        field_errors.insert(name.to_string(), vec![message.clone()]);
        Self::Validation {
            message,
            field_errors: Some(field_errors),
        }
    }

    /// Create a simple validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    /// Create a not found error carrying the message shown to the caller
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Error category shared with the storage layer
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest { .. } => ErrorKind::Validation,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Database(db_err) => db_err.kind(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Database(DatabaseError::ConnectionFailed(_)) => StatusCode::SERVICE_UNAVAILABLE,
            _ => match self.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::StorageFailure | ErrorKind::Unexpected => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::Database(DatabaseError::ConnectionFailed(_)) => "service_unavailable",
            _ => self.kind().as_str(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => codes::validation::INVALID_INPUT,
            ApiError::BadRequest { .. } => codes::validation::INVALID_FORMAT,
            ApiError::NotFound { .. } => codes::lookup::RECORD_NOT_FOUND,
            ApiError::Database(db_err) => db_err.code(),
        }
    }

    /// Get suggested actions for resolving the error
    pub fn suggestions(&self) -> Option<Vec<String>> {
        match self.status_code() {
            StatusCode::BAD_REQUEST => Some(vec![
                "Check the request payload for invalid fields".to_string(),
                "Ensure all required fields are provided".to_string(),
            ]),
            StatusCode::NOT_FOUND => Some(vec![
                "Verify the identifier or mobile number is correct".to_string(),
            ]),
            StatusCode::SERVICE_UNAVAILABLE => Some(vec![
                "Try again in a few moments".to_string(),
                "Contact support if the issue persists".to_string(),
            ]),
            _ => None,
        }
    }

    /// Message returned to the caller.
    ///
    /// Storage and unexpected failures keep their driver detail in the log
    /// only; the response carries the operation that failed.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Database(DatabaseError::QueryFailed { context, .. }) => context.clone(),
            ApiError::Database(DatabaseError::ConnectionFailed(_)) => {
                "Unable to reach the database".to_string()
            }
            ApiError::Database(err) if err.kind() == ErrorKind::Unexpected => {
                "An unexpected error occurred".to_string()
            }
            ApiError::Database(DatabaseError::MigrationError(_)) => {
                "Database schema is not ready".to_string()
            }
            ApiError::Database(err) => err.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        if status_code.is_server_error() {
            error!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "API error occurred"
            );
        } else {
            warn!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "API request rejected"
            );
        }

        let field_errors = match &self {
            ApiError::Validation { field_errors, .. } => field_errors.clone(),
            _ => None,
        };

        let error_response = ApiErrorResponse {
            error_id,
            error_type: self.error_type().to_string(),
            error_code: self.error_code().to_string(),
            message: self.public_message(),
            field_errors,
            timestamp: chrono::Utc::now(),
            suggestions: self.suggestions(),
        };

        (status_code, Json(error_response)).into_response()
    }
}

/// Malformed or unparseable JSON bodies
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Missing or mistyped query parameters
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Helper function to create successful API responses
pub fn api_success<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
        metadata: None,
    }
}

/// Successful response carrying the number of returned records
pub fn api_success_with_count<T>(data: T, total_count: usize) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
        metadata: Some(ResponseMetadata {
            total_count: i64::try_from(total_count).ok(),
        }),
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::not_found("No medicine products found").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::validation("bad").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(DatabaseError::SequenceNotFound("ORDER".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DatabaseError::InvalidCoordinates("latitude".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DatabaseError::QueryFailed {
                context: "fetching".into(),
                message: "boom".into()
            })
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(DatabaseError::ConnectionFailed("refused".into())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_driver_detail_not_exposed() {
        let err = ApiError::from(DatabaseError::QueryFailed {
            context: "Database error while fetching orders list".into(),
            message: "relation \"tbl_orders\" does not exist".into(),
        });
        assert_eq!(err.public_message(), "Database error while fetching orders list");
        assert_eq!(err.error_type(), "storage_failure");
    }

    #[test]
    fn test_not_found_message_passes_through() {
        let err = ApiError::not_found("No Prescription found for this Subscriber");
        assert_eq!(err.public_message(), "No Prescription found for this Subscriber");
        assert_eq!(err.error_code(), codes::lookup::RECORD_NOT_FOUND);
    }

    #[test]
    fn test_invalid_field_uses_last_path_segment() {
        match ApiError::invalid_field("self.subscriber_latitude", "out of range") {
            ApiError::Validation { message, field_errors: Some(fields) } => {
                assert_eq!(message, "out of range");
                assert_eq!(fields.get("subscriber_latitude"), Some(&vec!["out of range".to_string()]));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_bad_request_mapping() {
        let err = ApiError::bad_request("Failed to deserialize query string");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_type(), "bad_request");
        assert_eq!(err.error_code(), codes::validation::INVALID_FORMAT);
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = ApiError::validation("latitude out of range").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error_type, "validation_error");
        assert_eq!(body.message, "latitude out of range");
        assert!(!body.error_id.is_empty());
    }
}
