//! API error types for handler operations
//!
//! Structured errors for the book endpoints, with automatic HTTP status code
//! mapping via `IntoResponse`.
//!
//! # Example
//!
//! ```rust
//! use bookshelf::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("Book", "42");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.entity_id, Some("42".to_string()));
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::books::{FieldErrors, SerializerError, NON_FIELD_ERRORS};
use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing books
    List,
    /// Getting a single book by ID
    Get,
    /// Creating a new book
    Create,
    /// Replacing a book (PUT)
    Update,
    /// Changing some fields of a book (PATCH)
    PartialUpdate,
    /// Deleting a book
    Delete,
    /// Getting the reduced summary view of a book
    Summary,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::PartialUpdate => write!(f, "partial_update"),
            Self::Delete => write!(f, "delete"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Entity was not found
    NotFound,
    /// Request body failed field validation
    ValidationFailed,
    /// Invalid request format or parameters
    BadRequest,
    /// Operation conflicts with a store constraint
    Conflict,
    /// Internal server error
    InternalError,
    /// Service temporarily unavailable
    ServiceUnavailable,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::Conflict => write!(f, "conflict"),
            Self::InternalError => write!(f, "internal_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ValidationFailed | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error code string for this error kind
    #[must_use]
    pub fn error_code(&self) -> String {
        format!("{}", self).to_uppercase()
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
    /// Per-field validation messages
    pub fields: Option<FieldErrors>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
            fields: None,
        }
    }

    /// Create a "not found" error with entity context
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::NotFound, "Not found.")
            .with_entity(entity_type, entity_id)
    }

    /// Create a validation error carrying field-keyed messages
    ///
    /// ```rust
    /// use bookshelf::books::FieldErrors;
    /// use bookshelf::handlers::ApiError;
    ///
    /// let error = ApiError::validation_failed(FieldErrors::single("title", "This field is required."));
    /// assert_eq!(error.kind.status_code(), 400);
    /// ```
    pub fn validation_failed(fields: FieldErrors) -> Self {
        let mut error = Self::new(
            ApiOperation::Create,
            ApiErrorKind::ValidationFailed,
            "Invalid input.",
        );
        error.fields = Some(fields);
        error
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    pub fn is_retriable(&self) -> bool {
        matches!(self.kind, ApiErrorKind::ServiceUnavailable)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Response body for API errors
#[derive(Debug, Serialize)]
struct ApiErrorResponse {
    error: String,
    code: String,
    status: u16,
    operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let code = self.kind.error_code();

        if status.is_server_error() {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                retriable = self.is_retriable(),
                "API error: {}", self.message
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                kind = %self.kind,
                entity_id = ?self.entity_id,
                fields = ?self.fields,
                "Request rejected: {}", self.message
            );
        }

        let response = ApiErrorResponse {
            error: self.message,
            code,
            status: status.as_u16(),
            operation: self.operation.to_string(),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            fields: self.fields,
        };

        (status, Json(response)).into_response()
    }
}

fn repository_operation_to_api_operation(op: RepositoryOperation) -> ApiOperation {
    match op {
        RepositoryOperation::FindById => ApiOperation::Get,
        RepositoryOperation::FindAll | RepositoryOperation::Count => ApiOperation::List,
        RepositoryOperation::Create => ApiOperation::Create,
        RepositoryOperation::Update => ApiOperation::Update,
        RepositoryOperation::Delete => ApiOperation::Delete,
        RepositoryOperation::Schema => ApiOperation::Get,
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = repository_operation_to_api_operation(err.operation);

        let kind = match err.kind {
            RepositoryErrorKind::NotFound => ApiErrorKind::NotFound,
            RepositoryErrorKind::ConstraintViolation => ApiErrorKind::Conflict,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout => {
                ApiErrorKind::ServiceUnavailable
            }
            RepositoryErrorKind::DatabaseError
            | RepositoryErrorKind::SerializationError
            | RepositoryErrorKind::Other => ApiErrorKind::InternalError,
        };

        // Internal details stay in the logs
        let message = match kind {
            ApiErrorKind::ServiceUnavailable => "Service temporarily unavailable".to_string(),
            ApiErrorKind::InternalError => "An internal error occurred".to_string(),
            ApiErrorKind::NotFound => "Not found.".to_string(),
            _ => err.message.clone(),
        };

        if matches!(
            kind,
            ApiErrorKind::InternalError | ApiErrorKind::ServiceUnavailable
        ) {
            tracing::error!(error = %err, "Book store failure");
        }

        Self {
            operation,
            kind,
            message,
            entity_type: err.entity_type,
            entity_id: err.entity_id,
            fields: None,
        }
    }
}

impl From<SerializerError> for ApiError {
    fn from(err: SerializerError) -> Self {
        match err {
            SerializerError::Fields(fields) => Self::validation_failed(fields),
            SerializerError::NotAnObject(_) => {
                Self::validation_failed(FieldErrors::single(NON_FIELD_ERRORS, err.to_string()))
            }
            SerializerError::Parse(_) => {
                Self::new(ApiOperation::Create, ApiErrorKind::BadRequest, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiErrorKind::ValidationFailed.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiErrorKind::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiErrorKind::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_error_code() {
        assert_eq!(ApiErrorKind::NotFound.error_code(), "NOT_FOUND");
        assert_eq!(
            ApiErrorKind::ValidationFailed.error_code(),
            "VALIDATION_FAILED"
        );
    }

    #[test]
    fn test_from_repository_not_found() {
        let err = RepositoryError::not_found("Book", "9").with_operation(RepositoryOperation::Update);
        let api: ApiError = err.into();
        assert_eq!(api.kind, ApiErrorKind::NotFound);
        assert_eq!(api.operation, ApiOperation::Update);
        assert_eq!(api.entity_id.as_deref(), Some("9"));
    }

    #[test]
    fn test_from_repository_hides_internal_message() {
        let err = RepositoryError::database_error(
            RepositoryOperation::FindAll,
            "relation \"books\" does not exist",
        );
        let api: ApiError = err.into();
        assert_eq!(api.kind, ApiErrorKind::InternalError);
        assert_eq!(api.message, "An internal error occurred");
    }

    #[test]
    fn test_from_repository_connection_is_unavailable() {
        let api: ApiError = RepositoryError::connection_failed("refused").into();
        assert_eq!(api.kind, ApiErrorKind::ServiceUnavailable);
        assert!(api.is_retriable());
    }

    #[test]
    fn test_from_serializer_non_object() {
        let api: ApiError = SerializerError::NotAnObject("list").into();
        assert_eq!(api.kind, ApiErrorKind::ValidationFailed);
        let fields = api.fields.unwrap();
        assert_eq!(
            fields.get(NON_FIELD_ERRORS).unwrap()[0],
            "Invalid data. Expected a dictionary, but got list."
        );
    }

    #[test]
    fn test_from_serializer_parse_error() {
        let api: ApiError = SerializerError::Parse("EOF while parsing".to_string()).into();
        assert_eq!(api.kind, ApiErrorKind::BadRequest);
        assert_eq!(api.message, "JSON parse error - EOF while parsing");
        assert!(api.fields.is_none());
    }

    #[test]
    fn test_display_with_entity() {
        let error = ApiError::not_found("Book", "3");
        assert_eq!(
            error.to_string(),
            "API not_found error during get: Not found. [Book: 3]"
        );
    }
}
