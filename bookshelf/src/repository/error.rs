//! Repository error types
//!
//! Structured errors for book store operations. Every error records which
//! operation failed and, when known, which entity was involved.
//!
//! # Example
//!
//! ```rust
//! use bookshelf::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::not_found("Book", "42");
//! assert!(matches!(error.kind, RepositoryErrorKind::NotFound));
//! assert_eq!(error.entity_id.as_deref(), Some("42"));
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Finding a single entity by ID
    FindById,
    /// Finding multiple entities with filters
    FindAll,
    /// Counting entities matching filters
    Count,
    /// Inserting a new entity
    Create,
    /// Overwriting an existing entity
    Update,
    /// Removing an entity
    Delete,
    /// Preparing the backing schema
    Schema,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindById => write!(f, "find_by_id"),
            Self::FindAll => write!(f, "find_all"),
            Self::Count => write!(f, "count"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Schema => write!(f, "schema"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Entity was not found
    NotFound,
    /// Database constraint violation (unique, foreign key, check)
    ConstraintViolation,
    /// Failed to reach the store
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Underlying database error
    DatabaseError,
    /// A stored row could not be decoded
    SerializationError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured repository error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved (e.g. "Book")
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a "not found" error with entity context
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            operation: RepositoryOperation::FindById,
            kind: RepositoryErrorKind::NotFound,
            message: "Entity not found".to_string(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(entity_id.into()),
        }
    }

    /// Create a constraint violation error
    pub fn constraint_violation(
        operation: RepositoryOperation,
        message: impl Into<String>,
    ) -> Self {
        Self::new(operation, RepositoryErrorKind::ConstraintViolation, message)
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::FindById,
            RepositoryErrorKind::ConnectionFailed,
            message,
        )
    }

    /// Create a timeout error
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// Create a database error
    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    /// Create a serialization error
    pub fn serialization_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::SerializationError, message)
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
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Transient failures that may succeed if the caller tries again.
    ///
    /// Nothing in this crate retries; the flag is surfaced in logs.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}

// The operation is unknown at conversion time; callers refine it with
// `with_operation`.
#[cfg(feature = "database")]
impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::Error as E;
        let op = RepositoryOperation::FindAll;
        match err {
            E::RowNotFound => Self::new(op, RepositoryErrorKind::NotFound, "Row not found"),
            E::PoolTimedOut => Self::timeout(op, "Connection pool timed out"),
            E::PoolClosed => Self::connection_failed("Connection pool is closed"),
            E::WorkerCrashed => Self::connection_failed("Database worker crashed"),
            E::Io(e) => Self::connection_failed(e.to_string()),
            E::Tls(e) => Self::connection_failed(format!("TLS error: {}", e)),
            E::ColumnNotFound(col) => {
                Self::serialization_error(op, format!("Column not found: {}", col))
            }
            E::ColumnDecode { index, source } => Self::serialization_error(
                op,
                format!("Failed to decode column {}: {}", index, source),
            ),
            E::Decode(e) => Self::serialization_error(op, e.to_string()),
            E::Database(db_err) => {
                if db_err.is_unique_violation()
                    || db_err.is_foreign_key_violation()
                    || db_err.is_check_violation()
                {
                    Self::constraint_violation(op, db_err.to_string())
                } else {
                    Self::database_error(op, db_err.to_string())
                }
            }
            other => Self::new(op, RepositoryErrorKind::Other, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_operation_display() {
        assert_eq!(format!("{}", RepositoryOperation::FindById), "find_by_id");
        assert_eq!(format!("{}", RepositoryOperation::FindAll), "find_all");
        assert_eq!(format!("{}", RepositoryOperation::Count), "count");
        assert_eq!(format!("{}", RepositoryOperation::Create), "create");
        assert_eq!(format!("{}", RepositoryOperation::Update), "update");
        assert_eq!(format!("{}", RepositoryOperation::Delete), "delete");
        assert_eq!(format!("{}", RepositoryOperation::Schema), "schema");
    }

    #[test]
    fn test_not_found_carries_entity() {
        let error = RepositoryError::not_found("Book", "7");
        assert_eq!(error.operation, RepositoryOperation::FindById);
        assert_eq!(error.kind, RepositoryErrorKind::NotFound);
        assert_eq!(error.entity_type.as_deref(), Some("Book"));
        assert_eq!(error.entity_id.as_deref(), Some("7"));
        assert!(!error.is_retriable());
    }

    #[test]
    fn test_with_operation_and_entity() {
        let error = RepositoryError::connection_failed("refused")
            .with_operation(RepositoryOperation::Create)
            .with_entity("Book", "new");
        assert_eq!(error.operation, RepositoryOperation::Create);
        assert!(error.is_retriable());
        assert!(error.to_string().contains("[Book: new]"));
    }

    #[test]
    fn test_display_without_entity() {
        let error =
            RepositoryError::database_error(RepositoryOperation::Update, "syntax error at or near");
        let display = error.to_string();
        assert!(display.contains("database_error"));
        assert!(display.contains("update"));
        assert!(!display.contains('['));
    }

    #[test]
    fn test_timeout_is_retriable() {
        assert!(RepositoryError::timeout(RepositoryOperation::FindAll, "slow").is_retriable());
        assert!(!RepositoryError::constraint_violation(RepositoryOperation::Create, "dup")
            .is_retriable());
    }

    #[cfg(feature = "database")]
    #[test]
    fn test_from_sqlx_pool_timeout() {
        let error: RepositoryError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(error.kind, RepositoryErrorKind::Timeout);

        let error: RepositoryError = sqlx::Error::PoolClosed.into();
        assert_eq!(error.kind, RepositoryErrorKind::ConnectionFailed);
    }
}
