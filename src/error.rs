//! Domain error types for the report portal service.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use std::fmt;

use serde::Serialize;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid request data
    #[error("Incorrect request: {0}")]
    IncorrectRequest(String),

    /// Resource belongs to a different project than the one in the request
    #[error("Forbidden operation: {0}")]
    ForbiddenOperation(String),

    /// Caller lacks the role or ownership required for the operation
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Direct operation on a retry item
    #[error("Retries handler error: {0}")]
    RetriesHandlerError(String),

    /// Test item is still in progress
    #[error("Test item is not finished: {0}")]
    ItemNotFinished(String),

    /// Launch is still in progress
    #[error("Launch is not finished: {0}")]
    LaunchNotFinished(String),

    /// Storage (S3) operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Analyzer index operation failed
    #[error("Index error: {0}")]
    Index(String),
}

impl AppError {
    pub fn test_item_not_found(id: i64) -> Self {
        AppError::NotFound(format!("Test Item '{}'", id))
    }

    pub fn launch_not_found(id: i64) -> Self {
        AppError::NotFound(format!("Launch '{}'", id))
    }

    pub fn widget_not_found(id: i64) -> Self {
        AppError::NotFound(format!("Widget with ID '{}'", id))
    }

    /// Stable machine-readable code for the error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::IncorrectRequest(_) => "INCORRECT_REQUEST",
            AppError::ForbiddenOperation(_) => "FORBIDDEN_OPERATION",
            AppError::AccessDenied(_) => "ACCESS_DENIED",
            AppError::RetriesHandlerError(_) => "RETRIES_HANDLER_ERROR",
            AppError::ItemNotFinished(_) => "TEST_ITEM_IS_NOT_FINISHED",
            AppError::LaunchNotFinished(_) => "LAUNCH_IS_NOT_FINISHED",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Index(_) => "INDEX_ERROR",
        }
    }

    /// Whether the error is a permanent precondition failure caused by the caller.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            AppError::Database(_) | AppError::Storage(_) | AppError::Index(_)
        )
    }
}

/// Error body handed to the surrounding request layer.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let message = match err {
            AppError::Database(detail) => {
                tracing::error!("Database error: {}", detail);
                "An internal database error occurred".to_string()
            }
            other => other.to_string(),
        };

        ErrorResponse {
            error: err.error_code().to_string(),
            message,
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::IncorrectRequest(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Index(err.to_string())
    }
}
