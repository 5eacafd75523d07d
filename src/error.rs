//! Error types and HTTP error response handling.
//!
//! Every failure a handler can produce is an [`AppError`]; axum turns it
//! into a status code and a JSON body through [`IntoResponse`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Missing or expired session, bad credentials
/// - **Resource Errors**: Requested record not found (or not owned by the caller)
/// - **Validation Errors**: Request data that breaks a business rule
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed. Details are logged, never returned.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Bearer token is missing, unknown or expired.
    #[error("Invalid or expired session")]
    InvalidSession,

    /// Credentials were checked and rejected.
    #[error("{0}")]
    Unauthorized(String),

    /// Record does not exist, or belongs to another user.
    #[error("{0}")]
    NotFound(String),

    /// Request body or parameters are invalid.
    #[error("{0}")]
    InvalidRequest(String),

    /// Failure outside the database (hashing, report rendering).
    #[error("{0}")]
    Internal(String),
}

/// SQLSTATE for a unique constraint violation.
pub const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE for a value outside its column type's range.
pub const NUMERIC_OUT_OF_RANGE: &str = "22003";

/// Whether `error` is a database error carrying SQLSTATE `code`.
pub fn is_sqlstate(error: &sqlx::Error, code: &str) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|c| c == code)
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::InvalidRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into())
    }

    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidSession => (StatusCode::UNAUTHORIZED, "invalid_session"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::Database(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "invalid_request",
///     "message": "Account name must contain at least one letter."
///   }
/// }
/// ```
///
/// Database and internal failures are logged and reported with a generic
/// message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "An internal error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let response = AppError::invalid("Amount must be positive").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn lookup_and_credential_errors_keep_their_status() {
        assert_eq!(
            AppError::not_found("Account not found").status_and_code(),
            (StatusCode::NOT_FOUND, "not_found")
        );
        assert_eq!(
            AppError::unauthorized("Invalid password.").status_and_code(),
            (StatusCode::UNAUTHORIZED, "unauthorized")
        );
        assert_eq!(
            AppError::InvalidSession.status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::Internal("xlsx writer exploded".into());
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "xlsx writer exploded");
    }

    #[test]
    fn sqlstate_checks_ignore_non_database_errors() {
        assert!(!is_sqlstate(&sqlx::Error::RowNotFound, UNIQUE_VIOLATION));
        assert!(!is_sqlstate(&sqlx::Error::PoolTimedOut, NUMERIC_OUT_OF_RANGE));
    }
}
