//! Error types and HTTP error response handling.
//!
//! This module defines all application errors, how raw database errors are
//! translated into them, and how they are converted into HTTP responses with
//! appropriate status codes and JSON bodies.

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
/// - **Database Errors**: Any sqlx::Error that has no more specific meaning
/// - **Constraint Errors**: Duplicate member ids
/// - **Resource Errors**: Requested members not found
/// - **Business Logic Errors**: Transfers rejected by a destination guard
/// - **Validation Errors**: Invalid request data
/// - **Transfer Errors**: Any of the above, raised inside a transfer that was rolled back
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A member with this id already exists.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Member already exists: {0}")]
    DuplicateKey(String),

    /// Requested member does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    /// The destination of a transfer was refused.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Transfer rejected: {0}")]
    TransferRejected(String),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A transfer failed and every change it made was rolled back.
    ///
    /// The original cause is kept as the error source.
    #[error("Transfer failed: {0}")]
    TransferFailed(#[source] Box<AppError>),
}

impl AppError {
    /// Wrap a failure raised inside a transfer.
    pub fn transfer_failed(cause: AppError) -> Self {
        AppError::TransferFailed(Box::new(cause))
    }

    /// The innermost cause, looking through any `TransferFailed` wrappers.
    pub fn root_cause(&self) -> &AppError {
        match self {
            AppError::TransferFailed(cause) => cause.root_cause(),
            other => other,
        }
    }
}

/// Translate a raw sqlx error into the application's error vocabulary.
///
/// - Unique and primary key violations become `DuplicateKey`
/// - `RowNotFound` becomes `MemberNotFound`
/// - Everything else stays a `Database` error
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::DuplicateKey(db_err.message().to_string());
            }
        }

        match err {
            sqlx::Error::RowNotFound => AppError::MemberNotFound("no matching row".to_string()),
            other => AppError::Database(other),
        }
    }
}

/// Translate a sqlx error raised by `operation`, logging it first.
///
/// Unique violations are reported against `member_id` rather than the raw
/// driver message.
pub fn translate(operation: &str, member_id: &str, err: sqlx::Error) -> AppError {
    tracing::error!(operation, member_id, error = %err, "db error");

    match AppError::from(err) {
        AppError::DuplicateKey(_) => AppError::DuplicateKey(member_id.to_string()),
        AppError::MemberNotFound(_) => AppError::MemberNotFound(member_id.to_string()),
        other => other,
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `MemberNotFound` → 404 Not Found
/// - `DuplicateKey` → 409 Conflict
/// - `TransferRejected` → 422 Unprocessable Entity
/// - `InvalidRequest` → 400 Bad Request
/// - `Database` → 500 Internal Server Error (hides details from client)
/// - `TransferFailed` → status and code of its cause
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = status_and_code(&self);

        let message = match self.root_cause() {
            AppError::Database(_) => "An internal error occurred".to_string(),
            _ => self.to_string(),
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

fn status_and_code(err: &AppError) -> (StatusCode, &'static str) {
    match err {
        AppError::MemberNotFound(_) => (StatusCode::NOT_FOUND, "member_not_found"),
        AppError::DuplicateKey(_) => (StatusCode::CONFLICT, "duplicate_key"),
        AppError::TransferRejected(_) => (StatusCode::UNPROCESSABLE_ENTITY, "transfer_rejected"),
        AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
        AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        AppError::TransferFailed(cause) => status_and_code(cause),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn row_not_found_translates_to_member_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::MemberNotFound(_)));
    }

    #[test]
    fn translate_reports_the_member_id() {
        let err = translate("findById", "memberA", sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::MemberNotFound(ref id) if id == "memberA"));
    }

    #[test]
    fn other_errors_stay_database_errors() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn transfer_failed_keeps_its_cause() {
        let err = AppError::transfer_failed(AppError::TransferRejected("ex".to_string()));

        assert!(matches!(err.root_cause(), AppError::TransferRejected(_)));
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("Transfer rejected: ex".to_string())
        );
    }

    #[test]
    fn transfer_failed_responds_with_cause_status() {
        let response =
            AppError::transfer_failed(AppError::MemberNotFound("memberB".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
