//! Common error types and handling
//!
//! Every error that can cross an HTTP boundary maps to one of a fixed
//! set of API error codes. Domain crates build `Error` values directly
//! or convert into them via `?` from `RepositoryError`/`sqlx::Error`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the application
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid status transition: {0}")]
    InvalidStatusTransition(String),

    #[error("Assignee is not a project member: {0}")]
    AssigneeNotProjectMember(String),

    #[error("Duplicate resource: {0}")]
    DuplicateResource(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::state::StateError> for Error {
    fn from(err: crate::state::StateError) -> Self {
        Error::InvalidStatusTransition(err.to_string())
    }
}

impl Error {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::InvalidStatusTransition(_) => StatusCode::BAD_REQUEST,
            Error::AssigneeNotProjectMember(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::DuplicateResource(_) => StatusCode::CONFLICT,
            Error::Unexpected(_)
            | Error::Database(_)
            | Error::Serialization(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// API error code, part of the response contract
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unauthorized(_) => "UNAUTHORIZED",
            Error::Forbidden(_) => "FORBIDDEN",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::InvalidStatusTransition(_) => "INVALID_STATUS_TRANSITION",
            Error::AssigneeNotProjectMember(_) => "ASSIGNEE_NOT_PROJECT_MEMBER",
            Error::NotFound(_) => "NOT_FOUND",
            Error::DuplicateResource(_) => "DUPLICATE_RESOURCE",
            Error::Unexpected(_) | Error::Database(_) | Error::Serialization(_) | Error::Internal(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Optional structured details attached to the error response
    fn details(&self) -> Option<Value> {
        None
    }

    /// Build the error with attached field-level details (VALIDATION_ERROR)
    pub fn validation_with_details(message: impl Into<String>, details: Value) -> (Self, Value) {
        (Error::Validation(message.into()), details)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal server error");
        }

        // Outside of INTERNAL_ERROR, the message itself is safe to return to
        // the client; INTERNAL_ERROR never leaks internal detail.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "an internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let mut error_obj = json!({
            "code": code,
            "message": message,
        });
        if let Some(details) = self.details() {
            error_obj["details"] = details;
        }

        let body = Json(json!({
            "success": false,
            "error": error_obj,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            Error::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            Error::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::DuplicateResource("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::InvalidStatusTransition("x".into()).error_code(),
            "INVALID_STATUS_TRANSITION"
        );
        assert_eq!(
            Error::AssigneeNotProjectMember("x".into()).error_code(),
            "ASSIGNEE_NOT_PROJECT_MEMBER"
        );
        assert_eq!(
            Error::DuplicateResource("x".into()).error_code(),
            "DUPLICATE_RESOURCE"
        );
    }
}
