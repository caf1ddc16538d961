//! Error types for utopia.
//!
//! Every failure reaches the client as HTTP 200; the outcome is carried in the
//! body. Existing clients depend on that, so the transport status is never
//! used to signal an error.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Body-level code for a successful reply.
pub const SUCCESS_CODE: i32 = 0;

/// Body-level code for a failed reply.
pub const ERROR_CODE: i32 = 1;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("invalid user identity")]
    Unauthorized,

    #[error("invalid parameters: {0}")]
    Validation(String),

    #[error("invalid action type")]
    InvalidActionType,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("request was not sent by the storage provider")]
    Signature,

    #[error("too many requests")]
    RateLimited,

    // === Server Errors ===
    /// Store errors keep the driver's message as-is.
    #[error("{0}")]
    Database(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code used in logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidActionType => "INVALID_ACTION_TYPE",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Signature => "SIGNATURE_MISMATCH",
            Self::RateLimited => "RATE_LIMITED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Config(_) | Self::Internal(_)
        )
    }

    /// Log the error at the level its category deserves.
    pub fn log(&self) {
        let code = self.error_code();
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let body = Json(json!({
            "code": ERROR_CODE,
            "msg": self.to_string(),
        }));

        (StatusCode::OK, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!(error = %err, "Rejected bearer token");
        Self::Unauthorized
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_message_is_verbatim() {
        let err = AppError::Database("duplicate key value".to_string());
        assert_eq!(err.to_string(), "duplicate key value");
        assert!(err.is_server_error());
    }

    #[test]
    fn test_client_errors_are_not_server_errors() {
        assert!(!AppError::Unauthorized.is_server_error());
        assert!(!AppError::InvalidActionType.is_server_error());
        assert!(!AppError::NotFound("video".to_string()).is_server_error());
    }

    #[test]
    fn test_error_response_is_http_200() {
        let response = AppError::InvalidActionType.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
