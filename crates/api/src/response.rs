//! API response types.
//!
//! Replies are always HTTP 200. Two body shapes exist: the envelope
//! `{code, msg, data?}` used everywhere, and the bare legacy shape kept by
//! the v1 interaction endpoints for older clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use utopia_common::{AppError, SUCCESS_CODE};

/// Message of a successful envelope.
const OK_MSG: &str = "ok";

/// Standard API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response carrying data.
    pub fn ok(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: OK_MSG.to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response without data.
    #[must_use]
    pub fn success() -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: OK_MSG.to_string(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Legacy success reply: `{"code":0,"message":"success"}`.
#[derive(Debug, Clone, Copy)]
pub struct LegacyOk;

impl IntoResponse for LegacyOk {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "code": SUCCESS_CODE,
            "message": "success",
        }));
        (StatusCode::OK, body).into_response()
    }
}

/// Legacy failure reply: `{"message": "<error>"}`.
#[derive(Debug)]
pub struct LegacyError(pub AppError);

impl From<AppError> for LegacyError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for LegacyError {
    fn into_response(self) -> Response {
        self.0.log();
        let body = Json(json!({ "message": self.0.to_string() }));
        (StatusCode::OK, body).into_response()
    }
}

/// Result type of the legacy endpoints.
pub type LegacyResult = Result<LegacyOk, LegacyError>;
