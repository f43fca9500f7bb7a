use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error payload shared by every JSON endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(title = "Error")]
pub struct ErrorBody {
    /// Human-readable explanation.
    pub message: String,
    /// Machine-readable error code, e.g. `USER_NOT_FOUND`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Axum response wrapper that renders an `ErrorBody` with the given status.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, body: ErrorBody) -> Self {
        Self { status, body }
    }

    pub fn coded(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self::new(status, ErrorBody::new(message).with_code(code))
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, axum::Json(self.body)).into_response()
    }
}

pub fn bad_request(code: &str, message: impl Into<String>) -> ErrorResponse {
    ErrorResponse::coded(StatusCode::BAD_REQUEST, code, message)
}

pub fn not_found(code: &str, message: impl Into<String>) -> ErrorResponse {
    ErrorResponse::coded(StatusCode::NOT_FOUND, code, message)
}

pub fn internal_error(message: impl Into<String>) -> ErrorResponse {
    ErrorResponse::coded(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
}
