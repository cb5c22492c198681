//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors returned to API clients
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Request failed validation
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Request exceeds a configured size limit
    #[error("payload too large: {}", .0.join("; "))]
    PayloadTooLarge(Vec<String>),

    /// Inference or model failure
    #[error("{0}")]
    Internal(String),

    #[error("Not found")]
    NotFound,
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(vec![msg.into()])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Label used for the error counter
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::Internal(_) => "internal",
            Self::NotFound => "not_found",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        crate::telemetry::record_error(self.kind());

        let body = match self {
            Self::Validation(errors) | Self::PayloadTooLarge(errors) => json!({ "error": errors }),
            Self::Internal(message) => json!({ "error": message }),
            Self::NotFound => json!({ "error": "Not found" }),
        };

        (status, Json(body)).into_response()
    }
}
