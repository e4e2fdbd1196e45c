//! API error handling.
//!
//! Each variant renders the body shape the public site's script expects:
//! program mutations answer with `{success: false, ...}`, everything else with
//! `{error, ...}`.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use yiyf_core::error::YiyfError;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed update payload (400)
    Validation(String),
    /// Request body over the size limit (413)
    PayloadTooLarge,
    /// Forced refresh failed (500)
    Refresh(String),
    /// Fixture could not be persisted (500)
    Update(String),
    /// No route or static file (404)
    NotFound {
        /// Requested path
        path: String,
    },
    /// Origin rejected by the CORS policy (403)
    Forbidden(String),
    /// Anything else (500)
    Internal {
        /// Error detail
        detail: String,
        /// Whether the detail may be shown to the client
        expose: bool,
    },
}

impl ApiError {
    /// Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Not found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Internal server error. `expose` is false in production.
    pub fn internal(detail: impl Into<String>, expose: bool) -> Self {
        Self::Internal {
            detail: detail.into(),
            expose,
        }
    }

    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Refresh(_) | Self::Update(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(message) => json!({
                "success": false,
                "message": message,
            }),
            Self::PayloadTooLarge => json!({
                "success": false,
                "message": "요청 데이터가 너무 큽니다.",
            }),
            Self::Refresh(detail) => json!({
                "success": false,
                "message": "프로그램 데이터 새로고침에 실패했습니다.",
                "error": detail,
            }),
            Self::Update(detail) => json!({
                "success": false,
                "message": "프로그램 데이터 업데이트에 실패했습니다.",
                "error": detail,
            }),
            Self::NotFound { path } => json!({
                "error": "요청한 경로를 찾을 수 없습니다.",
                "path": path,
            }),
            Self::Forbidden(message) => json!({
                "error": "Forbidden",
                "message": message,
            }),
            Self::Internal { detail, expose } => {
                error!(error = %detail, "Unhandled error");
                let message = if expose {
                    detail
                } else {
                    "잠시 후 다시 시도해 주세요.".to_string()
                };
                json!({
                    "error": "서버 내부 오류가 발생했습니다.",
                    "message": message,
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Turns a handler panic into a 500. Used with `CatchPanicLayer::custom`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>, expose: bool) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::internal(detail, expose).into_response()
}

impl From<YiyfError> for ApiError {
    fn from(err: YiyfError) -> Self {
        match &err {
            YiyfError::ValidationError(message) => {
                warn!(error = %message, "Rejected program data");
                ApiError::validation(format!("프로그램 데이터가 올바르지 않습니다: {}", message))
            }
            _ => ApiError::internal(err.to_string(), false),
        }
    }
}
