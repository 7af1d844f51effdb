//! Failures returned by controller handlers.

use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use reqmeter_core::ErrorKind;

/// Handler result type.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorKind for ApiError {
    fn kind(&self) -> Cow<'static, str> {
        Cow::Borrowed(match self {
            ApiError::Validation(_) => "ValidationError",
            ApiError::NotFound(_) => "NotFoundError",
            ApiError::Internal(_) => "InternalError",
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.kind(),
            "msg": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
