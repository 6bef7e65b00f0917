//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use trim_pipeline::PipelineError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Upload exceeds the size limit")]
    PayloadTooLarge,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unsupported_media_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedMediaType(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Pipeline(PipelineError::Acquisition(_)) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(e) if e.is_input_error() => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::UnsupportedMediaType(_) => "unsupported_media_type",
            ApiError::PayloadTooLarge => "payload_too_large",
            ApiError::NotFound(_) => "not_found",
            ApiError::Internal(_) => "internal",
            ApiError::Pipeline(e) => e.code(),
        }
    }

    /// Message including the tail of any FFmpeg output.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Pipeline(e) => e.detail(),
            other => other.to_string(),
        }
    }

    /// Message without tool output or server paths.
    pub fn public_detail(&self) -> String {
        match self {
            ApiError::Internal(_) => "An internal error occurred".to_string(),
            ApiError::Pipeline(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ErrorResponse {
    detail: String,
    code: &'static str,
}

/// Public form of an error body, carried in the response extensions.
#[derive(Debug, Clone)]
pub(crate) struct PublicError(pub ErrorResponse);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(code = self.code(), "Request failed: {}", self);
        }

        let body = ErrorResponse {
            detail: self.detail(),
            code: self.code(),
        };
        let public = PublicError(ErrorResponse {
            detail: self.public_detail(),
            code: self.code(),
        });

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(public);
        response
    }
}
