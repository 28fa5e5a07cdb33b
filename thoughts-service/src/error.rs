use crate::dtos::ApiResponse;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use service_core::error::AppError;
use thiserror::Error;
use validator::ValidationErrors;

/// Failures surfaced to API clients, each with a fixed status code.
///
/// | variant        | status |
/// |----------------|--------|
/// | `Validation`   | 400    |
/// | `InvalidBody`  | 400    |
/// | `NotFound`     | 404    |
/// | `Store`        | 400    |
///
/// Store failures (including ids that are not valid ObjectIds) are reported as
/// 400 rather than 5xx; the body carries the failure kind and message only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::InvalidBody(_) | ApiError::Store(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn payload(&self) -> Value {
        match self {
            ApiError::Validation(errors) => json!({
                "name": "ValidationError",
                "message": self.to_string(),
                "errors": errors,
            }),
            ApiError::InvalidBody(detail) => json!({
                "name": "InvalidBody",
                "message": detail,
            }),
            ApiError::NotFound => Value::String("Not found".to_string()),
            ApiError::Store(err) => json!({
                "name": err.kind(),
                "message": err.to_string(),
            }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(err) => tracing::error!(error = %err, "Store operation failed"),
            ApiError::NotFound => tracing::debug!("Thought not found"),
            other => tracing::info!(error = %other, "Rejected request"),
        }

        (self.status(), Json(ApiResponse::failed(self.payload()))).into_response()
    }
}
