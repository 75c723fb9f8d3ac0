use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Prefix of every user-facing message for failures after validation.
pub const GENERATION_FAILED_PREFIX: &str = "Failed to generate interview questions.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{"success": false, "error": "<message>"}`.
/// Only `Validation` and `PayloadTooLarge` messages reach the caller verbatim;
/// the rest are logged and replaced by a generic message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Generation service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The message the caller is allowed to see.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::ServiceUnavailable(_) => format!(
                "{GENERATION_FAILED_PREFIX} The question service is unavailable, please try again later."
            ),
            AppError::GenerationFailed(_) => format!(
                "{GENERATION_FAILED_PREFIX} The AI did not return a usable set of questions."
            ),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(msg) | AppError::PayloadTooLarge(msg) => {
                tracing::debug!("Rejected request: {msg}")
            }
            AppError::ServiceUnavailable(msg) => tracing::error!("Generation service error: {msg}"),
            AppError::GenerationFailed(msg) => tracing::error!("Generation failed: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
        }

        let body = Json(json!({
            "success": false,
            "error": self.public_message(),
        }));

        (self.status_code(), body).into_response()
    }
}
