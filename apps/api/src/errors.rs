use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Encode error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("External encoder error: {0}")]
    ExternalEncoder(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Font(msg) => {
                tracing::error!("Font error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "FONT_ERROR",
                    "A font configuration error occurred".to_string(),
                )
            }
            AppError::Encode(e) => {
                tracing::error!("Encode error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ENCODE_ERROR",
                    "An image encoding error occurred".to_string(),
                )
            }
            AppError::ExternalEncoder(msg) => {
                tracing::error!("External encoder error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXTERNAL_ENCODER_ERROR",
                    "An external encoder error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
