use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::scan::error::ScanError;
use crate::scan::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Scan(ScanError::UnusableResponse { stage, raw, .. }) => {
                tracing::error!("Unusable AI response during {stage}: {self}");
                let body = Json(json!({
                    "error": {
                        "code": "UNUSABLE_AI_RESPONSE",
                        "message": self.to_string(),
                        "stage": stage.as_str(),
                        "raw_response": raw
                    }
                }));
                return (StatusCode::BAD_GATEWAY, body).into_response();
            }
            AppError::Scan(e @ ScanError::OracleCall { .. }) => {
                tracing::error!("AI call failed: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "AI_UNAVAILABLE",
                    "The AI service could not be reached".to_string(),
                )
            }
            AppError::Scan(e @ ScanError::OracleTimeout { .. }) => {
                tracing::error!("AI call timed out: {e}");
                (StatusCode::GATEWAY_TIMEOUT, "AI_TIMEOUT", e.to_string())
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
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
