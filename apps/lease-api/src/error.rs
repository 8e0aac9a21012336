//! Error types for the lease API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Terminal errors surfaced to the client with an HTTP status.
///
/// Recoverable extraction problems never take this path; the orchestrator
/// converts those into soft-failure payloads (`success: false` with a 200).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unsupported file format. Please upload PDF or image files.")]
    UnsupportedFormat,

    #[error("No pages found in the document")]
    EmptyDocument,

    #[error("Analysis not found: {0}")]
    AnalysisNotFound(String),

    #[error("Access denied. This analysis belongs to another user or your access has expired.")]
    AccessDenied,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::UnsupportedFormat | ApiError::EmptyDocument => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::AnalysisNotFound(_) => (
                StatusCode::NOT_FOUND,
                "Analysis not found. Please analyze a lease first.".to_string(),
            ),
            ApiError::AccessDenied => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
