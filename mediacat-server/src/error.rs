//! HTTP error mapping.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mediacat::MediaCatError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`MediaCatError`] for merge failures and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A merge or classification error from the mediacat library.
    #[error(transparent)]
    Merge(#[from] MediaCatError),

    /// The multipart body could not be read.
    #[error("Invalid multipart request: {0}")]
    Multipart(#[from] MultipartError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Merge(err) => classify_merge_error(err),
            AppError::Multipart(err) => (
                StatusCode::BAD_REQUEST,
                "BAD_MULTIPART",
                format!("Invalid multipart request: {err}"),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a merge error to an HTTP status, error code, and message.
///
/// Batch validation failures are plain 400s; content the server could not
/// process maps to 422; a missing ffmpeg is 503 since it is a host
/// problem the client can retry after.
fn classify_merge_error(err: &MediaCatError) -> (StatusCode, &'static str, String) {
    match err {
        MediaCatError::EmptyBatch => (StatusCode::BAD_REQUEST, "EMPTY_BATCH", err.to_string()),
        MediaCatError::UnsupportedFile { .. } => {
            (StatusCode::BAD_REQUEST, "UNSUPPORTED_FILE", err.to_string())
        }
        MediaCatError::MixedBatch { .. } => {
            (StatusCode::BAD_REQUEST, "MIXED_BATCH", err.to_string())
        }
        MediaCatError::FailedToLoadPdf { .. }
        | MediaCatError::InvalidImage { .. }
        | MediaCatError::InvalidText { .. }
        | MediaCatError::MergeExecution { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "MERGE_FAILED",
            err.to_string(),
        ),
        MediaCatError::ToolNotFound { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "TOOL_UNAVAILABLE",
            err.to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Internal merge error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
