//! Request handlers.

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use mediacat::UploadedFile;
use serde::Serialize;
use tracing::info;

use crate::error::AppResult;
use crate::state::AppState;

/// Minimal upload form served at the root.
const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><title>mediacat</title></head>
<body>
  <h1>mediacat</h1>
  <p>Upload files of one kind. Images, PDFs and text merge into a PDF;
     audio files into an MP3; video files into an MP4.</p>
  <form action="/merge" method="post" enctype="multipart/form-data">
    <input type="file" name="files" multiple required>
    <button type="submit">Merge</button>
  </form>
</body>
</html>
"#;

/// GET / -- the upload form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether ffmpeg is runnable, which media merges require.
    pub ffmpeg_available: bool,
}

/// GET /health -- service health, including ffmpeg availability.
pub async fn health() -> Json<HealthResponse> {
    let ffmpeg_available = mediacat::media::tools::ffmpeg_available().await;
    let status = if ffmpeg_available { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        ffmpeg_available,
    })
}

/// POST /merge -- merge an uploaded batch and return the result.
///
/// Every multipart part carrying a file name is treated as an upload;
/// part order becomes merge order. The response body is the merged file
/// with matching `Content-Type` and an attachment disposition.
pub async fn merge(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }

        let bytes = field.bytes().await?;
        files.push(UploadedFile::new(name, bytes.to_vec()));
    }

    info!(files = files.len(), "Received merge request");
    let outcome = state.orchestrator.merge(files).await?;

    let format = outcome.artifact.format;
    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.file_name()),
        ),
    ];

    Ok((headers, outcome.artifact.bytes).into_response())
}
