//! ffprobe wrapper for inspecting merge outputs.

use std::path::Path;

use serde::Deserialize;

use crate::error::{MediaCatError, Result};

/// Top-level ffprobe JSON output (`-print_format json -show_format -show_streams`).
#[derive(Debug, Deserialize)]
pub struct FfprobeOutput {
    /// All streams in the container.
    pub streams: Vec<FfprobeStream>,
    /// Container-level metadata.
    pub format: FfprobeFormat,
}

/// A single stream from ffprobe output.
#[derive(Debug, Deserialize)]
pub struct FfprobeStream {
    /// Codec short name, e.g. "mp3" or "h264".
    pub codec_name: Option<String>,
    /// "audio" or "video".
    pub codec_type: Option<String>,
    /// Stream duration in seconds, as a decimal string.
    pub duration: Option<String>,
}

/// Format-level metadata from ffprobe.
#[derive(Debug, Deserialize)]
pub struct FfprobeFormat {
    /// Container duration in seconds, as a decimal string.
    pub duration: Option<String>,
    /// Container format name.
    pub format_name: Option<String>,
}

/// Run `ffprobe` on a file and return the parsed JSON output.
///
/// # Errors
///
/// Returns [`MediaCatError::ToolNotFound`] if ffprobe is missing,
/// [`MediaCatError::ToolFailed`] on a non-zero exit, and
/// [`MediaCatError::Other`] if the JSON cannot be parsed.
pub async fn probe_file(path: &Path) -> Result<FfprobeOutput> {
    let output = tokio::process::Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MediaCatError::ToolNotFound { tool: "ffprobe" }
            } else {
                MediaCatError::Io { source: e }
            }
        })?;

    if !output.status.success() {
        return Err(MediaCatError::ToolFailed {
            tool: "ffprobe",
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str::<FfprobeOutput>(&stdout)
        .map_err(|e| MediaCatError::other(format!("Failed to parse ffprobe output: {e}")))
}

/// Probe an input before encoding so undecodable uploads fail fast with
/// an error naming the file.
pub async fn reject_unreadable(path: &Path, name: &str) -> Result<()> {
    match probe_file(path).await {
        Ok(_) => Ok(()),
        Err(MediaCatError::ToolFailed { stderr, .. }) => {
            Err(MediaCatError::merge_execution(name, stderr))
        }
        Err(other) => Err(other),
    }
}

/// Parse the duration in seconds from ffprobe output.
///
/// Prefers the format-level duration and falls back to the first stream
/// that reports one.
pub fn parse_duration(probe: &FfprobeOutput) -> Option<f64> {
    if let Some(d) = &probe.format.duration {
        if let Ok(secs) = d.parse::<f64>() {
            return Some(secs);
        }
    }

    probe
        .streams
        .iter()
        .filter_map(|s| s.duration.as_deref())
        .find_map(|d| d.parse::<f64>().ok())
}
