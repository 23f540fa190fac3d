//! Running ffmpeg and building concat demuxer inputs.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MediaCatError, Result};

/// Run ffmpeg with the given arguments, discarding stdout.
///
/// # Errors
///
/// Returns [`MediaCatError::ToolNotFound`] if the binary is missing from
/// `PATH` and [`MediaCatError::ToolFailed`] with captured stderr on a
/// non-zero exit.
pub async fn run_ffmpeg(args: &[String]) -> Result<()> {
    debug!(?args, "Running ffmpeg");

    let output = tokio::process::Command::new("ffmpeg")
        .args(args)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MediaCatError::ToolNotFound { tool: "ffmpeg" }
            } else {
                MediaCatError::Io { source: e }
            }
        })?;

    if !output.status.success() {
        return Err(MediaCatError::ToolFailed {
            tool: "ffmpeg",
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Check that ffmpeg is runnable.
pub async fn ffmpeg_available() -> bool {
    run_ffmpeg(&["-version".to_string()]).await.is_ok()
}

/// The global flags every ffmpeg invocation starts with.
pub fn base_args() -> Vec<String> {
    ["-y", "-hide_banner", "-loglevel", "error"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Arguments for joining pre-normalized parts with the concat demuxer.
///
/// The parts share one encoding profile, so the streams are copied rather
/// than re-encoded. `extra` carries per-container flags such as
/// `-movflags +faststart`.
pub fn concat_args(list_path: &Path, output: &Path, extra: &[&str]) -> Vec<String> {
    let mut args = base_args();
    args.extend([
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        list_path.display().to_string(),
        "-c".to_string(),
        "copy".to_string(),
    ]);
    args.extend(extra.iter().map(|s| s.to_string()));
    args.push(output.display().to_string());
    args
}

/// Render the concat demuxer list for the given parts, in order.
pub fn concat_list(parts: &[PathBuf]) -> String {
    let mut list = String::new();
    for part in parts {
        list.push_str("file '");
        list.push_str(&escape_concat_path(&part.display().to_string()));
        list.push_str("'\n");
    }
    list
}

/// Escape a path for a single-quoted concat demuxer entry.
fn escape_concat_path(path: &str) -> String {
    path.replace('\'', r"'\''")
}
