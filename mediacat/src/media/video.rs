//! Video merging.
//!
//! Inputs arrive with arbitrary resolutions, frame rates and codecs, so
//! each one is re-encoded to a common H.264/AAC MP4 profile before the
//! parts are joined with the concat demuxer.

use std::path::Path;

use tracing::{debug, warn};

use crate::batch::UploadedFile;
use crate::config::VideoSettings;
use crate::error::{MediaCatError, Result};
use crate::media::{MergedMedia, probe, tools};
use crate::workspace::MergeWorkspace;

/// Merges video uploads into a single MP4.
#[derive(Debug)]
pub struct VideoMerger {
    settings: VideoSettings,
}

impl VideoMerger {
    /// Create a merger with the given encoding target.
    pub fn new(settings: VideoSettings) -> Self {
        Self { settings }
    }

    /// The filter chain applied to every input.
    ///
    /// Width is capped at the configured maximum but never upscaled; `-2`
    /// keeps the height even as libx264 requires. Frame rate and pixel
    /// format are forced so the parts concat cleanly.
    pub fn filter_chain(&self) -> String {
        format!(
            "scale='min({},iw)':-2,fps={},format=yuv420p",
            self.settings.max_width, self.settings.fps
        )
    }

    /// ffmpeg arguments for normalizing one input to the MP4 profile.
    pub fn normalize_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let mut args = tools::base_args();
        args.extend([
            "-i".to_string(),
            input.display().to_string(),
            "-vf".to_string(),
            self.filter_chain(),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-preset".to_string(),
            self.settings.preset.clone(),
            "-crf".to_string(),
            self.settings.crf.to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            format!("{}k", self.settings.audio_bitrate_kbps),
            "-movflags".to_string(),
            "+faststart".to_string(),
            output.display().to_string(),
        ]);
        args
    }

    /// Merge the uploads, in order, into one MP4.
    ///
    /// # Errors
    ///
    /// A file that ffmpeg cannot decode fails the whole merge with
    /// [`MediaCatError::MergeExecution`] naming that file.
    pub async fn merge(
        &self,
        workspace: &MergeWorkspace,
        files: &[UploadedFile],
    ) -> Result<MergedMedia> {
        let mut parts = Vec::with_capacity(files.len());

        for (index, file) in files.iter().enumerate() {
            let src = workspace.persist_input(index, file).await?;
            probe::reject_unreadable(&src, &file.name).await?;
            let part = workspace.scratch_path(&format!("part_{index:03}.mp4"));

            debug!(file = %file.name, "Normalizing video input");
            tools::run_ffmpeg(&self.normalize_args(&src, &part))
                .await
                .map_err(|e| match e {
                    MediaCatError::ToolFailed { stderr, .. } => {
                        MediaCatError::merge_execution(&file.name, stderr)
                    }
                    other => other,
                })?;

            parts.push(part);
        }

        let list_path = workspace.scratch_path("concat.txt");
        tokio::fs::write(&list_path, tools::concat_list(&parts))
            .await
            .map_err(|e| MediaCatError::FailedToWrite {
                path: list_path.clone(),
                source: e,
            })?;

        // Parts share one profile, so the final join is a stream copy.
        let output = workspace.scratch_path("merged.mp4");
        let concat = tools::concat_args(&list_path, &output, &["-movflags", "+faststart"]);
        tools::run_ffmpeg(&concat).await?;

        let duration_secs = match probe::probe_file(&output).await {
            Ok(p) => probe::parse_duration(&p),
            Err(e) => {
                warn!("Failed to probe merged video: {e}");
                None
            }
        };

        let bytes = tokio::fs::read(&output).await?;
        Ok(MergedMedia {
            bytes,
            duration_secs,
        })
    }
}
