//! Audio merging.
//!
//! Every input is first normalized to one MP3 profile (sample rate,
//! channel count, bitrate from [`AudioSettings`]), then the parts are
//! joined losslessly with the concat demuxer.

use std::path::Path;

use tracing::{debug, warn};

use crate::batch::UploadedFile;
use crate::config::AudioSettings;
use crate::error::{MediaCatError, Result};
use crate::media::{MergedMedia, probe, tools};
use crate::workspace::MergeWorkspace;

/// Merges audio uploads into a single MP3.
#[derive(Debug)]
pub struct AudioMerger {
    settings: AudioSettings,
}

impl AudioMerger {
    /// Create a merger with the given encoding target.
    pub fn new(settings: AudioSettings) -> Self {
        Self { settings }
    }

    /// ffmpeg arguments for normalizing one input to the MP3 profile.
    ///
    /// `-vn` drops any embedded artwork stream, which would otherwise
    /// break the stream-copy concat.
    pub fn normalize_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let mut args = tools::base_args();
        args.extend([
            "-i".to_string(),
            input.display().to_string(),
            "-vn".to_string(),
            "-ar".to_string(),
            self.settings.sample_rate.to_string(),
            "-ac".to_string(),
            self.settings.channels.to_string(),
            "-c:a".to_string(),
            "libmp3lame".to_string(),
            "-b:a".to_string(),
            format!("{}k", self.settings.bitrate_kbps),
            output.display().to_string(),
        ]);
        args
    }

    /// Merge the uploads, in order, into one MP3.
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
            let part = workspace.scratch_path(&format!("part_{index:03}.mp3"));

            debug!(file = %file.name, "Normalizing audio input");
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

        let output = workspace.scratch_path("merged.mp3");
        tools::run_ffmpeg(&tools::concat_args(&list_path, &output, &[])).await?;

        let duration_secs = match probe::probe_file(&output).await {
            Ok(p) => probe::parse_duration(&p),
            Err(e) => {
                warn!("Failed to probe merged audio: {e}");
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
