//! Top-level merge orchestration.
//!
//! The orchestrator ties the pipeline together: classify the uploads into
//! a single-category batch, dispatch to the matching merge strategy, and
//! return the merged artifact with statistics about the run. Requests are
//! processed one batch at a time; there is no cross-request state.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::batch::{Category, MergeBatch, MergedArtifact, UploadedFile};
use crate::config::{MergeConfig, PageSettings};
use crate::document::{self, DocumentMerger};
use crate::error::{MediaCatError, Result};
use crate::media::{AudioMerger, VideoMerger};
use crate::workspace::MergeWorkspace;

/// Statistics about a completed merge.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of files merged.
    pub files_merged: usize,

    /// Category the batch was classified as.
    pub category: Category,

    /// Size of the merged output in bytes.
    pub output_size: u64,

    /// Total time taken for the merge.
    pub merge_time: Duration,

    /// Page count of the output, for document merges.
    pub total_pages: Option<usize>,

    /// Duration of the output in seconds, for media merges.
    pub total_duration_secs: Option<f64>,
}

impl MergeStatistics {
    /// Format the output size as a human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// Result of a merge operation.
#[derive(Debug)]
pub struct MergeOutcome {
    /// The merged output, ready to hand to the caller.
    pub artifact: MergedArtifact,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// Classifies upload batches and runs the matching merge strategy.
#[derive(Debug, Clone)]
pub struct MergeOrchestrator {
    config: MergeConfig,
}

impl MergeOrchestrator {
    /// Create an orchestrator with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: MergeConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| MediaCatError::other(e.to_string()))?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge a batch of uploads into a single output.
    ///
    /// Files are merged in upload order. All intermediate state lives in a
    /// per-request temporary directory that is removed when this returns,
    /// on success and on failure alike.
    ///
    /// # Errors
    ///
    /// Classification errors ([`MediaCatError::EmptyBatch`],
    /// [`MediaCatError::UnsupportedFile`], [`MediaCatError::MixedBatch`])
    /// are returned before any merge work starts; merge failures name the
    /// offending file where one is known.
    pub async fn merge(&self, files: Vec<UploadedFile>) -> Result<MergeOutcome> {
        let merge_start = Instant::now();

        let batch = MergeBatch::classify(files)?;
        let category = batch.category();
        let files_merged = batch.len();
        info!(%category, files = files_merged, "Starting merge");

        // Scratch space for the whole request, removed on drop. Document
        // merges run in memory and leave it empty.
        let workspace = MergeWorkspace::new()?;

        let format = category.output_format();
        let mut total_pages = None;
        let mut total_duration_secs = None;

        let bytes = match category {
            Category::Document => {
                // lopdf parsing and JPEG re-encoding are CPU-bound; keep
                // them off the async workers.
                let page = self.config.page.clone();
                let files = batch.into_files();
                let (bytes, pages) =
                    tokio::task::spawn_blocking(move || merge_documents(&files, &page))
                        .await
                        .map_err(|e| MediaCatError::other(format!("Merge task failed: {e}")))??;
                total_pages = Some(pages);
                bytes
            }
            Category::Audio => {
                let merged = AudioMerger::new(self.config.audio.clone())
                    .merge(&workspace, batch.files())
                    .await?;
                total_duration_secs = merged.duration_secs;
                merged.bytes
            }
            Category::Video => {
                let merged = VideoMerger::new(self.config.video.clone())
                    .merge(&workspace, batch.files())
                    .await?;
                total_duration_secs = merged.duration_secs;
                merged.bytes
            }
        };

        let statistics = MergeStatistics {
            files_merged,
            category,
            output_size: bytes.len() as u64,
            merge_time: merge_start.elapsed(),
            total_pages,
            total_duration_secs,
        };

        info!(
            size = %statistics.format_output_size(),
            elapsed_ms = statistics.merge_time.as_millis() as u64,
            "Merge complete"
        );

        Ok(MergeOutcome {
            artifact: MergedArtifact { bytes, format },
            statistics,
        })
    }
}

/// Convert every document input to a PDF and concatenate them.
fn merge_documents(files: &[UploadedFile], page: &PageSettings) -> Result<(Vec<u8>, usize)> {
    let mut documents = Vec::with_capacity(files.len());
    for file in files {
        debug!(file = %file.name, "Converting document input");
        documents.push(document::document_for_file(file, page)?);
    }

    let merged = DocumentMerger::new().merge(documents)?;
    let pages = merged.get_pages().len();
    let bytes = document::document_to_bytes(merged)?;

    Ok((bytes, pages))
}

/// Format a byte count as a human-readable string.
fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::OutputFormat;

    fn orchestrator() -> MergeOrchestrator {
        MergeOrchestrator::new(MergeConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_merge_empty_batch_rejected() {
        let result = orchestrator().merge(vec![]).await;
        assert!(matches!(result.unwrap_err(), MediaCatError::EmptyBatch));
    }

    #[tokio::test]
    async fn test_merge_mixed_batch_rejected() {
        let files = vec![
            UploadedFile::new("a.pdf", vec![0u8; 4]),
            UploadedFile::new("b.mp3", vec![0u8; 4]),
        ];
        let result = orchestrator().merge(files).await;
        assert!(matches!(result.unwrap_err(), MediaCatError::MixedBatch { .. }));
    }

    #[tokio::test]
    async fn test_merge_text_documents() {
        let files = vec![
            UploadedFile::new("a.txt", b"first".to_vec()),
            UploadedFile::new("b.txt", b"second".to_vec()),
        ];

        let outcome = orchestrator().merge(files).await.unwrap();

        assert_eq!(outcome.artifact.format, OutputFormat::Pdf);
        assert_eq!(outcome.statistics.files_merged, 2);
        assert_eq!(outcome.statistics.category, Category::Document);
        assert_eq!(outcome.statistics.total_pages, Some(2));
        assert_eq!(outcome.statistics.output_size, outcome.artifact.bytes.len() as u64);
        assert!(outcome.artifact.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_merge_corrupt_pdf_names_file() {
        let files = vec![
            UploadedFile::new("good.txt", b"fine".to_vec()),
            UploadedFile::new("broken.pdf", b"not a pdf".to_vec()),
        ];

        let err = orchestrator().merge(files).await.unwrap_err();
        assert_eq!(err.offending_file(), Some("broken.pdf"));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = MergeConfig::default();
        config.video.crf = 99;
        assert!(MergeOrchestrator::new(config).is_err());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(500), "500 bytes");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1.00 GB");
    }
}
