//! mediacat - Merge uploaded files of one kind into a single output.
//!
//! This library classifies a batch of uploaded files by extension and
//! merges them into one artifact:
//!
//! - Images, PDFs and text files become a single PDF
//! - Audio files become a single MP3
//! - Video files become a single MP4
//!
//! Document merging happens in-process with `lopdf` and the `image` crate;
//! audio and video merging shell out to `ffmpeg`, normalizing every input
//! to a common profile before joining the parts with the concat demuxer.
//! Batches that mix categories are rejected up front.
//!
//! # Examples
//!
//! ```no_run
//! use mediacat::{MergeConfig, MergeOrchestrator, UploadedFile};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = MergeOrchestrator::new(MergeConfig::default())?;
//!
//! let files = vec![
//!     UploadedFile::new("cover.png", std::fs::read("cover.png")?),
//!     UploadedFile::new("report.pdf", std::fs::read("report.pdf")?),
//! ];
//!
//! let outcome = orchestrator.merge(files).await?;
//! println!(
//!     "Merged {} files into {} ({} pages)",
//!     outcome.statistics.files_merged,
//!     outcome.artifact.format.file_name(),
//!     outcome.statistics.total_pages.unwrap_or(0),
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod media;
pub mod orchestrator;
pub mod workspace;

// Re-export commonly used types
pub use batch::{Category, FileKind, MergeBatch, MergedArtifact, OutputFormat, UploadedFile};
pub use config::MergeConfig;
pub use error::{MediaCatError, Result};
pub use orchestrator::{MergeOrchestrator, MergeOutcome, MergeStatistics};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
