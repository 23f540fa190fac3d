//! Error types for mediacat.
//!
//! This module defines all error types that can occur while classifying a
//! batch and merging it. Errors are designed to be informative and
//! actionable; per-file failures always name the offending file so the user
//! knows which upload to fix.
//!
//! # Error Categories
//!
//! - **Batch Errors**: empty, mixed or unsupported upload batches
//! - **Input Errors**: corrupt PDFs, undecodable images, invalid text
//! - **Tool Errors**: missing or failing `ffmpeg`/`ffprobe`
//! - **I/O Errors**: temporary file and output handling

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::batch::Category;

/// Result type alias for mediacat operations.
pub type Result<T> = std::result::Result<T, MediaCatError>;

/// Main error type for mediacat operations.
#[derive(Debug)]
pub enum MediaCatError {
    /// No files were supplied in the upload batch.
    EmptyBatch,

    /// A file's extension maps to no supported category.
    UnsupportedFile {
        /// Name of the unsupported file.
        name: String,
    },

    /// The batch contains files from more than one category.
    MixedBatch {
        /// Category of the earlier files in the batch.
        first: Category,
        /// Conflicting category encountered later.
        second: Category,
    },

    /// Failed to parse an uploaded PDF.
    FailedToLoadPdf {
        /// Name of the PDF file.
        name: String,
        /// Reason for the failure.
        reason: String,
    },

    /// An uploaded image could not be decoded.
    InvalidImage {
        /// Name of the image file.
        name: String,
        /// Decoder error details.
        reason: String,
    },

    /// An uploaded text file is not valid UTF-8.
    InvalidText {
        /// Name of the text file.
        name: String,
    },

    /// A merge step failed on a specific input file.
    MergeExecution {
        /// Name of the offending file.
        name: String,
        /// Details about the failure.
        reason: String,
    },

    /// A required external tool is not installed.
    ToolNotFound {
        /// Name of the missing binary.
        tool: &'static str,
    },

    /// An external tool ran but exited with an error.
    ToolFailed {
        /// Name of the binary.
        tool: &'static str,
        /// Captured standard error output.
        stderr: String,
    },

    /// Failed to write an intermediate or output file.
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Generic I/O error.
    Io {
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Generic error with a custom message.
    Other {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for MediaCatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBatch => {
                write!(f, "No files were uploaded")
            }
            Self::UnsupportedFile { name } => {
                write!(f, "Unsupported file type: {name}")
            }
            Self::MixedBatch { first, second } => {
                write!(
                    f,
                    "Cannot merge {first} and {second} files in one batch; \
                     upload only one type of media at a time"
                )
            }
            Self::FailedToLoadPdf { name, reason } => {
                write!(f, "Failed to load PDF: {name}\n  Reason: {reason}")
            }
            Self::InvalidImage { name, reason } => {
                write!(f, "Failed to decode image: {name}\n  Reason: {reason}")
            }
            Self::InvalidText { name } => {
                write!(f, "Text file is not valid UTF-8: {name}")
            }
            Self::MergeExecution { name, reason } => {
                write!(f, "Merge failed on file: {name}\n  Reason: {reason}")
            }
            Self::ToolNotFound { tool } => {
                write!(
                    f,
                    "`{tool}` was not found on PATH\n  \
                     Hint: install FFmpeg, e.g. 'apt-get install ffmpeg'"
                )
            }
            Self::ToolFailed { tool, stderr } => {
                write!(f, "{tool} failed: {stderr}")
            }
            Self::FailedToWrite { path, source } => {
                write!(
                    f,
                    "Failed to write file: {}\n  Reason: {}",
                    path.display(),
                    source
                )
            }
            Self::Io { source } => {
                write!(f, "I/O error: {source}")
            }
            Self::Other { message } => {
                write!(f, "{message}")
            }
        }
    }
}

impl std::error::Error for MediaCatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FailedToWrite { source, .. } => Some(source),
            Self::Io { source } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for MediaCatError {
    fn from(err: io::Error) -> Self {
        Self::Io { source: err }
    }
}

impl From<lopdf::Error> for MediaCatError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl MediaCatError {
    /// Create an UnsupportedFile error.
    pub fn unsupported_file(name: impl Into<String>) -> Self {
        Self::UnsupportedFile { name: name.into() }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidImage error.
    pub fn invalid_image(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a MergeExecution error naming the offending file.
    pub fn merge_execution(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MergeExecution {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether the error was caused by the uploaded content rather than the
    /// host environment.
    ///
    /// User errors map to 4xx HTTP responses; everything else is a server
    /// problem.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyBatch
                | Self::UnsupportedFile { .. }
                | Self::MixedBatch { .. }
                | Self::FailedToLoadPdf { .. }
                | Self::InvalidImage { .. }
                | Self::InvalidText { .. }
                | Self::MergeExecution { .. }
        )
    }

    /// The input file this error concerns, if any.
    pub fn offending_file(&self) -> Option<&str> {
        match self {
            Self::UnsupportedFile { name }
            | Self::FailedToLoadPdf { name, .. }
            | Self::InvalidImage { name, .. }
            | Self::InvalidText { name }
            | Self::MergeExecution { name, .. } => Some(name),
            _ => None,
        }
    }
}
