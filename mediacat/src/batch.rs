//! Upload batch model and file-type classification.
//!
//! Every merge starts here: the raw uploads are classified by extension into
//! one of three categories (document, audio, video), and only a batch whose
//! files all share a single category can be turned into a [`MergeBatch`].
//! Invalid batches are rejected before any merge work begins.

use std::fmt;
use std::path::Path;

use crate::error::{MediaCatError, Result};

/// A single uploaded file: its client-supplied name and raw bytes.
///
/// Immutable once created; the merge consumes it and nothing is retained
/// after the response is produced.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name as supplied by the client (used for classification).
    pub name: String,

    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Create an uploaded file from a name and content.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// The detected kind of this file, derived from its extension.
    pub fn kind(&self) -> FileKind {
        FileKind::from_name(&self.name)
    }
}

/// Specific kind of an uploaded file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Raster image (png, jpg, gif, bmp, webp, tiff).
    Image,
    /// An existing PDF document.
    Pdf,
    /// Plain text (txt, md, log).
    Text,
    /// Audio stream (mp3, wav, ogg, flac, ...).
    Audio,
    /// Video stream (mp4, mkv, webm, mov, ...).
    Video,
    /// Extension not recognized; the batch will be rejected.
    Unknown,
}

impl FileKind {
    /// Classify a file name by its extension (case-insensitive).
    ///
    /// Files without an extension are [`FileKind::Unknown`].
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "tif" | "tiff" => Self::Image,
            "pdf" => Self::Pdf,
            "txt" | "text" | "md" | "log" => Self::Text,
            "mp3" | "wav" | "ogg" | "oga" | "flac" | "m4a" | "aac" | "wma" | "opus" => Self::Audio,
            "mp4" | "m4v" | "mov" | "mkv" | "webm" | "avi" | "wmv" | "mpg" | "mpeg" | "ts" => {
                Self::Video
            }
            _ => Self::Unknown,
        }
    }

    /// The merge category this kind belongs to, if any.
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::Image | Self::Pdf | Self::Text => Some(Category::Document),
            Self::Audio => Some(Category::Audio),
            Self::Video => Some(Category::Video),
            Self::Unknown => None,
        }
    }
}

/// Merge category of a batch; selects the merge strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Images, PDFs and text, combined into one PDF.
    Document,
    /// Audio files, concatenated into one MP3.
    Audio,
    /// Video files, concatenated into one MP4.
    Video,
}

impl Category {
    /// The output format produced by this category's merge strategy.
    pub fn output_format(&self) -> OutputFormat {
        match self {
            Self::Document => OutputFormat::Pdf,
            Self::Audio => OutputFormat::Mp3,
            Self::Video => OutputFormat::Mp4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// Container format of the merged output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `application/pdf`
    Pdf,
    /// `audio/mpeg`
    Mp3,
    /// `video/mp4`
    Mp4,
}

impl OutputFormat {
    /// MIME content type for HTTP responses.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Mp3 => "audio/mpeg",
            Self::Mp4 => "video/mp4",
        }
    }

    /// Suggested download file name.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Pdf => "merged.pdf",
            Self::Mp3 => "merged.mp3",
            Self::Mp4 => "merged.mp4",
        }
    }
}

/// An ordered batch of uploads that all share one category.
///
/// Can only be constructed through [`MergeBatch::classify`], so a value of
/// this type is always non-empty and homogeneous.
#[derive(Debug)]
pub struct MergeBatch {
    files: Vec<UploadedFile>,
    category: Category,
}

impl MergeBatch {
    /// Classify a sequence of uploads into a valid batch.
    ///
    /// Upload order is preserved.
    ///
    /// # Errors
    ///
    /// - [`MediaCatError::EmptyBatch`] if no files were supplied
    /// - [`MediaCatError::UnsupportedFile`] if any file has an unrecognized
    ///   extension
    /// - [`MediaCatError::MixedBatch`] if the files span more than one
    ///   category
    pub fn classify(files: Vec<UploadedFile>) -> Result<Self> {
        if files.is_empty() {
            return Err(MediaCatError::EmptyBatch);
        }

        let mut category: Option<Category> = None;
        for file in &files {
            let file_category = file
                .kind()
                .category()
                .ok_or_else(|| MediaCatError::unsupported_file(&file.name))?;

            match category {
                None => category = Some(file_category),
                Some(existing) if existing != file_category => {
                    return Err(MediaCatError::MixedBatch {
                        first: existing,
                        second: file_category,
                    });
                }
                Some(_) => {}
            }
        }

        // files is non-empty, so category is set by now.
        let category = category.ok_or(MediaCatError::EmptyBatch)?;

        Ok(Self { files, category })
    }

    /// The category shared by every file in the batch.
    pub fn category(&self) -> Category {
        self.category
    }

    /// The files in upload order.
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    /// Number of files in the batch.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Always false; a classified batch cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Consume the batch, yielding the files in upload order.
    pub fn into_files(self) -> Vec<UploadedFile> {
        self.files
    }
}

/// The single merged output returned to the caller.
///
/// Ownership transfers to the caller for download; nothing is retained.
#[derive(Debug)]
pub struct MergedArtifact {
    /// Encoded output content.
    pub bytes: Vec<u8>,

    /// Output container format (determines content type and file name).
    pub format: OutputFormat,
}
