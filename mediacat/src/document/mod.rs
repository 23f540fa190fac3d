//! Document merging: images, PDFs and text into one PDF.
//!
//! Each uploaded file is first turned into an in-memory [`lopdf::Document`]
//! (existing PDFs are parsed, images become one-page documents, text is
//! rendered into Helvetica pages), then the per-file documents are
//! concatenated in upload order by [`DocumentMerger`].

pub mod image;
pub mod merger;
pub mod text;

pub use merger::DocumentMerger;

use lopdf::Document;

use crate::batch::{FileKind, UploadedFile};
use crate::config::PageSettings;
use crate::error::{MediaCatError, Result};

/// Convert one uploaded file into a standalone PDF document.
///
/// # Errors
///
/// Fails if the file's bytes cannot be parsed as the kind its extension
/// claims; the error names the file.
pub fn document_for_file(file: &UploadedFile, page: &PageSettings) -> Result<Document> {
    match file.kind() {
        FileKind::Pdf => load_pdf(&file.name, &file.bytes),
        FileKind::Image => image::image_to_document(&file.name, &file.bytes),
        FileKind::Text => text::text_to_document(&file.name, &file.bytes, page),
        other => Err(MediaCatError::other(format!(
            "{} is not a document input (kind {other:?})",
            file.name
        ))),
    }
}

/// Parse an uploaded PDF from memory.
///
/// # Errors
///
/// Returns [`MediaCatError::FailedToLoadPdf`] if parsing fails or the
/// document has no pages.
pub fn load_pdf(name: &str, bytes: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| MediaCatError::failed_to_load_pdf(name, e.to_string()))?;

    if doc.get_pages().is_empty() {
        return Err(MediaCatError::failed_to_load_pdf(name, "PDF has no pages"));
    }

    Ok(doc)
}

/// Serialize a finished document to bytes.
pub fn document_to_bytes(mut doc: Document) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| MediaCatError::other(format!("Failed to serialize merged PDF: {e}")))?;
    Ok(buffer)
}
