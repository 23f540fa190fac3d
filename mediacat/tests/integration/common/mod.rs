//! Shared helpers for integration tests.
//!
//! Fixtures are generated in-memory so the tests carry no binary files.

use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use mediacat::config::PageSettings;
use mediacat::document::{document_to_bytes, text};
use mediacat::{MergeConfig, MergeOrchestrator, UploadedFile};

/// An orchestrator with the default configuration.
pub fn orchestrator() -> MergeOrchestrator {
    MergeOrchestrator::new(MergeConfig::default()).unwrap()
}

/// A text upload.
pub fn text_upload(name: &str, body: &str) -> UploadedFile {
    UploadedFile::new(name, body.as_bytes().to_vec())
}

/// A valid single-page PDF upload, rendered from the given text.
pub fn pdf_upload(name: &str, body: &str) -> UploadedFile {
    let doc = text::text_to_document(name, body.as_bytes(), &PageSettings::default()).unwrap();
    UploadedFile::new(name, document_to_bytes(doc).unwrap())
}

/// A small PNG upload.
pub fn png_upload(name: &str, width: u32, height: u32) -> UploadedFile {
    let img = RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png).unwrap();
    UploadedFile::new(name, bytes.into_inner())
}
