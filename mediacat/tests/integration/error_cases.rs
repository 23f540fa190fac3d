//! Integration tests for error handling and edge cases.

use mediacat::{MediaCatError, UploadedFile};

use crate::common::{orchestrator, text_upload};

#[tokio::test]
async fn test_error_empty_batch() {
    let result = orchestrator().merge(vec![]).await;
    assert!(matches!(result.unwrap_err(), MediaCatError::EmptyBatch));
}

#[tokio::test]
async fn test_error_unsupported_extension() {
    let files = vec![
        text_upload("fine.txt", "ok"),
        UploadedFile::new("payload.exe", vec![0u8; 16]),
    ];

    let err = orchestrator().merge(files).await.unwrap_err();
    assert!(matches!(err, MediaCatError::UnsupportedFile { .. }));
    assert_eq!(err.offending_file(), Some("payload.exe"));
}

#[tokio::test]
async fn test_error_no_extension() {
    let files = vec![UploadedFile::new("README", b"no extension".to_vec())];

    let err = orchestrator().merge(files).await.unwrap_err();
    assert!(matches!(err, MediaCatError::UnsupportedFile { .. }));
}

#[tokio::test]
async fn test_error_mixed_categories() {
    let files = vec![
        text_upload("doc.txt", "text"),
        UploadedFile::new("song.mp3", vec![0u8; 16]),
    ];

    let err = orchestrator().merge(files).await.unwrap_err();
    assert!(matches!(err, MediaCatError::MixedBatch { .. }));
    assert!(err.is_user_error());
}

#[tokio::test]
async fn test_error_corrupted_pdf() {
    let files = vec![UploadedFile::new("broken.pdf", b"%PDF-garbage".to_vec())];

    let err = orchestrator().merge(files).await.unwrap_err();
    assert!(matches!(err, MediaCatError::FailedToLoadPdf { .. }));
    assert_eq!(err.offending_file(), Some("broken.pdf"));
}

#[tokio::test]
async fn test_error_undecodable_image() {
    let files = vec![UploadedFile::new("photo.jpg", b"not a jpeg".to_vec())];

    let err = orchestrator().merge(files).await.unwrap_err();
    assert!(matches!(err, MediaCatError::InvalidImage { .. }));
}

#[tokio::test]
async fn test_error_non_utf8_text() {
    let files = vec![UploadedFile::new("latin1.txt", vec![0xff, 0xfe, 0x61])];

    let err = orchestrator().merge(files).await.unwrap_err();
    assert!(matches!(err, MediaCatError::InvalidText { .. }));
}

#[tokio::test]
async fn test_classification_fails_before_any_parsing() {
    // The corrupt PDF comes first, but the unsupported file must win:
    // classification runs before any merge work.
    let files = vec![
        UploadedFile::new("broken.pdf", b"garbage".to_vec()),
        UploadedFile::new("odd.xyz", vec![1, 2, 3]),
    ];

    let err = orchestrator().merge(files).await.unwrap_err();
    assert!(matches!(err, MediaCatError::UnsupportedFile { .. }));
}
