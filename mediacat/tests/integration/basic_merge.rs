//! Integration tests for document merging end to end.

use mediacat::document::load_pdf;
use mediacat::{Category, OutputFormat};

use crate::common::{orchestrator, pdf_upload, png_upload, text_upload};

#[tokio::test]
async fn test_merge_mixed_document_batch() {
    let files = vec![
        png_upload("cover.png", 64, 48),
        pdf_upload("report.pdf", "quarterly numbers"),
        text_upload("notes.txt", "follow-up items"),
    ];

    let outcome = orchestrator().merge(files).await.unwrap();

    assert_eq!(outcome.artifact.format, OutputFormat::Pdf);
    assert_eq!(outcome.statistics.files_merged, 3);
    assert_eq!(outcome.statistics.category, Category::Document);
    assert_eq!(outcome.statistics.total_pages, Some(3));
    assert!(outcome.statistics.total_duration_secs.is_none());

    // The output must be a loadable PDF with one page per input.
    let merged = load_pdf("merged.pdf", &outcome.artifact.bytes).unwrap();
    assert_eq!(merged.get_pages().len(), 3);
}

#[tokio::test]
async fn test_merge_single_file_batch() {
    let outcome = orchestrator()
        .merge(vec![text_upload("only.txt", "just me")])
        .await
        .unwrap();

    assert_eq!(outcome.statistics.files_merged, 1);
    assert_eq!(outcome.statistics.total_pages, Some(1));
    assert!(outcome.artifact.bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_merge_preserves_upload_order() {
    let files = vec![
        text_upload("first.txt", "zebra opening line"),
        text_upload("second.txt", "omega closing line"),
    ];

    let outcome = orchestrator().merge(files).await.unwrap();
    let merged = load_pdf("merged.pdf", &outcome.artifact.bytes).unwrap();

    let pages = merged.get_pages();
    assert_eq!(pages.len(), 2);

    // Each input's text must land on the page matching its upload position.
    assert!(page_text(&merged, pages[&1]).contains("zebra opening line"));
    assert!(page_text(&merged, pages[&2]).contains("omega closing line"));
}

/// Decode one page's content stream to a string.
fn page_text(doc: &lopdf::Document, page_id: lopdf::ObjectId) -> String {
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    let contents = page.get(b"Contents").unwrap().as_reference().unwrap();
    let stream = doc.get_object(contents).unwrap().as_stream().unwrap();
    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    String::from_utf8_lossy(&data).into_owned()
}

#[tokio::test]
async fn test_merged_pdf_survives_reload_and_remerge() {
    let first = orchestrator()
        .merge(vec![text_upload("a.txt", "alpha"), text_upload("b.txt", "beta")])
        .await
        .unwrap();

    // Feed the merged output back in as an uploaded PDF.
    let files = vec![
        mediacat::UploadedFile::new("merged.pdf", first.artifact.bytes),
        text_upload("c.txt", "gamma"),
    ];
    let second = orchestrator().merge(files).await.unwrap();

    assert_eq!(second.statistics.total_pages, Some(3));
}
