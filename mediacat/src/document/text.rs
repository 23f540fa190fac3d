//! Text-to-PDF rendering.
//!
//! Renders a plain-text upload into one or more Helvetica pages. Layout is
//! deliberately simple: fixed font size, greedy word wrapping at an
//! estimated character budget, and a fixed number of lines per page.

use lopdf::{Document, Object, Stream, dictionary};

use crate::config::PageSettings;
use crate::error::{MediaCatError, Result};

/// Render a UTF-8 text file into a paged PDF document.
///
/// An empty file still produces a single blank page, so every input
/// contributes at least one page to the merged output.
///
/// # Errors
///
/// Returns [`MediaCatError::InvalidText`] if the bytes are not valid UTF-8.
pub fn text_to_document(name: &str, bytes: &[u8], page: &PageSettings) -> Result<Document> {
    let text = std::str::from_utf8(bytes).map_err(|_| MediaCatError::InvalidText {
        name: name.to_string(),
    })?;

    let lines = wrap_text(text, page.chars_per_line());
    let pages: Vec<&[String]> = if lines.is_empty() {
        vec![&[]]
    } else {
        lines.chunks(page.lines_per_page()).collect()
    };

    let mut doc = Document::with_version("1.5");

    let font_id = doc.new_object_id();
    doc.objects.insert(
        font_id,
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        }
        .into(),
    );

    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());

    for page_lines in &pages {
        let content = page_content(page_lines, page);
        let stream_id = doc.new_object_id();
        doc.objects
            .insert(stream_id, Stream::new(dictionary! {}, content).into());

        let page_id = doc.new_object_id();
        doc.objects.insert(
            page_id,
            dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    Object::Real(page.width),
                    Object::Real(page.height),
                ],
                "Resources" => dictionary! {
                    "Font" => dictionary! {
                        "F1" => font_id,
                    },
                },
                "Contents" => stream_id,
            }
            .into(),
        );
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }
        .into(),
    );

    let catalog_id = doc.new_object_id();
    doc.objects.insert(
        catalog_id,
        dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        }
        .into(),
    );
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// Build the content stream for one page of text.
fn page_content(lines: &[String], page: &PageSettings) -> Vec<u8> {
    let top = page.height - page.margin - page.font_size;

    let mut content = String::new();
    content.push_str("BT\n");
    content.push_str(&format!("/F1 {} Tf\n", page.font_size));
    content.push_str(&format!("{} TL\n", page.line_height));
    content.push_str(&format!("{} {} Td\n", page.margin, top));

    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            content.push_str("T*\n");
        }
        content.push_str(&format!("({}) Tj\n", escape_pdf_string(line)));
    }

    content.push_str("ET\n");
    content.into_bytes()
}

/// Escape a line for inclusion in a PDF literal string.
///
/// The standard Type1 Helvetica font carries no Unicode mapping, so
/// characters outside the printable ASCII range are replaced with `?`.
fn escape_pdf_string(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\t' => out.push_str("    "),
            c if (' '..='~').contains(&c) => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Greedy word wrap at a character budget, preserving existing newlines.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        if raw_line.chars().count() <= max_chars {
            lines.push(raw_line.to_string());
            continue;
        }

        let mut current = String::new();
        for word in raw_line.split(' ') {
            let word_len = word.chars().count();
            let current_len = current.chars().count();

            if current.is_empty() {
                current.push_str(word);
            } else if current_len + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }

            // Break words that exceed the budget on their own.
            while current.chars().count() > max_chars {
                let head: String = current.chars().take(max_chars).collect();
                let tail: String = current.chars().skip(max_chars).collect();
                lines.push(head);
                current = tail;
            }
        }
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_one_page() {
        let doc = text_to_document("empty.txt", b"", &PageSettings::default()).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let result = text_to_document("bad.txt", &[0xff, 0xfe, 0x00], &PageSettings::default());
        assert!(matches!(
            result.unwrap_err(),
            MediaCatError::InvalidText { .. }
        ));
    }

    #[test]
    fn test_long_text_spans_pages() {
        let page = PageSettings::default();
        let line_count = page.lines_per_page() * 2 + 5;
        let text = "line\n".repeat(line_count);

        let doc = text_to_document("long.txt", text.as_bytes(), &page).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_wrap_preserves_short_lines() {
        let lines = wrap_text("alpha\nbeta\n", 80);
        assert_eq!(lines, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn test_wrap_splits_on_word_boundary() {
        let lines = wrap_text("one two three four", 9);
        assert_eq!(
            lines,
            vec!["one two".to_string(), "three".to_string(), "four".to_string()]
        );
    }

    #[test]
    fn test_wrap_breaks_overlong_word() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(
            lines,
            vec!["abcd".to_string(), "efgh".to_string(), "ij".to_string()]
        );
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(escape_pdf_string(r"a(b)c\d"), r"a\(b\)c\\d");
        assert_eq!(escape_pdf_string("caf\u{e9}"), "caf?");
        assert_eq!(escape_pdf_string("a\tb"), "a    b");
    }
}
