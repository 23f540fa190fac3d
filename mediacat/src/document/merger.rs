//! PDF document concatenation.
//!
//! Combines the per-file documents produced by [`super::document_for_file`]
//! into a single output, preserving input order.

use lopdf::{Document, Object, ObjectId};

use crate::error::{MediaCatError, Result};

/// Merges a sequence of in-memory PDF documents into one.
#[derive(Debug, Default)]
pub struct DocumentMerger;

impl DocumentMerger {
    /// Create a new merger.
    pub fn new() -> Self {
        Self
    }

    /// Concatenate documents in the given order.
    ///
    /// The first document becomes the base; every subsequent document has
    /// its objects renumbered past the current maximum ID, its objects
    /// moved into the base, and its pages appended to the base page tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or a document's page tree is
    /// malformed.
    pub fn merge(&self, documents: Vec<Document>) -> Result<Document> {
        let mut documents = documents.into_iter();
        let mut merged = documents
            .next()
            .ok_or_else(|| MediaCatError::other("No documents to merge"))?;
        let mut max_id = merged.max_id;

        for mut doc in documents {
            // Renumber objects to avoid ID conflicts with the base.
            doc.renumber_objects_with(max_id + 1);
            max_id = doc.max_id;

            let doc_pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
            merged.objects.extend(doc.objects);

            add_pages_to_tree(&mut merged, &doc_pages)?;
        }

        merged.compress();
        merged.renumber_objects();

        Ok(merged)
    }
}

/// Append page references to the base document's root page tree.
fn add_pages_to_tree(merged: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    let catalog = merged
        .catalog_mut()
        .map_err(|e| MediaCatError::other(format!("Failed to get catalog: {e}")))?;

    let pages_id = catalog
        .get(b"Pages")
        .and_then(|p| p.as_reference())
        .map_err(|e| MediaCatError::other(format!("Failed to get pages reference: {e}")))?;

    let pages_dict = merged
        .get_object_mut(pages_id)
        .map_err(|e| MediaCatError::other(format!("Failed to get pages object: {e}")))?;

    let Object::Dictionary(dict) = pages_dict else {
        return Err(MediaCatError::other("Pages object is not a dictionary"));
    };

    let kids = dict
        .get_mut(b"Kids")
        .map_err(|_| MediaCatError::other("Pages dictionary missing Kids array"))?;

    let Object::Array(kids_array) = kids else {
        return Err(MediaCatError::other("Kids is not an array"));
    };

    for &page_id in page_ids {
        kids_array.push(Object::Reference(page_id));
    }

    let current_count = dict.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
    dict.set("Count", Object::Integer(current_count + page_ids.len() as i64));

    // Pages may inherit MediaBox/Resources/CropBox/Rotate from their old
    // page tree; materialize those onto each page before pointing Parent
    // at the tree it now lives in.
    for &page_id in page_ids {
        let inherited = inherited_page_attributes(merged, page_id);
        if let Ok(Object::Dictionary(page)) = merged.get_object_mut(page_id) {
            for (key, value) in inherited {
                page.set(key, value);
            }
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    Ok(())
}

/// Page attributes that PDF page trees pass down to descendants.
const INHERITABLE_PAGE_KEYS: &[&[u8]] = &[b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Resolve the inheritable attributes a page is missing by walking its
/// original parent chain.
fn inherited_page_attributes(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let Ok(page) = doc.get_object(page_id).and_then(Object::as_dict) else {
        return Vec::new();
    };

    let mut missing: Vec<&[u8]> = INHERITABLE_PAGE_KEYS
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut found = Vec::new();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    // Depth guard against malformed circular page trees.
    let mut depth = 0;
    while let Some(node_id) = parent {
        if missing.is_empty() || depth > 32 {
            break;
        }
        depth += 1;

        let Ok(node) = doc.get_object(node_id).and_then(Object::as_dict) else {
            break;
        };
        missing.retain(|key| {
            if let Ok(value) = node.get(key) {
                found.push((key.to_vec(), value.clone()));
                false
            } else {
                true
            }
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSettings;
    use crate::document::text::text_to_document;
    use lopdf::{Stream, dictionary};

    fn text_doc(body: &str) -> Document {
        text_to_document("input.txt", body.as_bytes(), &PageSettings::default()).unwrap()
    }

    /// A one-page document whose MediaBox and Resources live only on the
    /// Pages node, reaching the page through tree inheritance.
    fn doc_with_inherited_layout() -> Document {
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

        let content_id = doc.new_object_id();
        doc.objects.insert(
            content_id,
            Stream::new(dictionary! {}, b"BT /F1 12 Tf (inherited) Tj ET".to_vec()).into(),
        );

        let pages_id = doc.new_object_id();
        let page_id = doc.new_object_id();
        doc.objects.insert(
            page_id,
            dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            }
            .into(),
        );
        doc.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 200.into(), 100.into()],
                "Resources" => dictionary! {
                    "Font" => dictionary! {
                        "F1" => font_id,
                    },
                },
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

        doc
    }

    #[test]
    fn test_merge_empty_list_rejected() {
        let result = DocumentMerger::new().merge(Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_single_document() {
        let merged = DocumentMerger::new().merge(vec![text_doc("only")]).unwrap();
        assert_eq!(merged.get_pages().len(), 1);
    }

    #[test]
    fn test_merge_sums_page_counts() {
        let page = PageSettings::default();
        let long = "line\n".repeat(page.lines_per_page() + 1);

        let merged = DocumentMerger::new()
            .merge(vec![text_doc("first"), text_doc(&long), text_doc("last")])
            .unwrap();

        assert_eq!(merged.get_pages().len(), 4);
    }

    #[test]
    fn test_merge_materializes_inherited_page_attributes() {
        let merged = DocumentMerger::new()
            .merge(vec![text_doc("first"), doc_with_inherited_layout()])
            .unwrap();

        let pages = merged.get_pages();
        assert_eq!(pages.len(), 2);

        // The appended page must carry the attributes it used to inherit.
        let page = merged.get_object(pages[&2]).unwrap().as_dict().unwrap();

        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_i64().unwrap(), 200);
        assert_eq!(media_box[3].as_i64().unwrap(), 100);
        assert!(page.has(b"Resources"));

        // And it now parents into the merged tree.
        let root = merged
            .catalog()
            .unwrap()
            .get(b"Pages")
            .unwrap()
            .as_reference()
            .unwrap();
        assert_eq!(page.get(b"Parent").unwrap().as_reference().unwrap(), root);
    }

    #[test]
    fn test_merge_keeps_direct_page_attributes() {
        // Pages that already carry their own MediaBox are left alone.
        let merged = DocumentMerger::new()
            .merge(vec![doc_with_inherited_layout(), text_doc("second")])
            .unwrap();

        let pages = merged.get_pages();
        let page = merged.get_object(pages[&2]).unwrap().as_dict().unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();

        // US Letter width from the text renderer, not the 200pt base box.
        assert_eq!(media_box[2].as_float().unwrap(), 612.0);
    }

    #[test]
    fn test_merge_survives_save_and_reload() {
        let merged = DocumentMerger::new()
            .merge(vec![text_doc("a"), text_doc("b")])
            .unwrap();

        let bytes = crate::document::document_to_bytes(merged).unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 2);
    }
}
