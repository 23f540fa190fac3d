//! Image-to-PDF conversion.
//!
//! Decodes an uploaded raster image and embeds it as a single PDF page. The
//! pixel data is re-encoded as baseline JPEG so it can be stored directly in
//! a `DCTDecode` image XObject; the page is sized to the image at 72 dpi,
//! matching how desktop tools export "image as PDF".

use image::codecs::jpeg::JpegEncoder;
use lopdf::{Document, Object, Stream, dictionary};

use crate::error::{MediaCatError, Result};

/// JPEG quality used when re-encoding decoded pixels.
const JPEG_QUALITY: u8 = 85;

/// Convert an uploaded image into a one-page PDF document.
///
/// # Errors
///
/// Returns [`MediaCatError::InvalidImage`] if the bytes cannot be decoded
/// or re-encoded.
pub fn image_to_document(name: &str, bytes: &[u8]) -> Result<Document> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| MediaCatError::invalid_image(name, e.to_string()))?;

    // Flatten any alpha channel; PDF DCTDecode carries plain RGB.
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| MediaCatError::invalid_image(name, e.to_string()))?;

    let mut doc = Document::with_version("1.5");

    let image_id = doc.new_object_id();
    doc.objects.insert(
        image_id,
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        )
        .into(),
    );

    // Draw the image across the full page at natural size.
    let content = format!("q\n{width} 0 0 {height} 0 0 cm\n/Im0 Do\nQ\n").into_bytes();
    let content_id = doc.new_object_id();
    doc.objects
        .insert(content_id, Stream::new(dictionary! {}, content).into());

    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();
    doc.objects.insert(
        page_id,
        dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                (width as i64).into(),
                (height as i64).into(),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
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

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_image_becomes_one_page() {
        let doc = image_to_document("photo.png", &png_bytes(32, 24)).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_page_sized_to_image() {
        let doc = image_to_document("photo.png", &png_bytes(40, 20)).unwrap();

        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();

        assert_eq!(media_box[2].as_i64().unwrap(), 40);
        assert_eq!(media_box[3].as_i64().unwrap(), 20);
    }

    #[test]
    fn test_undecodable_image_rejected() {
        let result = image_to_document("broken.png", b"not an image at all");
        assert!(matches!(
            result.unwrap_err(),
            MediaCatError::InvalidImage { .. }
        ));
    }
}
