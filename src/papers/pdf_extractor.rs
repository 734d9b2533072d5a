//! PDF text extraction wrapper
//!
//! Wraps pdf-extract with error handling for:
//! - Encrypted PDFs
//! - Scanned/image-only PDFs
//! - Corrupted PDFs (pdf-extract panics on some of these)

use crate::error::{Error, Result};
use std::panic::{self, AssertUnwindSafe};

/// Extract text from the first `max_pages` pages of a PDF
pub fn extract_text_from_pdf(pdf_bytes: &[u8], max_pages: usize) -> Result<String> {
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
    }))
    .map_err(|_| Error::Pdf("parser panicked on malformed document".to_string()))?
    .map_err(|e| Error::Pdf(e.to_string()))?;

    let text = pages.into_iter().take(max_pages).collect::<String>();
    if text.trim().is_empty() {
        return Err(Error::Pdf("no extractable text (scanned or image-only?)".to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// PDF with `count` pages, page n drawing the text `PAGEMARKn`
    fn marked_pdf(count: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for n in 1..=count {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("PAGEMARK{}", n))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_stops_after_max_pages() {
        let text = extract_text_from_pdf(&marked_pdf(8), 6).unwrap();
        for n in 1..=6 {
            assert!(text.contains(&format!("PAGEMARK{}", n)), "page {} missing: {:?}", n, text);
        }
        assert!(!text.contains("PAGEMARK7"), "page 7 extracted: {:?}", text);
        assert!(!text.contains("PAGEMARK8"), "page 8 extracted: {:?}", text);
    }

    #[test]
    fn test_short_document_is_read_whole() {
        let text = extract_text_from_pdf(&marked_pdf(3), 6).unwrap();
        assert!(text.contains("PAGEMARK1"));
        assert!(text.contains("PAGEMARK3"));
    }

    #[test]
    fn test_zero_pages_is_an_error() {
        assert!(matches!(extract_text_from_pdf(&marked_pdf(2), 0), Err(Error::Pdf(_))));
    }

    #[test]
    fn test_garbage_bytes_fail() {
        assert!(matches!(
            extract_text_from_pdf(b"definitely not a pdf", 6),
            Err(Error::Pdf(_))
        ));
    }
}
