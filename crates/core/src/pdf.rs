//! PDF text extraction.

use std::path::Path;

use lopdf::Document as PdfDocument;
use tracing::debug;

use crate::{NewsletterError, Result};

/// Extract the text of every page of the PDF at `path`, in page order.
///
/// Pages are concatenated without a separator. A page whose text cannot be
/// decoded contributes an empty string rather than failing the document.
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    let document = PdfDocument::load(path).map_err(|e| NewsletterError::PdfError(e.to_string()))?;
    Ok(pages_text(&document))
}

/// Same as [`extract_pdf_text`] for a PDF already in memory.
pub fn extract_pdf_text_from_mem(bytes: &[u8]) -> Result<String> {
    let document = PdfDocument::load_mem(bytes).map_err(|e| NewsletterError::PdfError(e.to_string()))?;
    Ok(pages_text(&document))
}

fn pages_text(document: &PdfDocument) -> String {
    let pages = document.get_pages();
    debug!(pages = pages.len(), "extracting PDF pages");

    pages
        .keys()
        .map(|&number| {
            document.extract_text(&[number]).unwrap_or_else(|e| {
                debug!(page = number, error = %e, "page has no extractable text");
                String::new()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    /// A minimal PDF with one Courier text line per page.
    fn pdf_with_pages(lines: &[&str]) -> Vec<u8> {
        let mut doc = PdfDocument::with_version("1.5");
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
        for line in lines {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
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
    fn test_pages_in_order() {
        let bytes = pdf_with_pages(&["First page text", "Second page text"]);
        let text = extract_pdf_text_from_mem(&bytes).unwrap();

        let first = text.find("First page text").expect("first page extracted");
        let second = text.find("Second page text").expect("second page extracted");
        assert!(first < second);
    }

    #[test]
    fn test_extract_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, pdf_with_pages(&["Quarterly report"])).unwrap();

        assert!(extract_pdf_text(&path).unwrap().contains("Quarterly report"));
    }

    #[test]
    fn test_garbage_bytes_are_pdf_error() {
        let result = extract_pdf_text_from_mem(b"definitely not a pdf");
        assert!(matches!(result, Err(NewsletterError::PdfError(_))));
    }

    #[test]
    fn test_missing_file_is_pdf_error() {
        let result = extract_pdf_text(Path::new("/nonexistent/report.pdf"));
        assert!(matches!(result, Err(NewsletterError::PdfError(_))));
    }
}
