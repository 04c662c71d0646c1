//! DOCX text extraction.
//!
//! A DOCX file is a zip archive; the body lives in `word/document.xml` as a
//! sequence of `w:p` paragraphs made of `w:r` runs holding `w:t` text.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::{NewsletterError, Result};

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract the text of every body paragraph of the DOCX at `path`.
///
/// Paragraphs are joined with `\n` in document order; empty paragraphs are
/// kept as empty lines. Paragraphs inside tables are not part of the body
/// paragraph list and are skipped.
pub fn extract_docx_text(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)?;
    read_document(file)
}

/// Same as [`extract_docx_text`] for a DOCX already in memory.
pub fn extract_docx_text_from_mem(bytes: &[u8]) -> Result<String> {
    read_document(Cursor::new(bytes))
}

fn read_document<R: Read + Seek>(reader: R) -> Result<String> {
    let mut archive = zip::ZipArchive::new(reader).map_err(|e| NewsletterError::DocxError(e.to_string()))?;

    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| NewsletterError::DocxError(format!("{}: {}", DOCUMENT_PART, e)))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;

    Ok(paragraphs(&xml)?.join("\n"))
}

/// Body paragraphs of a `document.xml` part, in order.
pub(crate) fn paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut paragraph_depth = 0usize;
    let mut table_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" => {
                    paragraph_depth += 1;
                    if paragraph_depth == 1 && table_depth == 0 {
                        current = Some(String::new());
                    }
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" if paragraph_depth == 0 && table_depth == 0 => paragraphs.push(String::new()),
                b"w:tab" => push_char(&mut current, '\t'),
                b"w:br" | b"w:cr" => push_char(&mut current, '\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                if let Some(text) = current.as_mut() {
                    let unescaped = e.unescape().map_err(|err| NewsletterError::DocxError(err.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" => {
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                    if paragraph_depth == 0
                        && let Some(text) = current.take()
                    {
                        paragraphs.push(text);
                    }
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(NewsletterError::DocxError(e.to_string())),
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_char(current: &mut Option<String>, c: char) {
    if let Some(text) = current.as_mut() {
        text.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        )
    }

    fn docx_bytes(xml: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buffer);
            let options = zip::write::SimpleFileOptions::default();
            zip.start_file(DOCUMENT_PART, options).unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_paragraphs_in_order() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>First</w:t></w:r><w:r><w:t xml:space="preserve"> paragraph</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>Third &amp; last</w:t></w:r></w:p>"#,
        );

        assert_eq!(
            paragraphs(&xml).unwrap(),
            vec!["First paragraph".to_string(), String::new(), "Third & last".to_string()]
        );
    }

    #[test]
    fn test_tabs_and_breaks() {
        let xml = document_xml(r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>"#);
        assert_eq!(paragraphs(&xml).unwrap(), vec!["a\tb\nc".to_string()]);
    }

    #[test]
    fn test_table_paragraphs_skipped() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Body</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>After</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraphs(&xml).unwrap(), vec!["Body".to_string(), "After".to_string()]);
    }

    #[test]
    fn test_extract_from_archive() {
        let xml = document_xml(r#"<w:p><w:r><w:t>One</w:t></w:r></w:p><w:p><w:r><w:t>Two</w:t></w:r></w:p>"#);
        let text = extract_docx_text_from_mem(&docx_bytes(&xml)).unwrap();
        assert_eq!(text, "One\nTwo");
    }

    #[test]
    fn test_not_a_zip() {
        let result = extract_docx_text_from_mem(b"plain text, not a docx");
        assert!(matches!(result, Err(NewsletterError::DocxError(_))));
    }

    #[test]
    fn test_missing_document_part() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buffer);
            zip.start_file("other.xml", zip::write::SimpleFileOptions::default()).unwrap();
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }

        let result = extract_docx_text_from_mem(&buffer.into_inner());
        assert!(matches!(result, Err(NewsletterError::DocxError(_))));
    }
}
