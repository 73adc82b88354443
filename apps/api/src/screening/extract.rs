//! Text extraction from uploaded documents.
//!
//! Accepts the declared content type as the source of truth for how to parse
//! the bytes: PDF is read page by page, word-processor documents paragraph by
//! paragraph, plain text as strict UTF-8. Pages or paragraphs without
//! extractable text are skipped, never treated as failures; a document with no
//! text at all yields an empty string and the orchestrator decides what that
//! means.

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use lopdf::Document;
use tracing::debug;

use crate::screening::ScreeningError;

const PDF: &str = "application/pdf";
const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOC: &str = "application/msword";
const PLAIN_TEXT: &str = "text/plain";

pub fn extract_text(data: &[u8], content_type: &str) -> Result<String, ScreeningError> {
    match content_type {
        PDF => extract_from_pdf(data),
        DOCX | DOC => extract_from_docx(data),
        PLAIN_TEXT => {
            let text = std::str::from_utf8(data).map_err(|e| {
                ScreeningError::ExtractionFailed(format!("invalid UTF-8 in text input: {e}"))
            })?;
            Ok(text.trim().to_string())
        }
        other => Err(ScreeningError::UnsupportedFormat(other.to_string())),
    }
}

fn extract_from_pdf(data: &[u8]) -> Result<String, ScreeningError> {
    let doc = Document::load_mem(data).map_err(|e| {
        ScreeningError::ExtractionFailed(format!("failed to extract text from PDF: {e}"))
    })?;

    let mut pages_text = Vec::new();
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) if !text.trim().is_empty() => pages_text.push(text.trim().to_string()),
            Ok(_) => {}
            // Scanned or image-only pages carry no text operators. Skip them.
            Err(e) => debug!("no extractable text on page {page_number}: {e}"),
        }
    }

    Ok(pages_text.join("\n").trim().to_string())
}

fn extract_from_docx(data: &[u8]) -> Result<String, ScreeningError> {
    let docx = read_docx(data).map_err(|e| {
        ScreeningError::ExtractionFailed(format!("failed to extract text from DOCX: {e:?}"))
    })?;

    let mut paragraphs = Vec::new();
    for child in docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut text = String::new();
            for paragraph_child in paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in run.children {
                        if let RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            if !text.is_empty() {
                paragraphs.push(text);
            }
        }
    }

    Ok(paragraphs.join("\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for paragraph in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*paragraph)));
        }
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    fn pdf_bytes(page_text: Option<&str>) -> Vec<u8> {
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
        let operations = match page_text {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
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
    fn test_plain_text_is_decoded_and_trimmed() {
        let text = extract_text(b"  Python, AWS, 5 years experience \n", "text/plain").unwrap();
        assert_eq!(text, "Python, AWS, 5 years experience");
    }

    #[test]
    fn test_invalid_utf8_fails_instead_of_replacing() {
        let err = extract_text(&[0x66, 0x6f, 0xff, 0xfe], "text/plain").unwrap_err();
        assert!(matches!(err, ScreeningError::ExtractionFailed(_)), "got {err:?}");
    }

    #[test]
    fn test_unrecognized_content_type_is_rejected() {
        let err = extract_text(b"%PNG...", "image/png").unwrap_err();
        match err {
            ScreeningError::UnsupportedFormat(kind) => assert_eq!(kind, "image/png"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_docx_paragraphs_join_with_newlines() {
        let bytes = docx_bytes(&["Jane Doe", "Senior Engineer", "Python, AWS"]);
        let text = extract_text(&bytes, DOCX).unwrap();
        assert_eq!(text, "Jane Doe\nSenior Engineer\nPython, AWS");
    }

    #[test]
    fn test_docx_empty_paragraphs_contribute_nothing() {
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("First")))
            .add_paragraph(Paragraph::new())
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Second")));
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();

        let text = extract_text(&cursor.into_inner(), DOCX).unwrap();
        assert_eq!(text, "First\nSecond");
    }

    #[test]
    fn test_legacy_doc_bytes_that_are_not_a_zip_fail() {
        let err = extract_text(b"\xd0\xcf\x11\xe0 legacy word document", DOC).unwrap_err();
        assert!(matches!(err, ScreeningError::ExtractionFailed(_)), "got {err:?}");
    }

    #[test]
    fn test_pdf_with_text_extracts_it() {
        let bytes = pdf_bytes(Some("Python and AWS engineer"));
        let text = extract_text(&bytes, PDF).unwrap();
        assert!(text.contains("Python and AWS engineer"), "got {text:?}");
    }

    #[test]
    fn test_pdf_without_text_yields_empty_not_error() {
        let bytes = pdf_bytes(None);
        let text = extract_text(&bytes, PDF).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_malformed_pdf_fails() {
        let err = extract_text(b"this is not a pdf", PDF).unwrap_err();
        assert!(matches!(err, ScreeningError::ExtractionFailed(_)), "got {err:?}");
    }
}
