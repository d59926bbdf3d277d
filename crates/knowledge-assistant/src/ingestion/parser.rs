//! Per-format text extraction

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::{Error, Result};
use crate::types::DocumentKind;

/// Text pulled out of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Extracted text content
    pub content: String,
    /// Total pages (if applicable)
    pub pages: Option<u32>,
}

/// Capability shared by every format handler
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from raw file bytes
    fn extract(&self, filename: &str, data: &[u8]) -> Result<ExtractedText>;
}

/// PDF extraction via pdf-extract, entirely in memory
#[derive(Debug, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Result<ExtractedText> {
        // pdf-extract panics on some malformed inputs instead of returning an error
        let content = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(data)))
            .map_err(|_| Error::extraction(filename, "PDF parser aborted on malformed input"))?
            .map_err(|e| Error::extraction(filename, e.to_string()))?;

        // Page count is informational only
        let pages = lopdf::Document::load_mem(data)
            .ok()
            .map(|doc| doc.get_pages().len() as u32);

        Ok(ExtractedText { content, pages })
    }
}

/// DOCX extraction via docx-rs
#[derive(Debug, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    fn push_paragraph(out: &mut String, paragraph: &docx_rs::Paragraph) {
        for child in &paragraph.children {
            if let docx_rs::ParagraphChild::Run(run) = child {
                for child in &run.children {
                    match child {
                        docx_rs::RunChild::Text(t) => out.push_str(&t.text),
                        docx_rs::RunChild::Tab(_) => out.push('\t'),
                        _ => {}
                    }
                }
            }
        }
        out.push('\n');
    }

    #[allow(irrefutable_let_patterns)]
    fn push_table(out: &mut String, table: &docx_rs::Table) {
        for row in &table.rows {
            let docx_rs::TableChild::TableRow(row) = row else { continue };
            for cell in &row.cells {
                let docx_rs::TableRowChild::TableCell(cell) = cell else { continue };
                for content in &cell.children {
                    match content {
                        docx_rs::TableCellContent::Paragraph(p) => Self::push_paragraph(out, p),
                        docx_rs::TableCellContent::Table(t) => Self::push_table(out, t),
                        _ => {}
                    }
                }
            }
        }
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Result<ExtractedText> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::extraction(filename, e.to_string()))?;

        let mut content = String::new();
        for child in &doc.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(p) => Self::push_paragraph(&mut content, p),
                docx_rs::DocumentChild::Table(t) => Self::push_table(&mut content, t),
                _ => {}
            }
        }

        Ok(ExtractedText {
            content,
            pages: None,
        })
    }
}

/// Raw UTF-8 decoding
#[derive(Debug, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Result<ExtractedText> {
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        let content = std::str::from_utf8(data)
            .map_err(|e| Error::extraction(filename, format!("unsupported encoding: {}", e)))?
            .to_string();

        Ok(ExtractedText {
            content,
            pages: None,
        })
    }
}

/// Default handler for a document kind
pub fn default_extractor(kind: DocumentKind) -> Box<dyn TextExtractor> {
    match kind {
        DocumentKind::Pdf => Box::new(PdfExtractor),
        DocumentKind::Docx => Box::new(DocxExtractor),
        DocumentKind::Txt => Box::new(PlainTextExtractor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_strips_bom() {
        let out = PlainTextExtractor
            .extract("notes.txt", b"\xEF\xBB\xBFDeadline is Friday")
            .unwrap();
        assert_eq!(out.content, "Deadline is Friday");
        assert_eq!(out.pages, None);
    }

    #[test]
    fn test_plain_text_rejects_invalid_utf8() {
        let err = PlainTextExtractor
            .extract("latin1.txt", &[0x44, 0xE9, 0x6A, 0xE0])
            .unwrap_err();
        match err {
            Error::Extraction { filename, message } => {
                assert_eq!(filename, "latin1.txt");
                assert!(message.contains("unsupported encoding"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_pdf_is_an_extraction_error() {
        let result = PdfExtractor.extract("broken.pdf", b"this is not a pdf");
        assert!(matches!(result, Err(Error::Extraction { .. })));
    }

    fn single_page_pdf(text: &str) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

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
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_pdf_text_and_page_count_from_memory() {
        let out = PdfExtractor
            .extract("memo.pdf", &single_page_pdf("Deadline Friday"))
            .unwrap();
        assert!(out.content.contains("Deadline"));
        assert_eq!(out.pages, Some(1));
    }

    #[test]
    fn test_corrupt_docx_is_an_extraction_error() {
        let result = DocxExtractor.extract("broken.docx", b"PK\x03\x04 truncated");
        assert!(matches!(result, Err(Error::Extraction { .. })));
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let mut buf = std::io::Cursor::new(Vec::new());
        docx_rs::Docx::new()
            .add_paragraph(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("Quarterly report")))
            .add_paragraph(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("Revenue grew 12%")))
            .build()
            .pack(&mut buf)
            .unwrap();

        let out = DocxExtractor.extract("report.docx", buf.get_ref()).unwrap();
        assert!(out.content.contains("Quarterly report\n"));
        assert!(out.content.contains("Revenue grew 12%\n"));
    }
}
