//! Format-dispatching text extraction from in-memory documents.

use docx_rs::{DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};
use thiserror::Error;

use crate::models::DocumentKind;

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Failed to parse DOCX: {0}")]
    Docx(String),

    #[error("Failed to parse PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Native text of a PDF, one entry per page in page order.
#[derive(Debug, Clone, Default)]
pub struct PdfText {
    pub pages: Vec<String>,
}

impl PdfText {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Characters across all pages.
    pub fn char_count(&self) -> usize {
        self.pages.iter().map(|p| p.chars().count()).sum()
    }

    pub fn into_text(self) -> String {
        self.pages.join("\n")
    }
}

/// Pulls text out of plain text, Word and PDF documents without OCR.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract text for the non-PDF kinds.
    ///
    /// Word parse failures degrade to an empty string. PDFs go through
    /// [`TextExtractor::pdf_pages`] so the caller can classify scans first.
    pub fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
        match kind {
            DocumentKind::Text => Ok(self.read_text(bytes)),
            DocumentKind::Docx => Ok(self.read_docx(bytes).unwrap_or_else(|e| {
                tracing::warn!("{}", e);
                String::new()
            })),
            DocumentKind::Pdf => Ok(self.pdf_pages(bytes)?.into_text()),
        }
    }

    /// Decode UTF-8, falling back to Latin-1 which accepts any byte sequence.
    pub fn read_text(&self, bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(e) => {
                tracing::debug!("Text is not UTF-8 ({}), decoding as Latin-1", e);
                bytes.iter().map(|&b| b as char).collect()
            }
        }
    }

    /// All paragraph text in document order, then all table cell text.
    pub fn read_docx(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let doc = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

        let mut paragraphs = Vec::new();
        let mut cells = Vec::new();

        for child in &doc.document.children {
            match child {
                DocumentChild::Paragraph(para) => {
                    paragraphs.push(paragraph_text(&para.children));
                }
                DocumentChild::Table(table) => {
                    for row in &table.rows {
                        let TableChild::TableRow(tr) = row;
                        for cell in &tr.cells {
                            let TableRowChild::TableCell(tc) = cell;
                            let cell_text: Vec<String> = tc
                                .children
                                .iter()
                                .filter_map(|content| match content {
                                    TableCellContent::Paragraph(para) => {
                                        Some(paragraph_text(&para.children))
                                    }
                                    _ => None,
                                })
                                .collect();
                            cells.push(cell_text.join("\n"));
                        }
                    }
                }
                _ => {}
            }
        }

        paragraphs.extend(cells);
        Ok(paragraphs.join("\n"))
    }

    /// Per-page native text layer of a PDF.
    ///
    /// Pages whose content cannot be decoded contribute an empty string; only a
    /// document that cannot be opened at all is an error.
    pub fn pdf_pages(&self, bytes: &[u8]) -> Result<PdfText, ExtractionError> {
        let doc = lopdf::Document::load_mem(bytes)?;
        let pages = doc
            .get_pages()
            .keys()
            .map(|&page_num| {
                doc.extract_text(&[page_num]).unwrap_or_else(|e| {
                    tracing::debug!("No text layer on page {}: {}", page_num, e);
                    String::new()
                })
            })
            .collect();

        Ok(PdfText { pages })
    }
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut out = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run_text(&run.children, &mut out),
            ParagraphChild::Hyperlink(link) => {
                for inner in &link.children {
                    if let ParagraphChild::Run(run) = inner {
                        push_run_text(&run.children, &mut out);
                    }
                }
            }
            _ => {}
        }
    }
    out
}

fn push_run_text(children: &[RunChild], out: &mut String) {
    for child in children {
        match child {
            RunChild::Text(text) => out.push_str(&text.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}
