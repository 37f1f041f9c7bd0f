//! Scanned-PDF detection with OCR fallback.

use std::sync::Arc;

use super::backend::{OcrBackend, OcrOptions};
use super::extractor::TextExtractor;
use crate::models::ExtractionOutcome;

/// Average characters per page below which a PDF counts as a scan.
pub const DEFAULT_MIN_AVG_CHARS_PER_PAGE: f64 = 50.0;

/// Result of classifying a PDF's native text layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanVerdict {
    pub page_count: usize,
    pub total_chars: usize,
    pub avg_chars_per_page: f64,
    pub scanned: bool,
}

/// Character-density heuristic for "is this PDF a raster scan".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanClassifier {
    min_avg_chars_per_page: f64,
}

impl Default for ScanClassifier {
    fn default() -> Self {
        Self {
            min_avg_chars_per_page: DEFAULT_MIN_AVG_CHARS_PER_PAGE,
        }
    }
}

impl ScanClassifier {
    pub fn new(min_avg_chars_per_page: f64) -> Self {
        Self {
            min_avg_chars_per_page,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.min_avg_chars_per_page
    }

    /// A document with zero pages has an average of zero and is a scan.
    pub fn classify(&self, total_chars: usize, page_count: usize) -> ScanVerdict {
        let avg_chars_per_page = if page_count == 0 {
            0.0
        } else {
            total_chars as f64 / page_count as f64
        };

        ScanVerdict {
            page_count,
            total_chars,
            avg_chars_per_page,
            scanned: avg_chars_per_page < self.min_avg_chars_per_page,
        }
    }
}

/// Reads PDFs natively and falls back to OCR for scans.
#[derive(Clone)]
pub struct PdfReader {
    extractor: TextExtractor,
    classifier: ScanClassifier,
    ocr: Arc<dyn OcrBackend>,
    options: OcrOptions,
}

impl PdfReader {
    pub fn new(classifier: ScanClassifier, ocr: Arc<dyn OcrBackend>, options: OcrOptions) -> Self {
        Self {
            extractor: TextExtractor::new(),
            classifier,
            ocr,
            options,
        }
    }

    pub fn classifier(&self) -> &ScanClassifier {
        &self.classifier
    }

    pub fn ocr_options(&self) -> &OcrOptions {
        &self.options
    }

    /// Native text when the PDF has a real text layer; otherwise skip or OCR.
    ///
    /// A PDF that cannot be parsed goes to OCR regardless of
    /// `include_scanned`. OCR failure yields degraded empty text.
    pub fn read_pdf(&self, bytes: &[u8], filename: &str, include_scanned: bool) -> ExtractionOutcome {
        let pdf = match self.extractor.pdf_pages(bytes) {
            Ok(pdf) => pdf,
            Err(e) => {
                tracing::warn!("Native PDF parse failed for {}: {}, trying OCR", filename, e);
                return self.ocr_fallback(bytes, filename, None);
            }
        };

        let verdict = self.classifier.classify(pdf.char_count(), pdf.page_count());
        tracing::debug!(
            "{}: {} pages, {:.1} chars/page, scanned={}",
            filename,
            verdict.page_count,
            verdict.avg_chars_per_page,
            verdict.scanned
        );

        if !verdict.scanned {
            return ExtractionOutcome::text(pdf.into_text());
        }
        if !include_scanned {
            tracing::info!("Skipping scanned PDF {}", filename);
            return ExtractionOutcome::skipped();
        }
        self.ocr_fallback(bytes, filename, Some(verdict.page_count))
    }

    fn ocr_fallback(&self, bytes: &[u8], filename: &str, page_count: Option<usize>) -> ExtractionOutcome {
        if let Some(pages) = page_count {
            if pages > self.options.max_pages as usize {
                tracing::warn!(
                    "{} has {} pages, OCR limited to the first {}",
                    filename,
                    pages,
                    self.options.max_pages
                );
            }
        }

        match self.ocr.ocr_pdf(bytes, &self.options) {
            Ok(result) => {
                tracing::info!(
                    "OCR ({}) recognised {} pages of {} in {}ms",
                    result.backend,
                    result.pages_processed,
                    filename,
                    result.processing_time_ms
                );
                ExtractionOutcome::text(result.text)
            }
            Err(e) => {
                tracing::warn!("OCR failed for {}: {}", filename, e);
                ExtractionOutcome::degraded()
            }
        }
    }
}
