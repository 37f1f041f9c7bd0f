//! OCR backend abstraction.
//!
//! The batch pipeline only needs "give me the text of this scanned PDF";
//! backends decide how pages are rasterised and recognised.

use thiserror::Error;

use super::enhance::Enhancement;

/// Errors from OCR backends.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(String),
}

/// Result of OCR over a document.
#[derive(Debug, Clone)]
pub struct OcrResult {
    /// Recognised text, pages joined in page order.
    pub text: String,
    /// Number of page images that were recognised.
    pub pages_processed: u32,
    /// Which backend produced this result.
    pub backend: &'static str,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Settings shared by every OCR call in a run.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrOptions {
    /// Only the first `max_pages` pages are rasterised.
    pub max_pages: u32,
    /// Rasterisation resolution.
    pub dpi: u32,
    /// Tesseract language string, e.g. `eng+ind`.
    pub languages: String,
    /// Tesseract page segmentation mode.
    pub page_segmentation_mode: u8,
    pub enhancement: Enhancement,
}

pub const DEFAULT_OCR_MAX_PAGES: u32 = 50;
pub const DEFAULT_OCR_DPI: u32 = 300;
pub const DEFAULT_OCR_LANGUAGES: &str = "eng+ind";
/// Fully automatic page segmentation.
pub const DEFAULT_PAGE_SEGMENTATION_MODE: u8 = 3;

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_OCR_MAX_PAGES,
            dpi: DEFAULT_OCR_DPI,
            languages: DEFAULT_OCR_LANGUAGES.to_string(),
            page_segmentation_mode: DEFAULT_PAGE_SEGMENTATION_MODE,
            enhancement: Enhancement::default(),
        }
    }
}

/// Trait for OCR backends.
pub trait OcrBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Check if this backend is available (dependencies installed).
    fn is_available(&self) -> bool;

    /// Get a description of what's needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Recognise the first `options.max_pages` pages of a PDF.
    fn ocr_pdf(&self, pdf_bytes: &[u8], options: &OcrOptions) -> Result<OcrResult, OcrError>;
}
