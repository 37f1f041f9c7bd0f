//! Text extraction and OCR module.
//!
//! Extracts text from archive members using:
//! - UTF-8 (Latin-1 fallback) decoding for plain text
//! - docx-rs for Word paragraphs and tables
//! - lopdf for the native PDF text layer
//! - Tesseract OCR for scanned PDFs, after an image enhancement pre-pass
//!
//! Also includes zip archive enumeration for batch input.
//!
//! ## Scanned PDFs
//!
//! A PDF whose native text layer averages fewer than 50 characters per page is
//! treated as a scan. Scans are either skipped or rasterised (first 50 pages,
//! 300 DPI) and recognised with `eng+ind` language data.

mod archive;
mod backend;
mod enhance;
mod extractor;
mod scan;
mod tesseract;
mod tools;

pub use archive::{ArchiveError, ArchiveMember, BatchArchive};
pub use backend::{
    OcrBackend, OcrError, OcrOptions, OcrResult, DEFAULT_OCR_DPI, DEFAULT_OCR_LANGUAGES,
    DEFAULT_OCR_MAX_PAGES, DEFAULT_PAGE_SEGMENTATION_MODE,
};
pub use enhance::{
    adjust_contrast, adjust_sharpness, Enhancement, DEFAULT_CONTRAST_FACTOR,
    DEFAULT_SHARPNESS_FACTOR,
};
pub use extractor::{ExtractionError, PdfText, TextExtractor};
pub use scan::{PdfReader, ScanClassifier, ScanVerdict, DEFAULT_MIN_AVG_CHARS_PER_PAGE};
pub use tesseract::TesseractBackend;
pub use tools::{check_binary, check_tools};
