//! Per-file analysis: extract text, count topic hits, label the record.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::models::{DocumentKind, ExtractionOutcome, FileRecord, FileTask, RecordStatus};
use crate::ocr::{PdfReader, TextExtractor};
use crate::patterns::{PatternLibrary, PatternSet};

/// Label used when neither the file name nor the archive name carries a year.
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Four-digit year in the 1900s or 2000s, anywhere in a name.
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:19|20)\d{2}").expect("valid year regex"));

/// Find a year in the file name first, then in the archive name.
pub fn detect_year(file_name: &str, archive_name: &str) -> String {
    YEAR_PATTERN
        .find(file_name)
        .or_else(|| YEAR_PATTERN.find(archive_name))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
}

/// Archive name without its extension.
pub fn source_label(archive_name: &str) -> String {
    Path::new(archive_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| archive_name.to_string())
}

/// Whitespace-delimited token count.
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Turns one [`FileTask`] into one [`FileRecord`]. Never fails.
#[derive(Clone)]
pub struct FileAnalyzer {
    patterns: Arc<PatternLibrary>,
    pdf: PdfReader,
    extractor: TextExtractor,
}

impl FileAnalyzer {
    pub fn new(patterns: Arc<PatternLibrary>, pdf: PdfReader) -> Self {
        Self {
            patterns,
            pdf,
            extractor: TextExtractor::new(),
        }
    }

    pub fn patterns(&self) -> &PatternLibrary {
        &self.patterns
    }

    pub fn pattern_set(&self, bilingual: bool) -> &PatternSet {
        self.patterns.select(bilingual)
    }

    pub fn analyze(&self, task: &FileTask) -> FileRecord {
        let file_name = task.file_name().to_string();
        let label = source_label(&task.archive_name);
        let year = detect_year(&file_name, &task.archive_name);
        let patterns = self.pattern_set(task.bilingual);

        let Some(kind) = task.kind() else {
            tracing::warn!("Unsupported file type: {}", task.member_name);
            return FileRecord::error(label, year, file_name, patterns.topics());
        };

        let outcome = self.extract(task, kind);
        if outcome.skipped {
            return FileRecord {
                source_label: label,
                year,
                file_name,
                total_word_count: 0,
                status: RecordStatus::SkippedScan,
                topics: patterns.zero_counts(),
            };
        }
        if outcome.degraded {
            tracing::debug!("{} scored from empty text", task.member_name);
        }

        FileRecord {
            source_label: label,
            year,
            file_name,
            total_word_count: word_count(&outcome.text),
            status: RecordStatus::Success,
            topics: patterns.count_all(&outcome.text),
        }
    }

    fn extract(&self, task: &FileTask, kind: DocumentKind) -> ExtractionOutcome {
        match kind {
            DocumentKind::Pdf => {
                self.pdf
                    .read_pdf(&task.bytes, task.file_name(), task.include_scanned)
            }
            DocumentKind::Docx | DocumentKind::Text => {
                match self.extractor.extract(&task.bytes, kind) {
                    Ok(text) => ExtractionOutcome::text(text),
                    Err(e) => {
                        tracing::warn!("Text extraction failed for {}: {}", task.member_name, e);
                        ExtractionOutcome::degraded()
                    }
                }
            }
        }
    }
}
