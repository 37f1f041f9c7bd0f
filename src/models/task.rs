//! Units of work handed to the analyzer and the raw extraction result.

use std::path::Path;

/// Supported member formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Text => "txt",
        }
    }

    /// Match an extension (without the dot), case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }

    /// Detect the kind from a file or archive member name.
    pub fn from_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One archive member queued for analysis.
///
/// Owned by the batch runner until it is moved into a worker; nothing else
/// holds a reference to its bytes.
#[derive(Debug, Clone)]
pub struct FileTask {
    /// Name of the archive the member came from (e.g. `Bank2020.zip`).
    pub archive_name: String,
    /// Full member path inside the archive.
    pub member_name: String,
    pub bytes: Vec<u8>,
    pub bilingual: bool,
    pub include_scanned: bool,
}

impl FileTask {
    /// Last path component of the member name.
    pub fn file_name(&self) -> &str {
        bare_name(&self.member_name)
    }

    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_name(&self.member_name)
    }
}

/// Strip any directory prefix from an archive member path.
pub(crate) fn bare_name(member: &str) -> &str {
    member
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(member)
}

/// Text obtained from one document.
///
/// `skipped` means the document was recognised as a scan and excluded from
/// scoring; its text is always empty. `degraded` marks text that came back
/// empty because a parser or OCR step failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionOutcome {
    pub text: String,
    pub skipped: bool,
    pub degraded: bool,
}

impl ExtractionOutcome {
    pub fn text(text: String) -> Self {
        Self {
            text,
            skipped: false,
            degraded: false,
        }
    }

    pub fn skipped() -> Self {
        Self {
            text: String::new(),
            skipped: true,
            degraded: false,
        }
    }

    pub fn degraded() -> Self {
        Self {
            text: String::new(),
            skipped: false,
            degraded: true,
        }
    }
}
