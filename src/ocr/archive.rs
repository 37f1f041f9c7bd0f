//! Zip archive enumeration for batch input.
//!
//! Members are read eagerly into memory: zip readers do not support
//! concurrent random access, so workers never touch the archive.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use thiserror::Error;
use zip::ZipArchive;

use crate::models::{bare_name, DocumentKind};

/// Errors that can occur during archive operations.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to open archive: {0}")]
    OpenFailed(String),

    #[error("Failed to read archive entry {name}: {source}")]
    ReadEntry {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Upper bound on the buffer reserved from a member's declared size.
const MAX_PREALLOCATION: u64 = 64 << 20;

/// A supported document inside an archive, with its bytes loaded.
///
/// `contents` is an error when the member's data could not be read (corrupt
/// stream, bad checksum); the rest of the archive is unaffected.
#[derive(Debug)]
pub struct ArchiveMember {
    /// Path within the archive.
    pub path: String,
    pub kind: DocumentKind,
    pub contents: Result<Vec<u8>, ArchiveError>,
}

impl ArchiveMember {
    pub fn filename(&self) -> &str {
        bare_name(&self.path)
    }
}

/// An opened batch archive.
pub struct BatchArchive {
    name: String,
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl std::fmt::Debug for BatchArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchArchive")
            .field("name", &self.name)
            .field("entries", &self.archive.len())
            .finish()
    }
}

impl BatchArchive {
    /// Open a zip file from disk. The archive name is the file name.
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let mut file =
            File::open(path).map_err(|e| ArchiveError::OpenFailed(format!("{}: {}", path.display(), e)))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, bytes)
    }

    /// Open a zip held in memory, e.g. an upload.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ArchiveError> {
        let archive = ZipArchive::new(Cursor::new(bytes))?;
        Ok(Self {
            name: name.into(),
            archive,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total entries including directories and unsupported files.
    pub fn entry_count(&self) -> usize {
        self.archive.len()
    }

    /// Read every supported member into memory, in archive order.
    ///
    /// Directories, `__MACOSX` resource forks, hidden files and unsupported
    /// extensions are skipped. Only a broken central directory entry fails the
    /// whole call; unreadable member data is reported per member.
    pub fn read_members(&mut self) -> Result<Vec<ArchiveMember>, ArchiveError> {
        let mut members = Vec::new();

        for i in 0..self.archive.len() {
            let mut file = self.archive.by_index(i)?;
            let path = file.name().to_string();

            if file.is_dir() || !is_candidate(&path) {
                continue;
            }
            let Some(kind) = DocumentKind::from_name(&path) else {
                continue;
            };

            let mut bytes = Vec::with_capacity(file.size().min(MAX_PREALLOCATION) as usize);
            let contents = match file.read_to_end(&mut bytes) {
                Ok(_) => Ok(bytes),
                Err(source) => {
                    tracing::warn!("Failed to read {} from {}: {}", path, self.name, source);
                    Err(ArchiveError::ReadEntry {
                        name: path.clone(),
                        source,
                    })
                }
            };

            members.push(ArchiveMember {
                path,
                kind,
                contents,
            });
        }

        tracing::debug!(
            "{}: {} of {} entries are supported documents",
            self.name,
            members.len(),
            self.archive.len()
        );
        Ok(members)
    }
}

/// Skip platform metadata entries.
fn is_candidate(path: &str) -> bool {
    if path.starts_with("__MACOSX") || path.ends_with('/') {
        return false;
    }
    !bare_name(path).starts_with('.')
}
