use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorKind};
use crate::format::ArchiveFormat;
use crate::session::TempSession;

/// A file materialized on disk, or a dropped file passed through unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedFile {
    pub path: PathBuf,
    pub size: u64,
    /// Originating archive; `None` for a passthrough file.
    pub archive: Option<PathBuf>,
    pub relative_name: PathBuf,
}

/// An entry left out of an extraction, with the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedEntry {
    pub name: String,
    pub kind: ErrorKind,
    pub reason: String,
}

impl SkippedEntry {
    pub fn new(name: impl Into<String>, error: &Error) -> Self {
        Self {
            name: name.into(),
            kind: error.kind(),
            reason: error.to_string(),
        }
    }
}

/// Result of dispatching one dropped file.
///
/// Owns the session directory; dropping the extraction removes it unless
/// [`Extraction::persist`] was called first.
#[derive(Debug)]
pub struct Extraction {
    pub source: PathBuf,
    pub format: ArchiveFormat,
    pub files: Vec<ExtractedFile>,
    pub skipped: Vec<SkippedEntry>,
    session: Option<TempSession>,
}

impl Extraction {
    pub(crate) fn new(
        source: PathBuf,
        format: ArchiveFormat,
        files: Vec<ExtractedFile>,
        skipped: Vec<SkippedEntry>,
        session: Option<TempSession>,
    ) -> Self {
        Self {
            source,
            format,
            files,
            skipped,
            session,
        }
    }

    pub(crate) fn passthrough(source: PathBuf, file: ExtractedFile) -> Self {
        Self::new(
            source,
            ArchiveFormat::Unrecognized,
            vec![file],
            Vec::new(),
            None,
        )
    }

    pub fn session_root(&self) -> Option<&Path> {
        self.session.as_ref().map(TempSession::root)
    }

    /// Keep the session directory after this extraction is dropped.
    pub fn persist(&mut self) -> Option<PathBuf> {
        self.session.take().map(TempSession::persist)
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// User-facing report of one failed archive.
#[derive(Clone, Debug)]
pub struct Notification {
    pub archive: PathBuf,
    pub format: ArchiveFormat,
    pub message: String,
    pub detail: String,
    pub kind: ErrorKind,
}

impl Notification {
    pub fn from_error(archive: PathBuf, format: ArchiveFormat, error: &Error) -> Self {
        let file_name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| archive.display().to_string());
        let message = match format {
            ArchiveFormat::Unrecognized => format!("Failed to read '{file_name}'"),
            _ => format!(
                "Failed to extract {format} file '{file_name}', please decompress it manually"
            ),
        };
        Self {
            message,
            detail: error.to_string(),
            kind: error.kind(),
            archive,
            format,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of a whole drop batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successful extractions in submission order.
    pub extractions: Vec<Extraction>,
    pub notifications: Vec<Notification>,
}

impl BatchReport {
    pub fn files(&self) -> impl Iterator<Item = &ExtractedFile> {
        self.extractions.iter().flat_map(|e| e.files.iter())
    }

    pub fn is_clean(&self) -> bool {
        self.notifications.is_empty()
    }
}
