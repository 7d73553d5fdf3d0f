use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("corrupt archive '{archive}': {reason}")]
    CorruptArchive { archive: PathBuf, reason: String },

    #[error("unsupported archive format: '{path}'")]
    UnsupportedFormat { path: PathBuf },

    #[error("entry '{entry}' escapes the session root")]
    PathTraversalRejected { entry: String },

    #[error("failed to write '{path}': {source}")]
    IoWriteFailure { path: PathBuf, source: io::Error },

    #[error("entry name is not valid {encoding}: {raw:02x?}")]
    DecodeFailure {
        encoding: &'static str,
        raw: Vec<u8>,
    },

    #[error("unknown codepage label '{0}'")]
    UnknownCodepage(String),

    #[error("failed to allocate temp session: {source}")]
    SessionAllocation { source: io::Error },

    #[error("extraction cancelled")]
    Cancelled,

    #[error("extraction worker failed: {reason}")]
    WorkerFailed { reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Fieldless mirror of [`Error`] for matching without destructuring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    CorruptArchive,
    UnsupportedFormat,
    PathTraversalRejected,
    IoWriteFailure,
    DecodeFailure,
    UnknownCodepage,
    SessionAllocation,
    Cancelled,
    WorkerFailed,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CorruptArchive { .. } => ErrorKind::CorruptArchive,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::PathTraversalRejected { .. } => ErrorKind::PathTraversalRejected,
            Self::IoWriteFailure { .. } => ErrorKind::IoWriteFailure,
            Self::DecodeFailure { .. } => ErrorKind::DecodeFailure,
            Self::UnknownCodepage(_) => ErrorKind::UnknownCodepage,
            Self::SessionAllocation { .. } => ErrorKind::SessionAllocation,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::WorkerFailed { .. } => ErrorKind::WorkerFailed,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Errors that only affect a single entry; the archive carries on without it.
    pub fn is_entry_local(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::PathTraversalRejected | ErrorKind::DecodeFailure
        )
    }

    pub(crate) fn corrupt(archive: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::CorruptArchive {
            archive: archive.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
