//! Extraction of dropped ZIP, RAR and 7z archives into isolated temp sessions.
//!
//! # Architecture
//!
//! - `format.rs` - Extension-based format detection
//! - `sanitize.rs` - Entry name decoding and path sanitization
//! - `session.rs` - Per-archive temp directories
//! - `extract/` - Per-format handlers and dispatch
//! - `batch.rs` - Concurrent extraction of a drop batch
//! - `data/` - Shared types
//! - `ocr.rs` - Interface to an external text recognizer

pub use batch::{ArchiveExtractor, BatchEvent};
pub use data::{
    ArchiveEntry, BatchReport, EntryName, ExtractedFile, Extraction, FileItem, Notification,
    SkippedEntry, human_size,
};
pub use error::{Error, ErrorKind, Result};
pub use extract::{FormatHandler, dispatch};
pub use format::ArchiveFormat;
pub use ocr::{RecognitionError, TextRecognizer};
pub use options::ExtractOptions;
pub use sanitize::{SanitizedPath, decode_name, resolve, sanitize_name};
pub use session::TempSession;

pub use tokio_util::sync::CancellationToken;

pub mod batch;
pub mod data;
mod error;
pub mod extract;
mod format;
pub mod ocr;
pub mod options;
mod sanitize;
mod session;
