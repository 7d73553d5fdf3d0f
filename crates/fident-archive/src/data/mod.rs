pub mod entry;
pub mod item;
pub mod report;

pub use entry::{ArchiveEntry, EntryName};
pub use item::{FileItem, human_size, is_image};
pub use report::{BatchReport, ExtractedFile, Extraction, Notification, SkippedEntry};
