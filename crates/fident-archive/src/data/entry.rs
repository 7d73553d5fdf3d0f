use std::borrow::Cow;

use encoding_rs::Encoding;

use crate::error::Result;
use crate::sanitize::decode_name;

/// Entry name as the decoder hands it over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryName {
    /// Raw bytes in an unknown encoding (ZIP without the UTF-8 flag).
    Bytes(Vec<u8>),
    /// Already decoded by the format library.
    Text(String),
}

impl EntryName {
    pub fn decode(&self, codepage: &'static Encoding) -> Result<Cow<'_, str>> {
        match self {
            Self::Bytes(raw) => decode_name(raw, codepage),
            Self::Text(name) => Ok(Cow::Borrowed(name)),
        }
    }

    /// Best-effort rendering for log lines and skip records.
    pub fn display_lossy(&self) -> Cow<'_, str> {
        match self {
            Self::Bytes(raw) => String::from_utf8_lossy(raw),
            Self::Text(name) => Cow::Borrowed(name),
        }
    }
}

/// One file or directory inside an archive, before materialization.
#[derive(Clone, Debug)]
pub struct ArchiveEntry {
    pub name: EntryName,
    pub size: u64,
    pub is_directory: bool,
}

impl ArchiveEntry {
    pub fn file(name: EntryName, size: u64) -> Self {
        Self {
            name,
            size,
            is_directory: false,
        }
    }

    pub fn directory(name: EntryName) -> Self {
        Self {
            name,
            size: 0,
            is_directory: true,
        }
    }
}
