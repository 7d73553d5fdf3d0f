use std::fmt;
use std::path::Path;

/// What a dropped file is, decided once from its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    Zip,
    Rar,
    SevenZ,
    Unrecognized,
}

impl ArchiveFormat {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let Some(ext) = path.as_ref().extension() else {
            return Self::Unrecognized;
        };
        let ext = ext.to_string_lossy();
        if ext.eq_ignore_ascii_case("zip") {
            Self::Zip
        } else if ext.eq_ignore_ascii_case("rar") {
            Self::Rar
        } else if ext.eq_ignore_ascii_case("7z") {
            Self::SevenZ
        } else {
            Self::Unrecognized
        }
    }

    /// Prefix tag for the session directory of this format.
    pub fn session_tag(self) -> &'static str {
        match self {
            Self::Zip => "unzipped",
            Self::Rar => "unrar",
            Self::SevenZ => "sevenzip",
            Self::Unrecognized => "passthrough",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "ZIP",
            Self::Rar => "RAR",
            Self::SevenZ => "7z",
            Self::Unrecognized => "file",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
