use std::path::PathBuf;

use encoding_rs::Encoding;

use crate::error::{Error, Result};

/// Codepage used for ZIP entry names that are not UTF-8.
pub const DEFAULT_CODEPAGE: &str = "GBK";

const FALLBACK_CONCURRENCY: usize = 4;

#[derive(Clone, Debug)]
pub struct ExtractOptions {
    pub codepage: &'static Encoding,
    pub temp_root: Option<PathBuf>,
    pub max_concurrent: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            codepage: encoding_rs::GBK,
            temp_root: None,
            max_concurrent: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(FALLBACK_CONCURRENCY),
        }
    }
}

impl ExtractOptions {
    pub fn codepage(mut self, encoding: &'static Encoding) -> Self {
        self.codepage = encoding;
        self
    }

    /// Select the codepage by WHATWG label, e.g. `"gbk"`, `"shift_jis"`, `"big5"`.
    pub fn codepage_label(self, label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::UnknownCodepage(label.to_string()))?;
        Ok(self.codepage(encoding))
    }

    pub fn temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    pub fn max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }
}
