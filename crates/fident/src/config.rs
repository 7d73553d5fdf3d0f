use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use fident_archive::ExtractOptions;
use fident_archive::ocr::{DEFAULT_DATA_DIR, DEFAULT_LANGUAGE};
use fident_archive::options::DEFAULT_CODEPAGE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::{DropArg, OcrArg};

pub const CONFIG_FILE: &str = "fident.toml";
pub const ENV_PREFIX: &str = "FIDENT_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file '{0}' does not exist")]
    Missing(PathBuf),
    #[error(transparent)]
    Figment(#[from] figment::Error),
    #[error(transparent)]
    Archive(#[from] fident_archive::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub codepage: String,
    /// Unset means one extraction per available core.
    pub max_concurrent: Option<usize>,
    pub temp_root: Option<PathBuf>,
    pub keep_sessions: bool,
    /// Recognizer executable; looked up on `PATH` when unset.
    pub tesseract: Option<PathBuf>,
    pub tessdata: PathBuf,
    pub ocr_language: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            codepage: DEFAULT_CODEPAGE.to_string(),
            max_concurrent: None,
            temp_root: None,
            keep_sessions: false,
            tesseract: None,
            tessdata: PathBuf::from(DEFAULT_DATA_DIR),
            ocr_language: DEFAULT_LANGUAGE.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then the config file, then `FIDENT_*` variables.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Ok(Self::figment(explicit)?.extract()?)
    }

    pub fn figment(explicit: Option<&Path>) -> Result<Figment, ConfigError> {
        let file = match explicit {
            Some(path) if !path.is_file() => return Err(ConfigError::Missing(path.to_path_buf())),
            Some(path) => Toml::file(path),
            None => Toml::file(CONFIG_FILE),
        };
        Ok(Figment::from(Serialized::defaults(Config::default()))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn apply_drop(mut self, arg: &DropArg) -> Self {
        if let Some(codepage) = &arg.codepage {
            self.codepage = codepage.clone();
        }
        if let Some(n) = arg.max_concurrent {
            self.max_concurrent = Some(n);
        }
        if let Some(root) = &arg.temp_root {
            self.temp_root = Some(root.clone());
        }
        self.keep_sessions |= arg.keep;
        self
    }

    pub fn apply_ocr(mut self, arg: &OcrArg) -> Self {
        if let Some(lang) = &arg.lang {
            self.ocr_language = lang.clone();
        }
        if let Some(dir) = &arg.tessdata {
            self.tessdata = dir.clone();
        }
        self
    }

    pub fn extract_options(&self) -> Result<ExtractOptions, ConfigError> {
        let mut options = ExtractOptions::default().codepage_label(&self.codepage)?;
        if let Some(n) = self.max_concurrent {
            options = options.max_concurrent(n);
        }
        if let Some(root) = &self.temp_root {
            options = options.temp_root(root);
        }
        Ok(options)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
