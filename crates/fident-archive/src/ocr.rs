use std::path::Path;

pub const DEFAULT_LANGUAGE: &str = "chi_sim";
pub const DEFAULT_DATA_DIR: &str = "./tessdata";

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("'{0}' is not an image")]
    NotAnImage(std::path::PathBuf),

    #[error("recognition engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("recognition failed: {0}")]
    Failed(String),
}

/// External OCR engine fed with extracted images.
pub trait TextRecognizer {
    fn recognize(
        &self,
        image: &Path,
        language: &str,
        data_dir: &Path,
    ) -> Result<String, RecognitionError>;
}
