use std::path::{Path, PathBuf};

use super::report::ExtractedFile;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// Row shown to the user for one file of a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileItem {
    pub name: String,
    pub path: PathBuf,
    pub size: String,
    pub size_bytes: u64,
    pub is_image: bool,
}

impl FileItem {
    /// Path to hand to a text recognizer, for images only.
    pub fn ocr_target(&self) -> Option<&Path> {
        self.is_image.then_some(self.path.as_path())
    }
}

impl From<&ExtractedFile> for FileItem {
    fn from(file: &ExtractedFile) -> Self {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.relative_name.display().to_string());
        Self {
            name,
            path: file.path.clone(),
            size: human_size(file.size),
            size_bytes: file.size,
            is_image: is_image(&file.path),
        }
    }
}

/// `"0 B"` for zero, otherwise one decimal on a 1024 base.
pub fn human_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|i| ext.eq_ignore_ascii_case(i)))
}
