use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use fident_archive::data::is_image;
use fident_archive::{RecognitionError, TextRecognizer};
use tracing::debug;

const PROGRAM: &str = "tesseract";

/// Drives the `tesseract` executable and reads the text from its stdout.
#[derive(Debug, Default)]
pub struct TesseractCli {
    program: Option<PathBuf>,
}

impl TesseractCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }

    fn locate(&self) -> Result<PathBuf, RecognitionError> {
        match &self.program {
            Some(program) => Ok(program.clone()),
            None => which::which(PROGRAM)
                .map_err(|e| RecognitionError::EngineUnavailable(format!("{PROGRAM}: {e}"))),
        }
    }

    fn command(program: &Path, image: &Path, language: &str, data_dir: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.arg(image)
            .arg("stdout")
            .args(["-l", language])
            .arg("--tessdata-dir")
            .arg(data_dir);
        cmd
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(
        &self,
        image: &Path,
        language: &str,
        data_dir: &Path,
    ) -> Result<String, RecognitionError> {
        if !is_image(image) {
            return Err(RecognitionError::NotAnImage(image.to_path_buf()));
        }

        let program = self.locate()?;
        let mut cmd = Self::command(&program, image, language, data_dir);
        debug!(
            program = %program.display(),
            args = ?cmd.get_args().collect::<Vec<&OsStr>>(),
            "running recognizer"
        );

        let output = cmd.output().map_err(|e| {
            RecognitionError::EngineUnavailable(format!("{}: {e}", program.display()))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Failed(format!(
                "{} exited with {}: {}",
                PROGRAM,
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}
