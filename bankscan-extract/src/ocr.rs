//! Rasterize-and-recognize OCR path over external binaries.
//!
//! One page at a time: `pdftoppm` renders the page to a PNG in a scratch
//! directory, then `tesseract <png> stdout --psm <mode>` recognizes it.
//! Both tools block for the duration of the call; callers own any timeout.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::ExtractError;

#[derive(Debug, Clone)]
pub struct OcrEngine {
    psm: String,
    dpi: u32,
}

impl OcrEngine {
    pub fn new(psm: String, dpi: u32) -> Self {
        Self { psm, dpi }
    }

    /// Whether the OCR engine binary is installed.
    pub fn available() -> bool {
        which::which("tesseract").is_ok()
    }

    /// Render one page and run the recognizer over it.
    pub fn recognize_page(&self, pdf_path: &Path, page_idx: usize) -> Result<String, ExtractError> {
        let scratch = tempfile::tempdir()?;
        let image = self.rasterize(pdf_path, page_idx, scratch.path())?;
        self.recognize(&image)
    }

    fn rasterize(
        &self,
        pdf_path: &Path,
        page_idx: usize,
        out_dir: &Path,
    ) -> Result<PathBuf, ExtractError> {
        // pdftoppm uses 1-based page indices
        let page_number = page_idx + 1;
        let prefix = out_dir.join("page");

        let status = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(page_number.to_string())
            .arg("-l")
            .arg(page_number.to_string())
            .arg(pdf_path)
            .arg(&prefix)
            .status()
            .map_err(|e| ExtractError::Render {
                message: format!("failed to invoke pdftoppm (is poppler-utils installed?): {e}"),
            })?;

        if !status.success() {
            return Err(ExtractError::Render {
                message: format!("pdftoppm exited with status {status}"),
            });
        }

        // pdftoppm picks its own page-number padding; take whatever PNG it wrote.
        for entry in std::fs::read_dir(out_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "png") {
                debug!("rasterized page {page_number} to {}", path.display());
                return Ok(path);
            }
        }

        Err(ExtractError::Render {
            message: format!("pdftoppm produced no image for page {page_number}"),
        })
    }

    fn recognize(&self, image: &Path) -> Result<String, ExtractError> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .arg("--psm")
            .arg(&self.psm)
            .output()
            .map_err(|e| ExtractError::OcrFailed {
                message: format!("failed to invoke tesseract: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::OcrFailed {
                message: format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
