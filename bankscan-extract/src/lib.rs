//! bankscan-extract: page-level text acquisition for statement PDFs.
//!
//! Two paths per page: the embedded text layer (pdf-extract), and a
//! rasterize-then-recognize fallback over external `pdftoppm` + `tesseract`
//! binaries. Which path wins is decided per page from [`ExtractOptions`];
//! the OCR engine is only a hard requirement in forced-OCR mode.

pub mod native;
pub mod ocr;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub use ocr::OcrEngine;

/// When the OCR path is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrMode {
    /// OCR before the text layer; engine absence is fatal when the text
    /// layer is also insufficient.
    Forced,
    /// Text layer first, OCR only for pages below the character threshold.
    Fallback,
    /// Never invoke OCR; thin pages come back empty.
    Disabled,
}

/// Per-document extraction settings, passed in by the caller.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub ocr: OcrMode,
    /// Tesseract page-segmentation mode, passed through verbatim.
    pub psm: String,
    /// Minimum character count for the text layer to be trusted.
    pub min_native_chars: usize,
    /// Rasterization resolution for the OCR path.
    pub dpi: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            ocr: OcrMode::Fallback,
            // "assume a single uniform block of text"
            psm: "6".to_string(),
            min_native_chars: 64,
            dpi: 300,
        }
    }
}

/// Text obtained for one page.
#[derive(Debug, Clone)]
pub struct PageText {
    pub index: usize,
    pub text: String,
    /// True when the text came from the OCR path.
    pub ocr: bool,
    /// Human-readable degradation note, if any (e.g. OCR skipped because
    /// the engine is not installed).
    pub note: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to read PDF {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error("page rasterization failed: {message}")]
    Render { message: String },

    #[error("OCR run failed: {message}")]
    OcrFailed { message: String },

    #[error("OCR forced but the tesseract binary is not installed")]
    OcrUnavailable,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Per-document text source. Loads the native text layer once up front;
/// OCR runs lazily per page.
pub struct Extractor {
    path: PathBuf,
    options: ExtractOptions,
    native: Vec<String>,
    engine: OcrEngine,
    ocr_available: bool,
}

impl Extractor {
    pub fn open(path: &Path, options: ExtractOptions) -> Result<Self, ExtractError> {
        let page_count = native::page_count(path)?;
        let mut native = native::extract_pages(path).unwrap_or_else(|e| {
            // A broken text layer is not fatal: OCR may still recover pages.
            warn!("text layer extraction failed for {}: {e}", path.display());
            Vec::new()
        });
        native.resize(page_count, String::new());

        let engine = OcrEngine::new(options.psm.clone(), options.dpi);
        let ocr_available = OcrEngine::available();
        debug!(
            "opened {} ({} pages, ocr_available={})",
            path.display(),
            page_count,
            ocr_available
        );

        Ok(Self {
            path: path.to_path_buf(),
            options,
            native,
            engine,
            ocr_available,
        })
    }

    pub fn page_count(&self) -> usize {
        self.native.len()
    }

    /// Obtain text for one page according to the configured OCR mode.
    ///
    /// Errors only on the fatal case: OCR forced, engine missing, and the
    /// text layer below threshold. Everything else degrades to an empty
    /// page with a note.
    pub fn extract_page(&self, index: usize) -> Result<PageText, ExtractError> {
        let native = self.native.get(index).map(String::as_str).unwrap_or("");
        let native_ok = native.trim().chars().count() >= self.options.min_native_chars;

        match self.options.ocr {
            OcrMode::Disabled => Ok(self.native_or_empty(index, native, native_ok, None)),
            OcrMode::Fallback => {
                if native_ok {
                    return Ok(PageText {
                        index,
                        text: native.to_string(),
                        ocr: false,
                        note: None,
                    });
                }
                if !self.ocr_available {
                    let note = format!(
                        "page {}: text layer below threshold and tesseract not installed",
                        index + 1
                    );
                    return Ok(self.native_or_empty(index, native, native_ok, Some(note)));
                }
                Ok(self.run_ocr(index, native, native_ok))
            }
            OcrMode::Forced => {
                if !self.ocr_available {
                    if native_ok {
                        // Degrade to the text layer, but say so.
                        let note = format!(
                            "page {}: OCR forced but unavailable, used text layer",
                            index + 1
                        );
                        return Ok(PageText {
                            index,
                            text: native.to_string(),
                            ocr: false,
                            note: Some(note),
                        });
                    }
                    return Err(ExtractError::OcrUnavailable);
                }
                Ok(self.run_ocr(index, native, native_ok))
            }
        }
    }

    fn run_ocr(&self, index: usize, native: &str, native_ok: bool) -> PageText {
        match self.engine.recognize_page(&self.path, index) {
            Ok(text) if !text.trim().is_empty() => PageText {
                index,
                text,
                ocr: true,
                note: None,
            },
            Ok(_) => {
                let note = format!("page {}: OCR produced no text", index + 1);
                self.native_or_empty(index, native, native_ok, Some(note))
            }
            Err(e) => {
                warn!("OCR failed on page {} of {}: {e}", index + 1, self.path.display());
                let note = format!("page {}: OCR failed ({e})", index + 1);
                self.native_or_empty(index, native, native_ok, Some(note))
            }
        }
    }

    fn native_or_empty(
        &self,
        index: usize,
        native: &str,
        native_ok: bool,
        note: Option<String>,
    ) -> PageText {
        PageText {
            index,
            text: if native_ok { native.to_string() } else { String::new() },
            ocr: false,
            note,
        }
    }

    #[cfg(test)]
    fn from_native_pages(native: Vec<String>, options: ExtractOptions, ocr_available: bool) -> Self {
        let engine = OcrEngine::new(options.psm.clone(), options.dpi);
        Self {
            path: PathBuf::from("test.pdf"),
            options,
            native,
            engine,
            ocr_available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(ocr: OcrMode) -> ExtractOptions {
        ExtractOptions {
            ocr,
            min_native_chars: 10,
            ..ExtractOptions::default()
        }
    }

    #[test]
    fn test_disabled_thin_page_is_empty() {
        let ex = Extractor::from_native_pages(
            vec!["short".to_string()],
            options(OcrMode::Disabled),
            false,
        );
        let page = ex.extract_page(0).unwrap();
        assert!(page.text.is_empty());
        assert!(!page.ocr);
    }

    #[test]
    fn test_disabled_thick_page_uses_text_layer() {
        let ex = Extractor::from_native_pages(
            vec!["a page with plenty of embedded text".to_string()],
            options(OcrMode::Disabled),
            false,
        );
        let page = ex.extract_page(0).unwrap();
        assert!(page.text.contains("embedded text"));
    }

    #[test]
    fn test_fallback_without_engine_degrades_with_note() {
        let ex = Extractor::from_native_pages(
            vec!["tiny".to_string()],
            options(OcrMode::Fallback),
            false,
        );
        let page = ex.extract_page(0).unwrap();
        assert!(page.text.is_empty());
        assert!(page.note.as_deref().unwrap().contains("not installed"));
    }

    #[test]
    fn test_forced_without_engine_and_thin_text_is_fatal() {
        let ex = Extractor::from_native_pages(
            vec!["tiny".to_string()],
            options(OcrMode::Forced),
            false,
        );
        assert!(matches!(
            ex.extract_page(0),
            Err(ExtractError::OcrUnavailable)
        ));
    }

    #[test]
    fn test_forced_without_engine_but_good_text_degrades() {
        let ex = Extractor::from_native_pages(
            vec!["a page with plenty of embedded text".to_string()],
            options(OcrMode::Forced),
            false,
        );
        let page = ex.extract_page(0).unwrap();
        assert!(!page.text.is_empty());
        assert!(page.note.as_deref().unwrap().contains("used text layer"));
    }
}
