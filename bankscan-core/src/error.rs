//! Error taxonomy for one document analysis.
//!
//! Only whole-document data absence is fatal; line- and page-level
//! failures degrade inside the pipeline. Diagnostics-write failures are
//! logged and noted on the summary, never returned as errors.

use std::path::PathBuf;

use bankscan_extract::ExtractError;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// Every page yielded empty text under both extraction paths.
    #[error("no extractable text in {path}: every page came back empty")]
    NoExtractableText { path: PathBuf },

    /// OCR-first was requested but the engine is not installed and the
    /// text layer is insufficient.
    #[error("OCR forced for {path} but the tesseract binary is not installed")]
    OcrUnavailable { path: PathBuf },

    #[error("extraction failed for {path}: {source}")]
    Extract {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },
}

impl AnalyzeError {
    pub(crate) fn from_extract(path: PathBuf, source: ExtractError) -> Self {
        match source {
            ExtractError::OcrUnavailable => AnalyzeError::OcrUnavailable { path },
            source => AnalyzeError::Extract { path, source },
        }
    }

    /// Which document this failure belongs to.
    pub fn path(&self) -> &PathBuf {
        match self {
            AnalyzeError::NoExtractableText { path }
            | AnalyzeError::OcrUnavailable { path }
            | AnalyzeError::Extract { path, .. } => path,
        }
    }
}
