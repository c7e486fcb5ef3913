//! Analysis configuration, passed explicitly into the entry point.
//!
//! No environment variables: concurrent analyses with different settings
//! must not see each other's state.

use bankscan_extract::{ExtractOptions, OcrMode};

#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// When the OCR path runs (forced, fallback, never).
    pub ocr: OcrMode,
    /// Tesseract page-segmentation mode, passed through verbatim.
    pub ocr_psm: String,
    /// Text-layer character count below which a page triggers OCR fallback.
    pub min_native_chars: usize,
    /// Rasterization resolution for the OCR path.
    pub dpi: u32,
    /// Lines longer than this are never header candidates.
    pub max_header_len: usize,
    /// Write the headers/deposit-lines debug files next to the PDF.
    pub write_diagnostics: bool,
    /// Merchant processors to attribute deposits to.
    pub merchants: Vec<String>,
    /// Entities whose lines must never be counted as deposits.
    pub exclusions: Vec<String>,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            ocr: OcrMode::Fallback,
            ocr_psm: "6".to_string(),
            min_native_chars: 64,
            dpi: 300,
            max_header_len: 64,
            write_diagnostics: true,
            merchants: [
                "Square", "Stripe", "Intuit", "Coinbase", "Etsy", "PayPal", "Venmo",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            exclusions: Vec::new(),
        }
    }
}

impl AnalyzeConfig {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            ocr: self.ocr,
            psm: self.ocr_psm.clone(),
            min_native_chars: self.min_native_chars,
            dpi: self.dpi,
        }
    }
}
