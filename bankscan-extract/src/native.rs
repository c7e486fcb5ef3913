//! Embedded text-layer extraction (pdf-extract) and page counting (lopdf).

use std::path::Path;

use crate::ExtractError;

pub fn page_count(path: &Path) -> Result<usize, ExtractError> {
    let doc = lopdf::Document::load(path).map_err(|e| ExtractError::Pdf {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(doc.get_pages().len())
}

/// Extract the text layer of every page, in page order.
///
/// Pages without a text layer come back as empty strings; a scanned
/// statement typically yields all-empty output here.
pub fn extract_pages(path: &Path) -> Result<Vec<String>, ExtractError> {
    pdf_extract::extract_text_by_pages(path).map_err(|e| ExtractError::Pdf {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
