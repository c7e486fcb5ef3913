//! Audit artifacts written next to the analyzed PDF.
//!
//! Two ordered text files per statement, in a `<stem>_analysis/` sibling
//! directory: the lines recognized as section headers, and the lines
//! counted as deposits. Write failures are the caller's to log; they never
//! fail the analysis.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::model::{ClassifiedDocument, Summary};

pub const HEADERS_FILE: &str = "headers_debug.txt";
pub const DEPOSITS_FILE: &str = "deposit_lines_debug.txt";

/// Output directory for one statement: `/path/Statement.pdf` →
/// `/path/Statement_analysis/`.
pub fn output_dir(pdf_path: &Path) -> PathBuf {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement".to_string());
    let parent = pdf_path.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{stem}_analysis"))
}

/// Write both debug files. The file handles are scoped to this call and
/// closed on every exit path.
pub fn write_debug_files(doc: &ClassifiedDocument, summary: &Summary) -> io::Result<PathBuf> {
    let dir = output_dir(&doc.source);
    fs::create_dir_all(&dir)?;
    write_headers_file(doc, &dir.join(HEADERS_FILE))?;
    write_deposits_file(summary, &dir.join(DEPOSITS_FILE))?;
    Ok(dir)
}

fn write_headers_file(doc: &ClassifiedDocument, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(
        out,
        "# header lines recognized in {} ({})",
        doc.source.display(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    for h in &doc.headers {
        writeln!(
            out,
            "page {} line {} [{:?}] matched {:?}: {}",
            h.page + 1,
            h.position + 1,
            h.section,
            h.phrase,
            h.line.trim()
        )?;
    }
    out.flush()
}

fn write_deposits_file(summary: &Summary, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(
        out,
        "# deposit lines counted in {} ({})",
        summary.source.display(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    for c in &summary.candidates {
        writeln!(
            out,
            "page {} line {} amount {}: {}",
            c.page + 1,
            c.position + 1,
            c.amount,
            c.line.trim()
        )?;
    }
    writeln!(
        out,
        "# total: {} deposits, {}",
        summary.deposit_count, summary.deposit_total
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzeConfig;
    use crate::headers::HeaderClassifier;
    use crate::model::{Document, Page};
    use crate::summary::summarize_generic;

    #[test]
    fn test_writes_both_files() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("April.pdf");
        let doc = Document {
            source: source.clone(),
            pages: vec![Page::from_text(
                0,
                "Deposits and Credits\n04/01 Mobile Deposit  $125.00  1,204.50",
                false,
            )],
        };
        let classified = HeaderClassifier::new(64).classify(&doc);
        let summary = summarize_generic(&classified, &AnalyzeConfig::default());

        let dir = write_debug_files(&classified, &summary).unwrap();
        assert_eq!(dir, tmp.path().join("April_analysis"));

        let headers = std::fs::read_to_string(dir.join(HEADERS_FILE)).unwrap();
        assert!(headers.contains("Deposits and Credits"));

        let deposits = std::fs::read_to_string(dir.join(DEPOSITS_FILE)).unwrap();
        assert!(deposits.contains("125.00"));
        assert!(deposits.contains("# total: 1 deposits"));
    }

    #[test]
    fn test_unwritable_directory_errors_without_panicking() {
        // Use a regular file where a directory is needed.
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let doc = Document {
            source: blocker.join("deep").join("April.pdf"),
            pages: vec![],
        };
        let classified = HeaderClassifier::new(64).classify(&doc);
        let summary = summarize_generic(&classified, &AnalyzeConfig::default());
        assert!(write_debug_files(&classified, &summary).is_err());
    }
}
