//! Data model for one statement analysis run.
//!
//! All entities are built fresh per run from one input PDF and discarded
//! after the summary and diagnostics are produced; nothing here is shared
//! across documents.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Semantic region of a statement a line belongs to.
///
/// Assignment is monotonic with line position: a header line opens a
/// section and every following line inherits it (across page boundaries)
/// until the next header.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Deposit,
    Withdrawal,
    Other,
    Unclassified,
}

/// One line of page text. Position is the sole ordering key within a page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Line {
    pub position: usize,
    pub text: String,
}

/// A page of extracted text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub index: usize,
    pub lines: Vec<Line>,
    /// True when the text came from the OCR path rather than the PDF
    /// text layer.
    pub from_ocr: bool,
}

impl Page {
    pub fn from_text(index: usize, text: &str, from_ocr: bool) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(position, text)| Line {
                position,
                text: text.to_string(),
            })
            .collect();
        Self {
            index,
            lines,
            from_ocr,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.text.trim().is_empty())
    }
}

/// An ordered sequence of pages, identified by its source path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub source: PathBuf,
    pub pages: Vec<Page>,
}

impl Document {
    /// Whole-document text, used by profile detection and the
    /// linked-account scan.
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            for line in &page.lines {
                out.push_str(&line.text);
                out.push('\n');
            }
        }
        out
    }
}

/// A line recognized as a section header, kept for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeaderMatch {
    pub page: usize,
    pub position: usize,
    /// The keyword phrase that matched.
    pub phrase: String,
    pub section: Section,
    /// The full line text as it appeared.
    pub line: String,
}

/// One counted deposit line with its extracted amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionCandidate {
    pub page: usize,
    pub position: usize,
    pub amount: Decimal,
    pub line: String,
}

/// A line together with the section it was assigned to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifiedLine {
    pub page: usize,
    pub position: usize,
    pub section: Section,
    pub text: String,
}

/// Output of the sequential classification pass over one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifiedDocument {
    pub source: PathBuf,
    pub lines: Vec<ClassifiedLine>,
    pub headers: Vec<HeaderMatch>,
    /// Pages that yielded no text under the allowed extraction paths.
    pub empty_pages: Vec<usize>,
    /// Pages whose text came from OCR.
    pub ocr_pages: Vec<usize>,
    /// Whole-document text, for detection predicates and account scans.
    pub full_text: String,
}

impl ClassifiedDocument {
    /// Iterate lines assigned to the given section.
    pub fn section_lines(&self, section: Section) -> impl Iterator<Item = &ClassifiedLine> {
        self.lines.iter().filter(move |l| l.section == section)
    }
}

/// Per-document analysis result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub source: PathBuf,
    /// Detected processor/bank name, or "Unknown".
    pub processor: String,
    /// False when the generic summarizer ran.
    pub profile_matched: bool,
    pub deposit_count: usize,
    pub deposit_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawal_total: Option<Decimal>,
    /// Linked account identifier (last four digits), when recoverable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_account: Option<String>,
    /// Deposit totals attributed to known merchant processors.
    pub processor_totals: Vec<(String, Decimal)>,
    /// The deposit lines that were counted, for audit.
    pub candidates: Vec<TransactionCandidate>,
    pub empty_pages: Vec<usize>,
    /// Informational notes (OCR degradation, diagnostics failures, ...).
    pub notes: Vec<String>,
}
