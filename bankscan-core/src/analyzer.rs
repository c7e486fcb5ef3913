//! Analysis entry point: extract → classify → dispatch → summarize.
//!
//! One call is a self-contained computation over one PDF; the only side
//! effect is the diagnostics sink. Page text is gathered first, then a
//! single sequential classification pass runs over the page order because
//! section state carries across page boundaries.

use std::path::{Path, PathBuf};

use bankscan_extract::{Extractor, PageText};
use tracing::{debug, info, warn};

use crate::config::AnalyzeConfig;
use crate::error::AnalyzeError;
use crate::headers::HeaderClassifier;
use crate::model::{Document, Page, Summary};
use crate::profiles::ProfileRegistry;
use crate::summary::summarize_generic;
use crate::{diagnostics, profiles::ProcessorProfile};

/// Progress notification for callers that report per page or per document.
#[derive(Debug, Clone)]
pub enum Progress {
    DocumentStarted { path: PathBuf, pages: usize },
    PageExtracted { index: usize, pages: usize, ocr: bool, empty: bool },
    DocumentFinished { path: PathBuf },
}

/// Analyze one statement PDF.
pub fn analyze(path: &Path, config: &AnalyzeConfig) -> Result<Summary, AnalyzeError> {
    analyze_with_progress(path, config, &|_| {})
}

/// Analyze one statement PDF, reporting progress through `on_progress`.
///
/// The callback runs on the calling thread; callers needing a responsive
/// UI should run the whole call on a worker and forward events over a
/// channel.
pub fn analyze_with_progress(
    path: &Path,
    config: &AnalyzeConfig,
    on_progress: &(dyn Fn(&Progress) + Send + Sync),
) -> Result<Summary, AnalyzeError> {
    let map_err = |e| AnalyzeError::from_extract(path.to_path_buf(), e);
    let extractor = Extractor::open(path, config.extract_options()).map_err(map_err)?;
    let pages = extractor.page_count();
    on_progress(&Progress::DocumentStarted {
        path: path.to_path_buf(),
        pages,
    });

    let mut notes = Vec::new();
    let mut document = Document {
        source: path.to_path_buf(),
        pages: Vec::with_capacity(pages),
    };
    for index in 0..pages {
        let page_text = extractor.extract_page(index).map_err(map_err)?;
        if let Some(note) = &page_text.note {
            notes.push(note.clone());
        }
        let page = Page::from_text(index, &page_text.text, page_text.ocr);
        on_progress(&Progress::PageExtracted {
            index,
            pages,
            ocr: page.from_ocr,
            empty: page.is_empty(),
        });
        document.pages.push(page);
    }

    let summary = summarize_document(document, config, &mut notes)?;
    on_progress(&Progress::DocumentFinished {
        path: path.to_path_buf(),
    });
    Ok(summary)
}

/// The pure tail of the pipeline, shared with tests: classify the gathered
/// pages, pick a profile, summarize, write diagnostics.
fn summarize_document(
    document: Document,
    config: &AnalyzeConfig,
    notes: &mut Vec<String>,
) -> Result<Summary, AnalyzeError> {
    if document.pages.iter().all(|p| p.is_empty()) {
        return Err(AnalyzeError::NoExtractableText {
            path: document.source.clone(),
        });
    }

    let full_text = document.full_text();
    let registry = ProfileRegistry::builtin();
    let profile = registry.select(&full_text);
    match profile {
        Some(p) => debug!("{}: matched profile {}", document.source.display(), p.name()),
        None => {
            debug!("{}: no profile matched, generic path", document.source.display());
            notes.push("no processor profile matched; generic summarizer used".to_string());
        }
    }

    let mut classifier = HeaderClassifier::new(config.max_header_len);
    if let Some(p) = profile {
        classifier = classifier.with_extra(p.extra_headers());
    }
    let classified = classifier.classify(&document);

    let mut summary = match profile {
        Some(p) => p.summarize(&classified, config),
        None => summarize_generic(&classified, config),
    };
    summary.notes.append(notes);

    if config.write_diagnostics {
        match diagnostics::write_debug_files(&classified, &summary) {
            Ok(dir) => debug!("diagnostics written to {}", dir.display()),
            Err(e) => {
                warn!(
                    "failed to write diagnostics for {}: {e}",
                    summary.source.display()
                );
                summary
                    .notes
                    .push(format!("diagnostics write failed: {e}"));
            }
        }
    }

    info!(
        "{}: {} deposits totaling {} (processor: {})",
        summary.source.display(),
        summary.deposit_count,
        summary.deposit_total,
        summary.processor
    );
    Ok(summary)
}

/// Build a document from already-extracted page text. Used by callers that
/// obtained text elsewhere and by tests.
pub fn analyze_pages(
    source: &Path,
    pages: Vec<PageText>,
    config: &AnalyzeConfig,
) -> Result<Summary, AnalyzeError> {
    let mut notes = Vec::new();
    let document = Document {
        source: source.to_path_buf(),
        pages: pages
            .iter()
            .map(|p| {
                if let Some(note) = &p.note {
                    notes.push(note.clone());
                }
                Page::from_text(p.index, &p.text, p.ocr)
            })
            .collect(),
    };
    summarize_document(document, config, &mut notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn page(index: usize, text: &str) -> PageText {
        PageText {
            index,
            text: text.to_string(),
            ocr: false,
            note: None,
        }
    }

    fn config() -> AnalyzeConfig {
        AnalyzeConfig {
            write_diagnostics: false,
            ..AnalyzeConfig::default()
        }
    }

    #[test]
    fn test_deposit_section_counted_end_to_end() {
        let summary = analyze_pages(
            Path::new("a.pdf"),
            vec![page(
                0,
                "Deposits and Credits\n04/01 Mobile Deposit  $125.00  1,204.50\n04/03 Check Deposit  $60.00  1,264.50",
            )],
            &config(),
        )
        .unwrap();
        assert_eq!(summary.deposit_count, 2);
        assert_eq!(summary.deposit_total, dec!(185.00));
    }

    #[test]
    fn test_document_without_headers_is_not_an_error() {
        let summary = analyze_pages(
            Path::new("b.pdf"),
            vec![page(0, "just an unremarkable page of text")],
            &config(),
        )
        .unwrap();
        assert_eq!(summary.deposit_count, 0);
        assert_eq!(summary.processor, "Unknown");
        assert!(!summary.profile_matched);
        assert!(summary.notes.iter().any(|n| n.contains("no processor profile")));
    }

    #[test]
    fn test_one_empty_page_is_tolerated() {
        let summary = analyze_pages(
            Path::new("c.pdf"),
            vec![
                page(0, ""),
                page(1, "Deposits and Credits\n04/01 payroll 10.00"),
            ],
            &config(),
        )
        .unwrap();
        assert_eq!(summary.empty_pages, vec![0]);
        assert_eq!(summary.deposit_count, 1);
    }

    #[test]
    fn test_all_pages_empty_is_fatal() {
        let err = analyze_pages(
            Path::new("d.pdf"),
            vec![page(0, ""), page(1, "  \n ")],
            &config(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalyzeError::NoExtractableText { .. }));
        assert_eq!(err.path(), Path::new("d.pdf"));
    }

    #[test]
    fn test_profile_dispatch_uses_bank_headers() {
        let summary = analyze_pages(
            Path::new("chase.pdf"),
            vec![page(
                0,
                "JPMorgan Chase Bank, N.A.\nDEPOSITS AND ADDITIONS\n04/01 Remote Online Deposit  1,500.00\nELECTRONIC WITHDRAWALS\n04/02 Utility Payment  200.00",
            )],
            &config(),
        )
        .unwrap();
        assert_eq!(summary.processor, "Chase");
        assert!(summary.profile_matched);
        assert_eq!(summary.deposit_count, 1);
        assert_eq!(summary.deposit_total, dec!(1500.00));
        assert_eq!(summary.withdrawal_total, Some(dec!(200.00)));
    }

    #[test]
    fn test_rightmost_profile_override() {
        let summary = analyze_pages(
            Path::new("wf.pdf"),
            vec![page(
                0,
                "Wells Fargo Everyday Checking\nDeposits/Additions\n04/01 1,204.50  eDeposit  125.00",
            )],
            &config(),
        )
        .unwrap();
        assert_eq!(summary.processor, "Wells Fargo");
        assert_eq!(summary.deposit_total, dec!(125.00));
    }

    #[test]
    fn test_idempotent_summaries() {
        let pages = vec![page(
            0,
            "Deposits and Credits\n04/01 Square payout  100.00\n04/02 Stripe transfer  50.00",
        )];
        let a = analyze_pages(Path::new("e.pdf"), pages.clone(), &config()).unwrap();
        let b = analyze_pages(Path::new("e.pdf"), pages, &config()).unwrap();
        assert_eq!(a, b);
    }
}
