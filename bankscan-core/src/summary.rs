//! Fold classified lines into the per-document summary.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::amount::{self, AmountRule};
use crate::config::AnalyzeConfig;
use crate::model::{ClassifiedDocument, Section, Summary, TransactionCandidate};

/// Generic summarizer: deposit lines only, default amount rule.
pub fn summarize_generic(doc: &ClassifiedDocument, config: &AnalyzeConfig) -> Summary {
    summarize(doc, config, "Unknown", false, AmountRule::Leftmost)
}

/// Shared summarization machinery used by both the generic path and the
/// bank profiles. Deterministic: same classified input, same output.
pub fn summarize(
    doc: &ClassifiedDocument,
    config: &AnalyzeConfig,
    processor: &str,
    profile_matched: bool,
    rule: AmountRule,
) -> Summary {
    let mut candidates = Vec::new();
    let mut deposit_total = Decimal::ZERO;
    let mut processor_totals: BTreeMap<&str, Decimal> = BTreeMap::new();

    for line in doc.section_lines(Section::Deposit) {
        if is_excluded(&line.text, &config.exclusions) {
            continue;
        }
        let Some(amount) = amount::deposit_amount(&line.text, rule) else {
            continue;
        };
        deposit_total += amount;
        if let Some(merchant) = mentioned_merchant(&line.text, &config.merchants) {
            *processor_totals.entry(merchant).or_default() += amount;
        }
        candidates.push(TransactionCandidate {
            page: line.page,
            position: line.position,
            amount,
            line: line.text.clone(),
        });
    }

    let mut withdrawal_total = Decimal::ZERO;
    let mut saw_withdrawal = false;
    for line in doc.section_lines(Section::Withdrawal) {
        if let Some(amount) = amount::withdrawal_amount(&line.text, rule) {
            withdrawal_total += amount;
            saw_withdrawal = true;
        }
    }

    Summary {
        source: doc.source.clone(),
        processor: processor.to_string(),
        profile_matched,
        deposit_count: candidates.len(),
        deposit_total,
        withdrawal_total: saw_withdrawal.then_some(withdrawal_total),
        linked_account: linked_account(&doc.full_text),
        processor_totals: processor_totals
            .into_iter()
            .map(|(name, total)| (name.to_string(), total))
            .collect(),
        candidates,
        empty_pages: doc.empty_pages.clone(),
        notes: Vec::new(),
    }
}

fn is_excluded(line: &str, exclusions: &[String]) -> bool {
    if exclusions.is_empty() {
        return false;
    }
    let lower = line.to_lowercase();
    exclusions.iter().any(|e| lower.contains(&e.to_lowercase()))
}

fn mentioned_merchant<'a>(line: &str, merchants: &'a [String]) -> Option<&'a str> {
    let lower = line.to_lowercase();
    merchants
        .iter()
        .find(|m| lower.contains(&m.to_lowercase()))
        .map(String::as_str)
}

fn account_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Digits (possibly masked) within reach of account-header text.
        Regex::new(r"(?i)account(?:\s+(?:number|no\.?|#))?\s*[:#]?\s*[xX*\u{2022}\s]*(?P<digits>\d{4,17})")
            .expect("account number regex")
    })
}

/// Best-effort scan for a linked account identifier near account-header
/// text. Reported as the last four digits; absence is not an error.
fn linked_account(text: &str) -> Option<String> {
    let caps = account_re().captures(text)?;
    let digits = caps.name("digits")?.as_str();
    let last4: String = digits
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    Some(last4)
}
