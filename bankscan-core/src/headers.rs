//! Section-header recognition and the sequential classification pass.
//!
//! A line is a header candidate only when it is short; matching is
//! case/punctuation-insensitive. Single-token keywords require an exact
//! word match ("Credits" must not fire inside "Accredits"); multi-word
//! phrases tolerate a small edit distance to survive OCR noise.

use crate::model::{
    ClassifiedDocument, ClassifiedLine, Document, HeaderMatch, Page, Section,
};

/// Deposit/credit section openers.
const DEPOSIT_HEADERS: &[&str] = &[
    "Deposits and Credits",
    "Deposits/Credits",
    "Credits(+)",
    "Direct Deposit",
    "Mobile Deposit",
    "Check Deposit",
    "Cash Deposit",
];

/// Withdrawal/debit section openers.
const WITHDRAWAL_HEADERS: &[&str] = &[
    "Withdrawals and Debits",
    "Withdrawals/Debits",
    "Debits(-)",
    "Checks Paid",
    "ATM/Debit Card Withdrawals",
];

/// Headers that open a section we must not count from (running balances,
/// fees). Anything matched here resets the active section to Other.
const OTHER_HEADERS: &[&str] = &[
    "Daily Balance",
    "Daily Ending Balance",
    "Daily Balance Summary",
    "Service Charges",
    "Service Fees",
    "Account Summary",
    "Interest Summary",
];

#[derive(Debug, Clone)]
struct HeaderPhrase {
    display: String,
    words: Vec<String>,
    section: Section,
}

#[derive(Debug, Clone)]
pub struct HeaderClassifier {
    phrases: Vec<HeaderPhrase>,
    max_header_len: usize,
}

impl HeaderClassifier {
    pub fn new(max_header_len: usize) -> Self {
        let mut phrases = Vec::new();
        for (set, section) in [
            (DEPOSIT_HEADERS, Section::Deposit),
            (WITHDRAWAL_HEADERS, Section::Withdrawal),
            (OTHER_HEADERS, Section::Other),
        ] {
            for display in set {
                phrases.push(HeaderPhrase {
                    display: display.to_string(),
                    words: normalize_words(display),
                    section,
                });
            }
        }
        Self {
            phrases,
            max_header_len,
        }
    }

    /// Register bank-specific header phrasing ahead of the builtin tables.
    pub fn with_extra(mut self, extra: &[(&str, Section)]) -> Self {
        let mut added: Vec<HeaderPhrase> = extra
            .iter()
            .map(|(display, section)| HeaderPhrase {
                display: display.to_string(),
                words: normalize_words(display),
                section: *section,
            })
            .collect();
        added.append(&mut self.phrases);
        self.phrases = added;
        self
    }

    /// Test one line against the header tables. Returns the matched phrase
    /// and the section it opens.
    pub fn match_line(&self, text: &str) -> Option<(String, Section)> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.chars().count() > self.max_header_len {
            return None;
        }
        let words = normalize_words(trimmed);
        if words.is_empty() {
            return None;
        }

        for phrase in &self.phrases {
            if phrase_matches(&phrase.words, &words) {
                return Some((phrase.display.clone(), phrase.section));
            }
        }
        None
    }

    /// Single sequential pass over every page in order. Section state is an
    /// explicit accumulator that survives page boundaries; before the first
    /// header everything is Unclassified.
    pub fn classify(&self, document: &Document) -> ClassifiedDocument {
        let mut active = Section::Unclassified;
        let mut lines = Vec::new();
        let mut headers = Vec::new();
        let mut empty_pages = Vec::new();
        let mut ocr_pages = Vec::new();

        for page in &document.pages {
            if page.is_empty() {
                empty_pages.push(page.index);
            }
            if page.from_ocr {
                ocr_pages.push(page.index);
            }
            self.classify_page(page, &mut active, &mut lines, &mut headers);
        }

        ClassifiedDocument {
            source: document.source.clone(),
            lines,
            headers,
            empty_pages,
            ocr_pages,
            full_text: document.full_text(),
        }
    }

    fn classify_page(
        &self,
        page: &Page,
        active: &mut Section,
        lines: &mut Vec<ClassifiedLine>,
        headers: &mut Vec<HeaderMatch>,
    ) {
        for line in &page.lines {
            if let Some((phrase, section)) = self.match_line(&line.text) {
                headers.push(HeaderMatch {
                    page: page.index,
                    position: line.position,
                    phrase,
                    section,
                    line: line.text.clone(),
                });
                *active = section;
                // The header line itself belongs to the section it opens.
            }
            lines.push(ClassifiedLine {
                page: page.index,
                position: line.position,
                section: *active,
                text: line.text.clone(),
            });
        }
    }
}

/// Lowercase, strip punctuation to spaces, split into words.
fn normalize_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn phrase_matches(phrase: &[String], line: &[String]) -> bool {
    match phrase.len() {
        0 => false,
        // Short tokens: exact word-boundary match only.
        1 => line.iter().any(|w| w == &phrase[0]),
        n => {
            if line.len() < n {
                return false;
            }
            let target = phrase.join(" ");
            let budget = edit_budget(&target);
            line.windows(n)
                .any(|window| levenshtein(&window.join(" "), &target) <= budget)
        }
    }
}

/// Allowed edit distance for a fuzzy phrase match.
fn edit_budget(phrase: &str) -> usize {
    (phrase.chars().count() / 10).clamp(1, 2)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn doc(pages: &[&str]) -> Document {
        Document {
            source: PathBuf::from("test.pdf"),
            pages: pages
                .iter()
                .enumerate()
                .map(|(i, text)| Page::from_text(i, text, false))
                .collect(),
        }
    }

    fn classifier() -> HeaderClassifier {
        HeaderClassifier::new(64)
    }

    #[test]
    fn test_deposit_header_opens_section() {
        let classified = classifier().classify(&doc(&[
            "Deposits and Credits\n04/01 Mobile payroll  $125.00",
        ]));
        assert_eq!(classified.headers.len(), 1);
        assert_eq!(classified.headers[0].section, Section::Deposit);
        assert_eq!(classified.lines[1].section, Section::Deposit);
    }

    #[test]
    fn test_lines_before_first_header_are_unclassified() {
        let classified = classifier().classify(&doc(&[
            "Statement Period 04/01 - 04/30\nDeposits and Credits\n04/01 payroll 10.00",
        ]));
        assert_eq!(classified.lines[0].section, Section::Unclassified);
        assert_eq!(classified.lines[2].section, Section::Deposit);
    }

    #[test]
    fn test_section_state_carries_across_pages() {
        let classified = classifier().classify(&doc(&[
            "Deposits and Credits\n04/01 payroll 10.00",
            "04/02 payroll continued 20.00",
        ]));
        let page2: Vec<_> = classified.lines.iter().filter(|l| l.page == 1).collect();
        assert_eq!(page2[0].section, Section::Deposit);
    }

    #[test]
    fn test_other_header_resets_section() {
        let classified = classifier().classify(&doc(&[
            "Deposits and Credits\n04/01 payroll 10.00\nDaily Balance\n04/01 1,204.50",
        ]));
        assert_eq!(classified.lines[1].section, Section::Deposit);
        assert_eq!(classified.lines[3].section, Section::Other);
    }

    #[test]
    fn test_long_line_is_not_a_header_candidate() {
        let long = "This disclosure mentions Deposits and Credits somewhere deep inside a paragraph of terms and conditions text";
        let classified = classifier().classify(&doc(&[long]));
        assert!(classified.headers.is_empty());
        assert_eq!(classified.lines[0].section, Section::Unclassified);
    }

    #[test]
    fn test_fuzzy_match_tolerates_ocr_noise() {
        // One substituted character in a multi-word phrase.
        let m = classifier().match_line("Deposits and Credlts");
        assert_eq!(m.unwrap().1, Section::Deposit);
    }

    #[test]
    fn test_single_token_requires_word_boundary() {
        // "Credits(+)" normalizes to the single token "credits".
        assert!(classifier().match_line("Credits (+)").is_some());
        assert!(classifier().match_line("Fully Accredits Institution").is_none());
    }

    #[test]
    fn test_punctuation_and_case_insensitive() {
        assert!(classifier().match_line("DEPOSITS / CREDITS").is_some());
        assert!(classifier().match_line("withdrawals and debits:").is_some());
    }

    #[test]
    fn test_extra_phrases_take_priority() {
        let c = classifier().with_extra(&[("Deposits and Additions", Section::Deposit)]);
        let m = c.match_line("DEPOSITS AND ADDITIONS").unwrap();
        assert_eq!(m.0, "Deposits and Additions");
        assert_eq!(m.1, Section::Deposit);
    }

    #[test]
    fn test_empty_and_ocr_pages_recorded() {
        let mut d = doc(&["", "Deposits and Credits"]);
        d.pages[1].from_ocr = true;
        let classified = classifier().classify(&d);
        assert_eq!(classified.empty_pages, vec![0]);
        assert_eq!(classified.ocr_pages, vec![1]);
    }

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("deposit", "deposit"), 0);
        assert_eq!(levenshtein("deposit", "deposlt"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
    }
}
