//! Chase checking statements.
//!
//! Layout: "DEPOSITS AND ADDITIONS" / "ATM & DEBIT CARD WITHDRAWALS" /
//! "ELECTRONIC WITHDRAWALS" section tables, amount column before the
//! balance column.

use crate::model::Section;
use crate::profiles::ProcessorProfile;

pub struct Chase;

const EXTRA_HEADERS: &[(&str, Section)] = &[
    ("Deposits and Additions", Section::Deposit),
    ("ATM & Debit Card Withdrawals", Section::Withdrawal),
    ("Electronic Withdrawals", Section::Withdrawal),
    ("Checks Paid", Section::Withdrawal),
    ("Daily Ending Balance", Section::Other),
    ("Fees", Section::Other),
];

impl ProcessorProfile for Chase {
    fn name(&self) -> &'static str {
        "Chase"
    }

    fn detect(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        lower.contains("jpmorgan chase")
            || lower.contains("chase.com")
            || lower.contains("chase bank")
    }

    fn extra_headers(&self) -> &'static [(&'static str, Section)] {
        EXTRA_HEADERS
    }
}
