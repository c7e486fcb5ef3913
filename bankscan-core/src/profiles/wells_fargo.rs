//! Wells Fargo checking statements.
//!
//! Layout: a combined transaction-history table with separate
//! "Deposits/Additions" and "Withdrawals/Subtractions" columns and the
//! ending daily balance printed first on the line, so the transaction
//! amount is the rightmost qualifying number.

use crate::amount::AmountRule;
use crate::model::Section;
use crate::profiles::ProcessorProfile;

pub struct WellsFargo;

const EXTRA_HEADERS: &[(&str, Section)] = &[
    ("Deposits/Additions", Section::Deposit),
    ("Withdrawals/Subtractions", Section::Withdrawal),
    ("Ending Daily Balance", Section::Other),
    ("Monthly Service Fee Summary", Section::Other),
];

impl ProcessorProfile for WellsFargo {
    fn name(&self) -> &'static str {
        "Wells Fargo"
    }

    fn detect(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        lower.contains("wells fargo") || lower.contains("wellsfargo.com")
    }

    fn extra_headers(&self) -> &'static [(&'static str, Section)] {
        EXTRA_HEADERS
    }

    fn amount_rule(&self) -> AmountRule {
        AmountRule::Rightmost
    }
}
