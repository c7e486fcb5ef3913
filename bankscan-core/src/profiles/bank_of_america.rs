//! Bank of America checking statements.
//!
//! Layout: "Deposits and other credits" / "Withdrawals and other debits"
//! section tables, amount column before the balance column.

use crate::model::Section;
use crate::profiles::ProcessorProfile;

pub struct BankOfAmerica;

const EXTRA_HEADERS: &[(&str, Section)] = &[
    ("Deposits and other credits", Section::Deposit),
    ("Withdrawals and other debits", Section::Withdrawal),
    ("Checks", Section::Withdrawal),
    ("Service fees", Section::Other),
    ("Daily ledger balances", Section::Other),
];

impl ProcessorProfile for BankOfAmerica {
    fn name(&self) -> &'static str {
        "Bank of America"
    }

    fn detect(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        lower.contains("bank of america") || lower.contains("bankofamerica.com")
    }

    fn extra_headers(&self) -> &'static [(&'static str, Section)] {
        EXTRA_HEADERS
    }
}
