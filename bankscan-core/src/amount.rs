//! Monetary amount extraction from a single statement line.
//!
//! Statements put the transaction amount before the balance column, so the
//! default rule takes the leftmost qualifying positive number and treats
//! everything after it as running balance. Profiles whose layouts invert
//! that convention can opt into the rightmost rule.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Which qualifying number on a multi-number line is the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountRule {
    Leftmost,
    Rightmost,
}

fn money_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?P<neg>[-(])?\s*\$?\s*(?P<amt>(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2})(?P<close>\))?",
        )
        .expect("money token regex")
    })
}

/// How far past a number we look for a balance-context marker.
const BALANCE_WINDOW: usize = 24;

#[derive(Debug, Clone, Copy)]
struct MoneyToken {
    amount: Decimal,
    negative: bool,
    balance_context: bool,
}

fn scan(line: &str) -> Vec<MoneyToken> {
    money_re()
        .captures_iter(line)
        .filter_map(|caps| {
            let raw = caps.name("amt")?;
            let amount = Decimal::from_str(&raw.as_str().replace(',', "")).ok()?;
            let negative = caps.name("neg").is_some() || caps.name("close").is_some();
            let tail: String = line[raw.end()..]
                .chars()
                .take(BALANCE_WINDOW)
                .collect::<String>()
                .to_lowercase();
            Some(MoneyToken {
                amount,
                negative,
                balance_context: tail.contains("balance") || tail.contains(" bal "),
            })
        })
        .collect()
}

/// Extract the deposit amount from a line inside a deposit section.
///
/// Negative and parenthesized numbers are debits by statement convention
/// and never qualify; a number flagged as balance context is skipped. A
/// line with no qualifying number contributes nothing.
pub fn deposit_amount(line: &str, rule: AmountRule) -> Option<Decimal> {
    let tokens = scan(line);
    let mut qualifying = tokens
        .iter()
        .filter(|t| !t.negative && !t.balance_context && t.amount > Decimal::ZERO);
    match rule {
        AmountRule::Leftmost => qualifying.next().map(|t| t.amount),
        AmountRule::Rightmost => qualifying.last().map(|t| t.amount),
    }
}

/// Extract the withdrawal amount from a line inside a withdrawal section.
///
/// Withdrawal sections list debits as plain, negative, or parenthesized
/// numbers; the magnitude is what matters. Balance columns are still
/// skipped and the same positional rule applies.
pub fn withdrawal_amount(line: &str, rule: AmountRule) -> Option<Decimal> {
    let tokens = scan(line);
    let mut qualifying = tokens
        .iter()
        .filter(|t| !t.balance_context && t.amount > Decimal::ZERO);
    match rule {
        AmountRule::Leftmost => qualifying.next().map(|t| t.amount),
        AmountRule::Rightmost => qualifying.last().map(|t| t.amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_leftmost_wins_over_balance_column() {
        let line = "04/01 Mobile Deposit  $125.00  1,204.50";
        assert_eq!(deposit_amount(line, AmountRule::Leftmost), Some(dec!(125.00)));
    }

    #[test]
    fn test_rightmost_rule_takes_last_number() {
        let line = "04/01 Mobile Deposit  1,204.50  $125.00";
        assert_eq!(deposit_amount(line, AmountRule::Rightmost), Some(dec!(125.00)));
    }

    #[test]
    fn test_single_number_line() {
        assert_eq!(
            deposit_amount("04/03 Check Deposit  $60.00", AmountRule::Leftmost),
            Some(dec!(60.00))
        );
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(
            deposit_amount("ACH Credit Stripe  $12,345.67", AmountRule::Leftmost),
            Some(dec!(12345.67))
        );
    }

    #[test]
    fn test_parenthesized_number_is_debit() {
        assert_eq!(
            deposit_amount("04/05 Reversal  (125.00)", AmountRule::Leftmost),
            None
        );
    }

    #[test]
    fn test_negative_number_is_debit() {
        assert_eq!(
            deposit_amount("04/05 Adjustment  -15.00", AmountRule::Leftmost),
            None
        );
    }

    #[test]
    fn test_debit_then_balance_counts_nothing() {
        assert_eq!(
            deposit_amount("04/05 Reversal  (125.00)  1,079.50 balance", AmountRule::Leftmost),
            None
        );
    }

    #[test]
    fn test_balance_marker_disqualifies_number() {
        assert_eq!(
            deposit_amount("Ending 1,204.50 Balance", AmountRule::Leftmost),
            None
        );
    }

    #[test]
    fn test_no_numbers_contributes_nothing() {
        assert_eq!(
            deposit_amount("04/02 Transfer memo only", AmountRule::Leftmost),
            None
        );
    }

    #[test]
    fn test_zero_amount_does_not_qualify() {
        assert_eq!(deposit_amount("04/02 Fee waived 0.00", AmountRule::Leftmost), None);
    }

    #[test]
    fn test_withdrawal_accepts_negative_magnitude() {
        assert_eq!(
            withdrawal_amount("04/06 ATM Withdrawal  -40.00  1,039.50", AmountRule::Leftmost),
            Some(dec!(40.00))
        );
    }

    #[test]
    fn test_withdrawal_accepts_parenthesized() {
        assert_eq!(
            withdrawal_amount("04/07 Check #1204  (250.00)", AmountRule::Leftmost),
            Some(dec!(250.00))
        );
    }
}
