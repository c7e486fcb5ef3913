//! Processor profiles: per-bank detection and summarization rules.
//!
//! Profiles are tried in registration order and the first detection hit
//! wins, so more specific profiles must be registered ahead of generic
//! ones. When nothing matches, the generic summarizer runs with the
//! default header tables and the leftmost amount rule.

mod bank_of_america;
mod chase;
mod wells_fargo;

pub use bank_of_america::BankOfAmerica;
pub use chase::Chase;
pub use wells_fargo::WellsFargo;

use crate::amount::AmountRule;
use crate::config::AnalyzeConfig;
use crate::model::{ClassifiedDocument, Section, Summary};
use crate::summary;

/// One bank/processor's statement rules.
///
/// Implementations must be stateless: detection and summarization are pure
/// so multiple documents can be analyzed in parallel.
pub trait ProcessorProfile: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this profile's markers appear in the whole-document text.
    fn detect(&self, text: &str) -> bool;

    /// Header phrasing specific to this bank's layout, tried ahead of the
    /// builtin tables.
    fn extra_headers(&self) -> &'static [(&'static str, Section)] {
        &[]
    }

    /// Which number on a multi-number line is the transaction amount.
    fn amount_rule(&self) -> AmountRule {
        AmountRule::Leftmost
    }

    fn summarize(&self, doc: &ClassifiedDocument, config: &AnalyzeConfig) -> Summary {
        summary::summarize(doc, config, self.name(), true, self.amount_rule())
    }
}

/// Ordered set of known profiles. Built fresh per run; read-only after
/// construction.
pub struct ProfileRegistry {
    profiles: Vec<Box<dyn ProcessorProfile>>,
}

impl ProfileRegistry {
    /// The builtin profiles in priority order.
    pub fn builtin() -> Self {
        Self {
            profiles: vec![
                Box::new(Chase),
                Box::new(WellsFargo),
                Box::new(BankOfAmerica),
            ],
        }
    }

    pub fn with_profiles(profiles: Vec<Box<dyn ProcessorProfile>>) -> Self {
        Self { profiles }
    }

    /// First profile whose predicate fires, or None for the generic path.
    pub fn select(&self, text: &str) -> Option<&dyn ProcessorProfile> {
        self.profiles
            .iter()
            .map(|p| p.as_ref())
            .find(|p| p.detect(text))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.profiles.iter().map(|p| p.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker(&'static str);

    impl ProcessorProfile for Marker {
        fn name(&self) -> &'static str {
            self.0
        }
        fn detect(&self, text: &str) -> bool {
            text.contains("MARKER")
        }
    }

    #[test]
    fn test_first_registered_match_wins() {
        let registry = ProfileRegistry::with_profiles(vec![
            Box::new(Marker("first")),
            Box::new(Marker("second")),
        ]);
        // Both predicates fire; registration order decides.
        assert_eq!(registry.select("MARKER text").unwrap().name(), "first");
    }

    #[test]
    fn test_no_match_yields_none() {
        assert!(ProfileRegistry::builtin().select("plain text").is_none());
    }

    #[test]
    fn test_builtin_order_is_stable() {
        assert_eq!(
            ProfileRegistry::builtin().names(),
            vec!["Chase", "Wells Fargo", "Bank of America"]
        );
    }
}
