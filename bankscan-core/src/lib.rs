//! bankscan-core: bank statement analysis.
//!
//! Takes page text for one statement PDF, segments it into semantic
//! sections (deposits, withdrawals, other), dispatches to a bank-specific
//! processor profile when one matches, extracts deposit amounts, and folds
//! everything into a per-document [`Summary`] plus audit diagnostics.

pub mod amount;
pub mod analyzer;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod headers;
pub mod model;
pub mod profiles;
pub mod summary;

pub use amount::AmountRule;
pub use analyzer::{Progress, analyze, analyze_with_progress};
pub use config::AnalyzeConfig;
pub use error::AnalyzeError;
pub use headers::HeaderClassifier;
pub use model::{
    ClassifiedDocument, ClassifiedLine, Document, HeaderMatch, Line, Page, Section, Summary,
    TransactionCandidate,
};
pub use profiles::{ProcessorProfile, ProfileRegistry};
