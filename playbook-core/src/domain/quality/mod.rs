// playbook-core/src/domain/quality/mod.rs

pub mod dates;
pub mod error;
pub mod outcome;
pub mod rules;
pub mod scorer;

// Re-exports
pub use error::QualityError;
pub use outcome::{Dimension, DimensionOutcome, QualityReport};
pub use rules::{RuleConfig, ValidityCondition};
pub use scorer::QualityScorer;
