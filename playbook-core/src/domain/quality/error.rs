// playbook-core/src/domain/quality/error.rs

use thiserror::Error;

/// Failure inside a single dimension. Never escapes the scorer: it is
/// folded into `DimensionOutcome::Error`.
#[derive(Debug, Error)]
pub enum QualityError {
    #[error("freshness window must be non-negative, got {0} days")]
    NegativeWindow(i64),

    #[error("freshness window of {0} days falls outside the calendar")]
    WindowOverflow(i64),

    #[error("invalid range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },
}
