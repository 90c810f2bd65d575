// playbook-core/src/domain/quality/outcome.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// DAMA data quality dimensions, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Completeness,
    Uniqueness,
    Timeliness,
    Validity,
    Consistency,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Completeness,
        Dimension::Uniqueness,
        Dimension::Timeliness,
        Dimension::Validity,
        Dimension::Consistency,
    ];
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Completeness => "Completeness",
            Dimension::Uniqueness => "Uniqueness",
            Dimension::Timeliness => "Timeliness",
            Dimension::Validity => "Validity",
            Dimension::Consistency => "Consistency",
        };
        f.write_str(name)
    }
}

/// Result of one dimension: a percentage, or one of the two sentinels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum DimensionOutcome {
    /// Percentage in [0, 100], one decimal.
    Score(f64),
    /// The inputs needed by the dimension are absent.
    NotApplicable(String),
    /// The computation failed; carries a short description.
    Error(String),
}

impl DimensionOutcome {
    pub fn score(&self) -> Option<f64> {
        match self {
            DimensionOutcome::Score(s) => Some(*s),
            _ => None,
        }
    }
}

impl fmt::Display for DimensionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionOutcome::Score(s) => write!(f, "{:.1}%", s),
            DimensionOutcome::NotApplicable(reason) => write!(f, "N/A ({})", reason),
            DimensionOutcome::Error(e) => write!(f, "Error ({})", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub scores: IndexMap<Dimension, DimensionOutcome>,
    /// Human readable description of the defects each dimension found.
    pub issues: IndexMap<Dimension, String>,
    pub trust_score: f64,
}

impl QualityReport {
    /// Builds the report and derives the trust score: the mean of the
    /// numeric outcomes, one decimal, or 0 when none is numeric.
    pub fn new(
        scores: IndexMap<Dimension, DimensionOutcome>,
        issues: IndexMap<Dimension, String>,
    ) -> Self {
        let numeric: Vec<f64> = scores.values().filter_map(DimensionOutcome::score).collect();
        let trust_score = if numeric.is_empty() {
            0.0
        } else {
            round1(numeric.iter().sum::<f64>() / numeric.len() as f64)
        };
        Self {
            scores,
            issues,
            trust_score,
        }
    }

    pub fn outcome(&self, dimension: Dimension) -> Option<&DimensionOutcome> {
        self.scores.get(&dimension)
    }

    /// Numeric dimension with the lowest score, the first place to look.
    pub fn weakest(&self) -> Option<(Dimension, f64)> {
        self.scores
            .iter()
            .filter_map(|(d, o)| o.score().map(|s| (*d, s)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `100 × numerator / denominator`, one decimal; 100 when there is nothing
/// to measure.
pub(crate) fn percentage(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 100.0;
    }
    round1(numerator as f64 * 100.0 / denominator as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trust_score_ignores_sentinels() {
        let mut scores = IndexMap::new();
        scores.insert(Dimension::Completeness, DimensionOutcome::Score(90.0));
        scores.insert(Dimension::Uniqueness, DimensionOutcome::Score(95.0));
        scores.insert(Dimension::Timeliness, DimensionOutcome::NotApplicable("x".into()));
        scores.insert(Dimension::Validity, DimensionOutcome::Error("boom".into()));
        let report = QualityReport::new(scores, IndexMap::new());
        assert_eq!(report.trust_score, 92.5);
        assert_eq!(report.weakest(), Some((Dimension::Completeness, 90.0)));
    }

    #[test]
    fn test_trust_score_zero_without_numbers() {
        let mut scores = IndexMap::new();
        for d in Dimension::ALL {
            scores.insert(d, DimensionOutcome::NotApplicable("column missing".into()));
        }
        let report = QualityReport::new(scores, IndexMap::new());
        assert_eq!(report.trust_score, 0.0);
        assert_eq!(report.weakest(), None);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(97, 100), 97.0);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(0, 0), 100.0);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(DimensionOutcome::Score(95.0).to_string(), "95.0%");
        assert_eq!(
            DimensionOutcome::NotApplicable("column missing".into()).to_string(),
            "N/A (column missing)"
        );
    }
}
