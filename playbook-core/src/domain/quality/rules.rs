// playbook-core/src/domain/quality/rules.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Column names and thresholds driving the five quality dimensions.
/// Persisted in the session snapshot under `dq_rules_config`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RuleConfig {
    #[serde(default)]
    pub completeness_cols: Vec<String>,
    #[serde(default)]
    pub uniqueness_col: Option<String>,
    #[serde(default)]
    pub timeliness_col: Option<String>,
    #[serde(default = "default_timeliness_days")]
    pub timeliness_days: i64,
    #[serde(default)]
    pub validity_col: Option<String>,
    #[serde(default)]
    pub validity_condition: Option<String>,
    #[serde(default)]
    pub consistency_col: Option<String>,
    #[serde(default)]
    pub consistency_range: Option<(f64, f64)>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            completeness_cols: vec![
                "CustomerID".to_string(),
                "TransactionAmount".to_string(),
                "SatisfactionScore".to_string(),
            ],
            uniqueness_col: Some("CustomerID".to_string()),
            timeliness_col: Some("PurchaseDate".to_string()),
            timeliness_days: default_timeliness_days(),
            validity_col: Some("TransactionAmount".to_string()),
            validity_condition: Some(">= 0".to_string()),
            consistency_col: Some("SatisfactionScore".to_string()),
            consistency_range: Some((1.0, 5.0)),
        }
    }
}

fn default_timeliness_days() -> i64 {
    90
}

static NON_NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^\s*(?:>=|≥)\s*0+(?:\.0+)?\s*$").expect("valid non-negative pattern")
});

/// The comparison applied by the validity dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityCondition {
    /// `value >= 0`
    NonNegative,
    /// Any condition we do not recognise: every numeric value passes.
    Unrestricted,
}

impl ValidityCondition {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(raw) if NON_NEGATIVE.is_match(raw) => Self::NonNegative,
            _ => Self::Unrestricted,
        }
    }

    pub fn accepts(self, value: f64) -> bool {
        match self {
            Self::NonNegative => value >= 0.0,
            Self::Unrestricted => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_condition_parsing() {
        assert_eq!(ValidityCondition::parse(Some(">= 0")), ValidityCondition::NonNegative);
        assert_eq!(ValidityCondition::parse(Some("≥0")), ValidityCondition::NonNegative);
        assert_eq!(ValidityCondition::parse(Some(" >= 0.0 ")), ValidityCondition::NonNegative);
        assert_eq!(ValidityCondition::parse(Some("> 5")), ValidityCondition::Unrestricted);
        assert_eq!(ValidityCondition::parse(None), ValidityCondition::Unrestricted);
    }

    #[test]
    fn test_rules_deserialize_with_defaults() -> Result<()> {
        let rules: RuleConfig = serde_json::from_str(r#"{"uniqueness_col": "id", "consistency_range": [1, 5]}"#)?;
        assert_eq!(rules.uniqueness_col.as_deref(), Some("id"));
        assert_eq!(rules.timeliness_days, 90);
        assert!(rules.completeness_cols.is_empty());
        assert_eq!(rules.consistency_range, Some((1.0, 5.0)));
        Ok(())
    }
}
