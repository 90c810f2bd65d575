// playbook-core/src/domain/quality/scorer.rs

use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, instrument};

use crate::domain::dataset::{Column, Table};
use crate::domain::quality::dates::cell_timestamp;
use crate::domain::quality::error::QualityError;
use crate::domain::quality::outcome::{Dimension, DimensionOutcome, QualityReport, percentage};
use crate::domain::quality::rules::{RuleConfig, ValidityCondition};

/// What a single dimension produced: its outcome plus, when defects were
/// found, a one-line description of them.
struct Measured {
    outcome: DimensionOutcome,
    issue: Option<String>,
}

impl Measured {
    fn not_applicable(reason: impl Into<String>) -> Self {
        Self {
            outcome: DimensionOutcome::NotApplicable(reason.into()),
            issue: None,
        }
    }

    fn score(score: f64, issue: Option<String>) -> Self {
        Self {
            outcome: DimensionOutcome::Score(score),
            issue,
        }
    }
}

/// Computes the five DAMA dimensions of a dataset against a rule set.
///
/// Every dimension runs independently: a failure in one is recorded as
/// `DimensionOutcome::Error` and the others still run. The reference time is
/// fixed at construction so that timeliness is reproducible.
pub struct QualityScorer {
    now: DateTime<Utc>,
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityScorer {
    pub fn new() -> Self {
        Self { now: Utc::now() }
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    #[instrument(skip_all, fields(rows = table.row_count(), columns = table.column_count()))]
    pub fn score(&self, table: &Table, rules: &RuleConfig) -> QualityReport {
        let mut scores = IndexMap::new();
        let mut issues = IndexMap::new();

        for dimension in Dimension::ALL {
            let measured = if table.is_empty() {
                Ok(Measured::not_applicable("no rows"))
            } else {
                match dimension {
                    Dimension::Completeness => completeness(table, rules),
                    Dimension::Uniqueness => uniqueness(table, rules),
                    Dimension::Timeliness => timeliness(table, rules, self.now),
                    Dimension::Validity => validity(table, rules),
                    Dimension::Consistency => consistency(table, rules),
                }
            };

            let measured = measured.unwrap_or_else(|e| Measured {
                outcome: DimensionOutcome::Error(e.to_string()),
                issue: None,
            });

            debug!(%dimension, outcome = %measured.outcome, "Dimension measured");
            if let Some(issue) = measured.issue {
                issues.insert(dimension, issue);
            }
            scores.insert(dimension, measured.outcome);
        }

        QualityReport::new(scores, issues)
    }
}

/// Resolves an optional configured column name against the table.
/// An unset or blank name counts as absent.
fn configured_column<'t>(table: &'t Table, name: Option<&str>) -> Option<&'t Column> {
    name.filter(|n| !n.trim().is_empty())
        .and_then(|n| table.column(n))
}

// --- DIMENSIONS ---

fn completeness(table: &Table, rules: &RuleConfig) -> Result<Measured, QualityError> {
    let present: Vec<&Column> = rules
        .completeness_cols
        .iter()
        .filter_map(|name| table.column(name))
        .collect();

    if present.is_empty() {
        return Ok(Measured::not_applicable("columns missing"));
    }

    let total = present.len() * table.row_count();
    let missing: usize = present
        .iter()
        .map(|c| c.cells.iter().filter(|cell| cell.is_missing()).count())
        .sum();

    let issue = (missing > 0).then(|| {
        let names: Vec<&str> = present.iter().map(|c| c.name.as_str()).collect();
        format!(
            "{} missing values found in columns: {}",
            missing,
            names.join(", ")
        )
    });
    Ok(Measured::score(percentage(total - missing, total), issue))
}

fn uniqueness(table: &Table, rules: &RuleConfig) -> Result<Measured, QualityError> {
    let Some(col) = configured_column(table, rules.uniqueness_col.as_deref()) else {
        return Ok(Measured::not_applicable("column missing"));
    };

    let keys: Vec<_> = col.cells.iter().filter_map(|c| c.key()).collect();
    if keys.is_empty() {
        return Ok(Measured::score(100.0, None));
    }

    let non_missing = keys.len();
    let distinct = keys.into_iter().collect::<HashSet<_>>().len();
    let duplicates = non_missing - distinct;

    let issue = (duplicates > 0).then(|| {
        format!(
            "{} duplicate values found in '{}' (excluding nulls)",
            duplicates, col.name
        )
    });
    Ok(Measured::score(percentage(distinct, non_missing), issue))
}

fn timeliness(
    table: &Table,
    rules: &RuleConfig,
    now: DateTime<Utc>,
) -> Result<Measured, QualityError> {
    let Some(col) = configured_column(table, rules.timeliness_col.as_deref()) else {
        return Ok(Measured::not_applicable("column missing"));
    };

    let dates: Vec<DateTime<Utc>> = col.cells.iter().filter_map(cell_timestamp).collect();
    if dates.is_empty() {
        return Ok(Measured::not_applicable("no valid dates"));
    }

    let days = rules.timeliness_days;
    if days < 0 {
        return Err(QualityError::NegativeWindow(days));
    }
    let cutoff = TimeDelta::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or(QualityError::WindowOverflow(days))?;

    let timely = dates.iter().filter(|d| **d > cutoff).count();
    let outdated = dates.len() - timely;

    let issue = (outdated > 0).then(|| {
        format!(
            "{} records older than {} days in '{}'",
            outdated, days, col.name
        )
    });
    Ok(Measured::score(
        percentage(timely, table.row_count()),
        issue,
    ))
}

fn validity(table: &Table, rules: &RuleConfig) -> Result<Measured, QualityError> {
    let Some(col) = configured_column(table, rules.validity_col.as_deref()) else {
        return Ok(Measured::not_applicable("column missing"));
    };

    let condition = ValidityCondition::parse(rules.validity_condition.as_deref());
    let numeric: Vec<f64> = col.cells.iter().filter_map(|c| c.as_f64()).collect();
    let passing = numeric.iter().filter(|v| condition.accepts(**v)).count();
    let failing = numeric.len() - passing;

    let issue = (failing > 0).then(|| {
        format!(
            "{} values in '{}' failed condition '{}'",
            failing,
            col.name,
            rules.validity_condition.as_deref().unwrap_or("N/A")
        )
    });
    Ok(Measured::score(
        percentage(passing, table.row_count()),
        issue,
    ))
}

fn consistency(table: &Table, rules: &RuleConfig) -> Result<Measured, QualityError> {
    let Some(col) = configured_column(table, rules.consistency_col.as_deref()) else {
        return Ok(Measured::not_applicable("column missing"));
    };
    let Some((min, max)) = rules.consistency_range else {
        return Ok(Measured::not_applicable("range missing"));
    };
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(QualityError::InvalidRange { min, max });
    }

    let consistent = col
        .cells
        .iter()
        .filter(|c| c.as_f64().is_none_or(|v| (min..=max).contains(&v)))
        .count();
    let inconsistent = table.row_count() - consistent;

    let issue = (inconsistent > 0).then(|| {
        format!(
            "{} values in '{}' outside range {}-{}",
            inconsistent, col.name, min, max
        )
    });
    Ok(Measured::score(
        percentage(consistent, table.row_count()),
        issue,
    ))
}
