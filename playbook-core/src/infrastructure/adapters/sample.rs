// playbook-core/src/infrastructure/adapters/sample.rs

use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, index};
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::domain::dataset::{Cell, Column, Table};
use crate::error::PlaybookError;
use crate::ports::dataset_source::DatasetSource;

pub const SAMPLE_LABEL: &str = "Mock Sales Data";
pub const SAMPLE_ROWS: usize = 100;
pub const DEFAULT_SEED: u64 = 42;

const CATEGORIES: [&str; 5] = ["Electronics", "Clothing", "Home Goods", "Groceries", "Books"];
const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const DATE_SPAN_DAYS: i64 = 455;
const NEGATIVE_AMOUNTS: usize = 5;
const MISSING_SCORES: usize = 10;
const SHARED_IDS: usize = 3;

/// Seeded synthetic sales dataset with known defects: a few negative
/// amounts, missing satisfaction scores and one customer id used three times.
#[derive(Debug, Clone)]
pub struct SampleDatasetSource {
    seed: u64,
    anchor: NaiveDate,
}

impl Default for SampleDatasetSource {
    fn default() -> Self {
        Self::new(DEFAULT_SEED, Utc::now().date_naive())
    }
}

impl SampleDatasetSource {
    /// Purchase dates fall in the `DATE_SPAN_DAYS` days up to `anchor`.
    pub fn new(seed: u64, anchor: NaiveDate) -> Self {
        Self { seed, anchor }
    }

    pub fn generate(&self) -> Table {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let n = SAMPLE_ROWS;

        let mut ids: Vec<Cell> = (1..=n).map(|i| Cell::from(format!("CUST-{:04}", i))).collect();
        let dates: Vec<Cell> = (0..n)
            .map(|_| {
                let back = rng.random_range(0..=DATE_SPAN_DAYS);
                Cell::from((self.anchor - Duration::days(back)).format("%Y-%m-%d").to_string())
            })
            .collect();
        let categories: Vec<Cell> = (0..n).map(|_| pick(&mut rng, &CATEGORIES)).collect();
        let mut amounts: Vec<Cell> = (0..n)
            .map(|_| Cell::Float(round2(rng.random_range(10.0..500.0))))
            .collect();
        let regions: Vec<Cell> = (0..n).map(|_| pick(&mut rng, &REGIONS)).collect();
        let mut scores: Vec<Cell> = (0..n)
            .map(|_| Cell::Float(f64::from(rng.random_range(1u8..=5))))
            .collect();

        for i in index::sample(&mut rng, n, NEGATIVE_AMOUNTS) {
            amounts[i] = Cell::Float(-round2(rng.random_range(5.0..50.0)));
        }
        for i in index::sample(&mut rng, n, MISSING_SCORES) {
            scores[i] = Cell::Missing;
        }
        let shared = index::sample(&mut rng, n, SHARED_IDS).into_vec();
        let source_id = ids[shared[0]].clone();
        for &i in &shared[1..] {
            ids[i] = source_id.clone();
        }

        let columns = vec![
            Column::new("CustomerID", ids),
            Column::new("PurchaseDate", dates),
            Column::new("ProductCategory", categories),
            Column::new("TransactionAmount", amounts),
            Column::new("Region", regions),
            Column::new("SatisfactionScore", scores),
        ];
        // Fixed names and lengths: construction cannot fail.
        Table::new(columns).unwrap_or_default()
    }
}

impl DatasetSource for SampleDatasetSource {
    fn load(&self) -> Result<Table, PlaybookError> {
        let table = self.generate();
        info!(seed = self.seed, anchor = %self.anchor, rows = table.row_count(), "Sample dataset generated");
        Ok(table)
    }

    fn label(&self) -> String {
        SAMPLE_LABEL.to_string()
    }
}

fn pick(rng: &mut StdRng, choices: &[&str]) -> Cell {
    choices.choose(rng).map_or(Cell::Missing, |s| Cell::from(*s))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::quality::{Dimension, QualityScorer, RuleConfig};
    use std::collections::HashSet;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 14).unwrap()
    }

    #[test]
    fn test_sample_has_known_defects() {
        let table = SampleDatasetSource::new(7, anchor()).generate();
        assert_eq!(table.row_count(), SAMPLE_ROWS);

        let amounts = &table.column("TransactionAmount").unwrap().cells;
        let negatives = amounts.iter().filter(|c| c.as_f64().is_some_and(|v| v < 0.0)).count();
        assert_eq!(negatives, NEGATIVE_AMOUNTS);

        let scores = &table.column("SatisfactionScore").unwrap().cells;
        assert_eq!(scores.iter().filter(|c| c.is_missing()).count(), MISSING_SCORES);

        let ids = &table.column("CustomerID").unwrap().cells;
        let distinct: HashSet<_> = ids.iter().filter_map(Cell::key).collect();
        assert_eq!(distinct.len(), SAMPLE_ROWS - (SHARED_IDS - 1));
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = SampleDatasetSource::new(1, anchor()).generate();
        let b = SampleDatasetSource::new(1, anchor()).generate();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_scores() {
        let table = SampleDatasetSource::new(DEFAULT_SEED, anchor()).generate();
        let report = QualityScorer::new().score(&table, &RuleConfig::default());

        assert_eq!(report.outcome(Dimension::Uniqueness).and_then(|o| o.score()), Some(98.0));
        assert_eq!(report.outcome(Dimension::Validity).and_then(|o| o.score()), Some(95.0));
        assert_eq!(report.outcome(Dimension::Consistency).and_then(|o| o.score()), Some(100.0));
        // 300 cells, 10 of them missing scores
        assert_eq!(report.outcome(Dimension::Completeness).and_then(|o| o.score()), Some(96.7));
    }
}
