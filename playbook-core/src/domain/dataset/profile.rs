// playbook-core/src/domain/dataset/profile.rs

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

use crate::domain::dataset::cell::Cell;
use crate::domain::dataset::table::{Column, Table};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); `None` below two values.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

/// Quick shape-and-content overview of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: usize,
    pub missing_pct: IndexMap<String, f64>,
    pub distinct: IndexMap<String, usize>,
    pub numeric: IndexMap<String, NumericSummary>,
}

impl DatasetProfile {
    pub fn from_table(table: &Table) -> Self {
        let rows = table.row_count();
        let mut missing_pct = IndexMap::new();
        let mut distinct = IndexMap::new();
        let mut numeric = IndexMap::new();

        for col in table.columns() {
            let missing = col.cells.iter().filter(|c| c.is_missing()).count();
            let pct = if rows == 0 {
                0.0
            } else {
                round1(missing as f64 * 100.0 / rows as f64)
            };
            missing_pct.insert(col.name.clone(), pct);

            let keys: HashSet<_> = col.cells.iter().filter_map(|c| c.key()).collect();
            distinct.insert(col.name.clone(), keys.len());

            if let Some(summary) = summarize(col) {
                numeric.insert(col.name.clone(), summary);
            }
        }

        Self {
            rows,
            columns: table.column_count(),
            missing_pct,
            distinct,
            numeric,
        }
    }
}

// A column is numeric only when every non-missing cell is a number;
// text that happens to parse does not count.
fn summarize(col: &Column) -> Option<NumericSummary> {
    let mut values = Vec::with_capacity(col.cells.len());
    for cell in col.non_missing() {
        match cell {
            Cell::Int(i) => values.push(*i as f64),
            Cell::Float(f) => values.push(*f),
            _ => return None,
        }
    }
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    });
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(NumericSummary {
        count,
        mean,
        std,
        min,
        max,
    })
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
