// playbook-core/src/domain/dataset/table.rs

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::domain::dataset::cell::Cell;
use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn non_missing(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| !c.is_missing())
    }
}

/// In-memory tabular dataset: ordered, uniquely named, equal-length columns.
///
/// A table may designate one column as its row identifier (`index`). The
/// index column is always stored first so that the split and record forms
/// keep it in front, the way a reset index would appear.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    index: Option<String>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(DomainError::SchemaError(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.cells.len();
            if let Some(bad) = columns.iter().find(|c| c.cells.len() != expected) {
                return Err(DomainError::SchemaError(format!(
                    "column '{}' has {} cells, expected {}",
                    bad.name,
                    bad.cells.len(),
                    expected
                )));
            }
        }

        Ok(Self {
            columns,
            index: None,
        })
    }

    /// Builds a table from row-major data.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, DomainError> {
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect();

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DomainError::SchemaError(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    columns.len()
                )));
            }
            for (col, cell) in columns.iter_mut().zip(row) {
                col.cells.push(cell);
            }
        }

        Self::new(columns)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Cell>> + '_ {
        (0..self.row_count()).map(move |i| self.columns.iter().map(|c| &c.cells[i]).collect())
    }

    /// Makes `name` the row identifier. The column must exist and hold
    /// unique, non-missing values; it is moved to the front.
    pub fn set_index(&mut self, name: &str) -> Result<(), DomainError> {
        let pos = self
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| DomainError::ColumnNotFound(name.to_string()))?;

        let mut seen = HashSet::with_capacity(self.row_count());
        for cell in &self.columns[pos].cells {
            let key = cell.key().ok_or_else(|| DomainError::InvalidIndex {
                column: name.to_string(),
                reason: "missing value".to_string(),
            })?;
            if !seen.insert(key) {
                return Err(DomainError::InvalidIndex {
                    column: name.to_string(),
                    reason: format!("duplicate value '{}'", cell),
                });
            }
        }

        let col = self.columns.remove(pos);
        self.columns.insert(0, col);
        self.index = Some(name.to_string());
        Ok(())
    }

    // --- JSON FORMS ---

    /// Split orientation: `{"columns": [...], "index": [...], "data": [[...]]}`.
    pub fn to_split_json(&self) -> Value {
        let columns: Vec<Value> = self
            .columns
            .iter()
            .map(|c| Value::String(c.name.clone()))
            .collect();
        let index: Vec<Value> = (0..self.row_count()).map(Value::from).collect();
        let data: Vec<Value> = self
            .rows()
            .map(|row| Value::Array(row.into_iter().map(Cell::to_json).collect()))
            .collect();

        let mut obj = Map::new();
        obj.insert("columns".to_string(), Value::Array(columns));
        obj.insert("index".to_string(), Value::Array(index));
        obj.insert("data".to_string(), Value::Array(data));
        Value::Object(obj)
    }

    /// Parses the split orientation. The `index` member is optional and
    /// ignored: row identity is carried by a real column.
    pub fn from_split_json(value: &Value) -> Result<Self, DomainError> {
        let obj = value
            .as_object()
            .ok_or_else(|| DomainError::SnapshotError("split table is not an object".into()))?;

        let names = obj
            .get("columns")
            .and_then(Value::as_array)
            .ok_or_else(|| DomainError::SnapshotError("split table has no 'columns'".into()))?
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                other => Err(DomainError::SnapshotError(format!(
                    "column name {} is not a string",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let data = match obj.get("data") {
            Some(Value::Array(rows)) => rows.as_slice(),
            None => &[],
            Some(_) => {
                return Err(DomainError::SnapshotError(
                    "split table 'data' is not an array".into(),
                ));
            }
        };

        let rows = data
            .iter()
            .map(|row| {
                row.as_array()
                    .ok_or_else(|| DomainError::SnapshotError("split row is not an array".into()))?
                    .iter()
                    .map(|v| {
                        Cell::from_json(v).ok_or_else(|| {
                            DomainError::SnapshotError(format!("unsupported cell value {}", v))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_rows(names, rows)
    }

    /// Record orientation: one JSON object per row.
    pub fn to_records(&self) -> Vec<Value> {
        self.rows()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(col, cell)| (col.name.clone(), cell.to_json()))
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }

    /// Parses a list of row records. Columns are the union of the record
    /// keys in first-seen order; absent keys become missing cells.
    pub fn from_records(records: &[Value]) -> Result<Self, DomainError> {
        let mut names: Vec<String> = Vec::new();
        let mut objects = Vec::with_capacity(records.len());

        for record in records {
            let obj = record.as_object().ok_or_else(|| {
                DomainError::SnapshotError(format!("record {} is not an object", record))
            })?;
            for key in obj.keys() {
                if !names.iter().any(|n| n == key) {
                    names.push(key.clone());
                }
            }
            objects.push(obj);
        }

        let rows = objects
            .into_iter()
            .map(|obj| {
                names
                    .iter()
                    .map(|name| match obj.get(name) {
                        None => Ok(Cell::Missing),
                        Some(v) => Cell::from_json(v).ok_or_else(|| {
                            DomainError::SnapshotError(format!(
                                "unsupported value {} in column '{}'",
                                v, name
                            ))
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_rows(names, rows)
    }

    // --- CSV ---

    /// Comma separated rendering with a header line. Fields containing a
    /// separator, a quote or a line break are quoted.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        let header: Vec<String> = self.columns.iter().map(|c| csv_field(&c.name)).collect();
        out.push_str(&header.join(","));
        out.push('\n');

        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|c| csv_field(&c.to_string())).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
