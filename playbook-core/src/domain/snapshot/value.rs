// playbook-core/src/domain/snapshot/value.rs

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::dataset::Table;

/// Numeric values outside the plain JSON integer/float pair.
/// Written as the nearest plain representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    I128(i128),
    F32(f32),
    F64(f64),
}

impl Number {
    /// Plain JSON form; `None` for NaN and infinities.
    pub fn to_json(self) -> Option<Value> {
        match self {
            Number::I64(v) => Some(Value::from(v)),
            Number::U64(v) => Some(Value::from(v)),
            Number::I128(v) => {
                if let Ok(i) = i64::try_from(v) {
                    Some(Value::from(i))
                } else if let Ok(u) = u64::try_from(v) {
                    Some(Value::from(u))
                } else {
                    float(v as f64)
                }
            }
            Number::F32(v) => float(f64::from(v)),
            Number::F64(v) => float(v),
        }
    }
}

fn float(v: f64) -> Option<Value> {
    serde_json::Number::from_f64(v).map(Value::Number)
}

/// One entry of a snapshot, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    /// Scalars, lists and nested mappings of JSON leaves.
    Json(Value),
    Table(Table),
    /// One table per category.
    Tables(IndexMap<String, Table>),
    /// Point-in-time keyed history.
    History(BTreeMap<DateTime<Utc>, Value>),
    Number(Number),
    /// Raw bytes have no JSON form and are never written.
    Bytes(Vec<u8>),
}

impl StateValue {
    pub fn kind(&self) -> &'static str {
        match self {
            StateValue::Json(_) => "json",
            StateValue::Table(_) => "table",
            StateValue::Tables(_) => "tables",
            StateValue::History(_) => "history",
            StateValue::Number(_) => "number",
            StateValue::Bytes(_) => "bytes",
        }
    }
}

/// Named capture of application state, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    entries: IndexMap<String, StateValue>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: StateValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<StateValue> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StateValue)> {
        self.entries.iter()
    }
}

impl IntoIterator for Snapshot {
    type Item = (String, StateValue);
    type IntoIter = indexmap::map::IntoIter<String, StateValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A recoverable problem met while reading a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotWarning {
    pub key: String,
    pub message: String,
}

impl SnapshotWarning {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SnapshotWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_are_plain() {
        assert_eq!(Number::I128(42).to_json(), Some(json!(42)));
        assert_eq!(Number::I128(u64::MAX as i128).to_json(), Some(json!(u64::MAX)));
        assert_eq!(Number::I128(i128::MAX).to_json(), Some(json!(i128::MAX as f64)));
        assert_eq!(Number::F32(0.5).to_json(), Some(json!(0.5)));
        assert_eq!(Number::F64(f64::NAN).to_json(), None);
    }
}
