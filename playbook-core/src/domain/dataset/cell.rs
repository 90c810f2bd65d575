// playbook-core/src/domain/dataset/cell.rs

use serde_json::{Number, Value};
use std::fmt;

/// One value of a dataset column.
///
/// Columns are heterogeneous: an uploaded spreadsheet routinely mixes
/// numbers, free text and dates in the same column, so the type lives on the
/// cell rather than on the column. Dates stay textual until a dimension asks
/// for them (see `quality::dates`).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Hashable identity of a non-missing cell, used for distinct counts.
/// Integral floats collapse onto integers so that `1` and `1.0` count once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric coercion: unparseable or missing values become `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Missing => return None,
            Cell::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Cell::Int(i) => *i as f64,
            Cell::Float(f) => *f,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        if value.is_nan() { None } else { Some(value) }
    }

    pub fn key(&self) -> Option<CellKey> {
        match self {
            Cell::Missing => None,
            Cell::Bool(b) => Some(CellKey::Bool(*b)),
            Cell::Int(i) => Some(CellKey::Int(*i)),
            Cell::Float(f) if f.is_nan() => None,
            Cell::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(CellKey::Int(*f as i64))
                } else {
                    Some(CellKey::Float(f.to_bits()))
                }
            }
            Cell::Text(s) => Some(CellKey::Text(s.clone())),
        }
    }

    /// JSON rendering used by the snapshot codec and the artifacts.
    /// Non-finite floats have no JSON form and become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Missing => Value::Null,
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Int(i) => Value::from(*i),
            Cell::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Cell::Text(s) => Value::String(s.clone()),
        }
    }

    /// Inverse of [`Cell::to_json`]. Arrays and objects are not cells.
    pub fn from_json(value: &Value) -> Option<Cell> {
        match value {
            Value::Null => Some(Cell::Missing),
            Value::Bool(b) => Some(Cell::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Cell::Int(i)),
                None => n.as_f64().map(Cell::Float),
            },
            Value::String(s) => Some(Cell::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Float(v) if v.is_nan() => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Cell::Missing
        } else {
            Cell::Float(value)
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nan_is_missing() {
        assert!(Cell::Float(f64::NAN).is_missing());
        assert_eq!(Cell::from(f64::NAN), Cell::Missing);
        assert!(!Cell::Text(String::new()).is_missing());
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Cell::from("  12.5 ").as_f64(), Some(12.5));
        assert_eq!(Cell::from("abc").as_f64(), None);
        assert_eq!(Cell::from("NaN").as_f64(), None);
        assert_eq!(Cell::Int(-3).as_f64(), Some(-3.0));
        assert_eq!(Cell::Bool(true).as_f64(), Some(1.0));
        assert_eq!(Cell::Missing.as_f64(), None);
    }

    #[test]
    fn test_integral_float_shares_key_with_int() {
        assert_eq!(Cell::Float(1.0).key(), Cell::Int(1).key());
        assert_ne!(Cell::Float(1.5).key(), Cell::Int(1).key());
        assert_eq!(Cell::Missing.key(), None);
    }

    #[test]
    fn test_json_mapping() {
        assert_eq!(Cell::Float(3.0).to_json(), json!(3.0));
        assert_eq!(Cell::Float(f64::INFINITY).to_json(), Value::Null);
        assert_eq!(Cell::from_json(&json!(7)), Some(Cell::Int(7)));
        assert_eq!(Cell::from_json(&json!(2.5)), Some(Cell::Float(2.5)));
        assert_eq!(Cell::from_json(&json!(null)), Some(Cell::Missing));
        assert_eq!(Cell::from_json(&json!({"a": 1})), None);
    }
}
