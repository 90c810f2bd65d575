// playbook-core/src/domain/snapshot/codec.rs

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::domain::dataset::Table;
use crate::domain::error::DomainError;
use crate::domain::quality::dates::parse_timestamp;
use crate::domain::snapshot::layout::{GroupedTableKey, IndexedTableKey, KeyLayout};
use crate::domain::snapshot::value::{Snapshot, SnapshotWarning, StateValue};

/// Canonical, lexicographically sortable form of a history timestamp.
pub fn timestamp_key(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

// =============================================================================
//  ENCODE
// =============================================================================

/// Converts a snapshot into a JSON document. Entries without a JSON form
/// (raw bytes, non-finite numbers) are left out.
pub fn encode(snapshot: &Snapshot) -> Value {
    let mut doc = Map::new();
    for (key, value) in snapshot.iter() {
        match encode_value(value) {
            Some(json) => {
                doc.insert(key.clone(), json);
            }
            None => debug!(key = %key, kind = value.kind(), "Skipping non-representable entry"),
        }
    }
    Value::Object(doc)
}

fn encode_value(value: &StateValue) -> Option<Value> {
    match value {
        StateValue::Json(v) => Some(v.clone()),
        StateValue::Table(table) => Some(Value::String(table.to_split_json().to_string())),
        StateValue::Tables(groups) => {
            let obj: Map<String, Value> = groups
                .iter()
                .map(|(category, table)| (category.clone(), Value::Array(table.to_records())))
                .collect();
            Some(Value::Object(obj))
        }
        StateValue::History(history) => {
            let obj: Map<String, Value> = history
                .iter()
                .map(|(ts, entry)| (timestamp_key(ts), entry.clone()))
                .collect();
            Some(Value::Object(obj))
        }
        StateValue::Number(n) => n.to_json(),
        StateValue::Bytes(_) => None,
    }
}

// =============================================================================
//  DECODE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decoded {
    pub snapshot: Snapshot,
    pub warnings: Vec<SnapshotWarning>,
}

impl Decoded {
    fn warn(&mut self, key: &str, message: String) {
        warn!(key = %key, "{}", message);
        self.warnings.push(SnapshotWarning::new(key, message));
    }
}

/// Rebuilds a snapshot from a JSON document, guided by `layout`.
///
/// Only a document that is not a JSON object is an error. Malformed parts
/// are isolated: they are replaced by the layout's fallback (or dropped) and
/// reported as warnings.
pub fn decode(doc: &Value, layout: &KeyLayout) -> Result<Decoded, DomainError> {
    let obj = doc
        .as_object()
        .ok_or_else(|| DomainError::SnapshotError("snapshot root is not an object".into()))?;

    let mut out = Decoded::default();
    for (key, value) in obj {
        let decoded = if let Some(entry) = layout.indexed(key) {
            decode_indexed(key, value, entry, &mut out)
        } else if let Some(entry) = layout.grouped(key) {
            decode_grouped(key, value, entry, &mut out)
        } else if layout.is_history(key) {
            decode_history(key, value, &mut out)
        } else if layout.is_table(key) && value.is_string() {
            match parse_table(value) {
                Ok(table) => Some(StateValue::Table(table)),
                Err(e) => {
                    out.warn(key, format!("could not load table ({}), skipping", e));
                    None
                }
            }
        } else {
            Some(StateValue::Json(value.clone()))
        };

        if let Some(decoded) = decoded {
            out.snapshot.insert(key.clone(), decoded);
        }
    }
    Ok(out)
}

fn parse_table(value: &Value) -> Result<Table, DomainError> {
    let text = value
        .as_str()
        .ok_or_else(|| DomainError::SnapshotError("table is not stored as text".into()))?;
    let split: Value = serde_json::from_str(text)
        .map_err(|e| DomainError::SnapshotError(format!("invalid table text: {}", e)))?;
    Table::from_split_json(&split)
}

fn decode_indexed(
    key: &str,
    value: &Value,
    entry: &IndexedTableKey,
    out: &mut Decoded,
) -> Option<StateValue> {
    let table = parse_table(value).and_then(|mut table| {
        table.set_index(entry.index_column)?;
        Ok(table)
    });

    match table {
        Ok(table) => Some(StateValue::Table(table)),
        Err(e) => {
            out.warn(key, format!("{}; using default table", e));
            Some(StateValue::Table((entry.fallback)()))
        }
    }
}

fn decode_grouped(
    key: &str,
    value: &Value,
    entry: &GroupedTableKey,
    out: &mut Decoded,
) -> Option<StateValue> {
    let parsed = value
        .as_object()
        .ok_or_else(|| DomainError::SnapshotError("expected an object of categories".into()))
        .and_then(|groups| {
            groups
                .iter()
                .map(|(category, records)| {
                    let records = records.as_array().ok_or_else(|| {
                        DomainError::SnapshotError(format!(
                            "category '{}' is not a list of records",
                            category
                        ))
                    })?;
                    Ok((category.clone(), Table::from_records(records)?))
                })
                .collect::<Result<IndexMap<_, _>, DomainError>>()
        });

    match parsed {
        Ok(groups) => Some(StateValue::Tables(groups)),
        Err(e) => {
            out.warn(key, format!("{}; using defaults", e));
            Some(StateValue::Tables((entry.fallback)()))
        }
    }
}

fn decode_history(key: &str, value: &Value, out: &mut Decoded) -> Option<StateValue> {
    let Some(entries) = value.as_object() else {
        out.warn(key, "history is not an object; starting empty".to_string());
        return Some(StateValue::History(BTreeMap::new()));
    };

    let mut history = BTreeMap::new();
    for (raw_ts, entry) in entries {
        match parse_timestamp(raw_ts) {
            Some(ts) => {
                history.insert(ts, entry.clone());
            }
            None => out.warn(
                key,
                format!("could not parse timestamp '{}', skipping", raw_ts),
            ),
        }
    }
    Some(StateValue::History(history))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::Cell;
    use crate::domain::snapshot::value::Number;
    use anyhow::Result;
    use chrono::TimeZone;
    use serde_json::json;

    fn fallback_roles() -> Table {
        let mut t = Table::from_rows(vec!["Activity".into(), "CDO".into()], vec![vec!["Fallback".into(), "A".into()]])
            .unwrap_or_default();
        let _ = t.set_index("Activity");
        t
    }

    fn fallback_groups() -> IndexMap<String, Table> {
        IndexMap::from([("Default".to_string(), Table::default())])
    }

    fn layout() -> KeyLayout {
        KeyLayout {
            indexed: vec![IndexedTableKey {
                key: "roles_df_json",
                index_column: "Activity",
                fallback: fallback_roles,
            }],
            grouped: vec![GroupedTableKey {
                key: "plan",
                fallback: fallback_groups,
            }],
            history: vec!["history"],
            ..KeyLayout::default()
        }
    }

    fn roles() -> Result<Table> {
        let mut t = Table::from_rows(
            vec!["Activity".into(), "CDO".into(), "IT".into()],
            vec![
                vec!["Define rules".into(), "A".into(), "I".into()],
                vec!["Monitor".into(), "R".into(), Cell::Missing],
            ],
        )?;
        t.set_index("Activity")?;
        Ok(t)
    }

    fn round_trip(snapshot: &Snapshot) -> Result<Decoded> {
        let text = serde_json::to_string_pretty(&encode(snapshot))?;
        Ok(decode(&serde_json::from_str(&text)?, &layout())?)
    }

    #[test]
    fn test_round_trip_preserves_every_representable_key() -> Result<()> {
        let ts = Utc.with_ymd_and_hms(2025, 4, 14, 10, 30, 0).unwrap();
        let metrics = Table::from_rows(
            vec!["metric".into(), "value".into()],
            vec![vec!["rows".into(), Cell::Int(100)], vec!["ratio".into(), Cell::Float(0.5)]],
        )?;
        let plan = Table::from_records(&[json!({"ID": "QW1", "Progress (%)": 10})])?;

        let mut snapshot = Snapshot::new();
        snapshot.insert("metadata", StateValue::Json(json!({"Project Name": "Alpha", "tags": [1, 2]})));
        snapshot.insert("roles_df_json", StateValue::Table(roles()?));
        snapshot.insert("metrics_df_json", StateValue::Table(metrics));
        snapshot.insert("plan", StateValue::Tables(IndexMap::from([("Quick".to_string(), plan)])));
        snapshot.insert(
            "history",
            StateValue::History(BTreeMap::from([(ts, json!({"scores": {"Data Quality": 3}}))])),
        );
        snapshot.insert("count", StateValue::Number(Number::U64(7)));
        snapshot.insert("logo", StateValue::Bytes(vec![0x89, 0x50]));
        snapshot.insert("ratio", StateValue::Number(Number::F64(f64::INFINITY)));

        let decoded = round_trip(&snapshot)?;
        assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);

        let back = decoded.snapshot;
        for key in ["metadata", "roles_df_json", "metrics_df_json", "plan", "history"] {
            assert_eq!(back.get(key), snapshot.get(key), "key {}", key);
        }
        assert_eq!(back.get("count"), Some(&StateValue::Json(json!(7))));
        assert!(!back.contains_key("logo"));
        assert!(!back.contains_key("ratio"));
        Ok(())
    }

    #[test]
    fn test_history_keys_are_canonical_strings() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let mut snapshot = Snapshot::new();
        snapshot.insert("history", StateValue::History(BTreeMap::from([(ts, json!(1))])));
        assert_eq!(encode(&snapshot), json!({"history": {"2025-01-02T03:04:05.000000000Z": 1}}));
    }

    #[test]
    fn test_roles_without_identifier_fall_back() -> Result<()> {
        let broken = json!({"columns": ["CDO"], "index": [0], "data": [["A"]]}).to_string();
        let decoded = decode(&json!({"roles_df_json": broken}), &layout())?;

        assert_eq!(decoded.warnings.len(), 1);
        assert_eq!(decoded.warnings[0].key, "roles_df_json");
        assert_eq!(
            decoded.snapshot.get("roles_df_json"),
            Some(&StateValue::Table(fallback_roles()))
        );
        Ok(())
    }

    #[test]
    fn test_roles_with_duplicate_identifier_fall_back() -> Result<()> {
        let dup = json!({"columns": ["Activity"], "data": [["x"], ["x"]]}).to_string();
        let decoded = decode(&json!({"roles_df_json": dup}), &layout())?;
        assert_eq!(decoded.warnings.len(), 1);
        assert_eq!(
            decoded.snapshot.get("roles_df_json"),
            Some(&StateValue::Table(fallback_roles()))
        );
        Ok(())
    }

    #[test]
    fn test_bad_history_timestamps_are_dropped() -> Result<()> {
        let doc = json!({"history": {"2025-04-14T10:00:00+01:00": {"a": 1}, "yesterday": {"a": 2}}});
        let decoded = decode(&doc, &layout())?;

        assert_eq!(decoded.warnings.len(), 1);
        let Some(StateValue::History(history)) = decoded.snapshot.get("history") else {
            anyhow::bail!("history not decoded");
        };
        assert_eq!(history.len(), 1);
        let ts = Utc.with_ymd_and_hms(2025, 4, 14, 9, 0, 0).unwrap();
        assert_eq!(history.get(&ts), Some(&json!({"a": 1})));
        Ok(())
    }

    #[test]
    fn test_malformed_groups_fall_back() -> Result<()> {
        let decoded = decode(&json!({"plan": {"Quick": "not records"}}), &layout())?;
        assert_eq!(decoded.warnings.len(), 1);
        assert_eq!(
            decoded.snapshot.get("plan"),
            Some(&StateValue::Tables(fallback_groups()))
        );
        Ok(())
    }

    #[test]
    fn test_malformed_plain_table_is_skipped() -> Result<()> {
        let decoded = decode(&json!({"metrics_df_json": "{not json", "other": 1}), &layout())?;
        assert_eq!(decoded.warnings.len(), 1);
        assert!(!decoded.snapshot.contains_key("metrics_df_json"));
        assert_eq!(decoded.snapshot.get("other"), Some(&StateValue::Json(json!(1))));
        Ok(())
    }

    #[test]
    fn test_non_object_root_is_an_error() {
        assert!(decode(&json!([1, 2]), &layout()).is_err());
    }
}
