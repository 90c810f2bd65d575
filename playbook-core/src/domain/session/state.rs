// playbook-core/src/domain/session/state.rs

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::domain::dataset::{DatasetProfile, Table};
use crate::domain::error::DomainError;
use crate::domain::quality::{QualityReport, RuleConfig};
use crate::domain::session::defaults;
use crate::domain::snapshot::{
    GroupedTableKey, IndexedTableKey, KeyLayout, Snapshot, SnapshotWarning, StateValue,
};

// Clés persistées
pub const KEY_PROJECT_METADATA: &str = "project_metadata";
pub const KEY_SELECTED_SECTOR: &str = "selected_sector";
pub const KEY_LOGO_BYTES: &str = "uploaded_logo_bytes";
pub const KEY_EXEC_SUMMARY: &str = "editable_exec_summary";
pub const KEY_SHOW_SUMMARY_EDIT: &str = "show_summary_edit";
pub const KEY_INTERVIEW_CONFIDENCE: &str = "interview_confidence";
pub const KEY_INTERVIEW_NOTES: &str = "interview_notes";
pub const KEY_INTERVIEW_QUESTIONS: &str = "interview_questions";
pub const KEY_INTERVIEW_FILES: &str = "uploaded_interview_files";
pub const KEY_DQ_RULES: &str = "dq_rules_config";
pub const KEY_GOVERNANCE_SCORES: &str = "governance_scores";
pub const KEY_RACI: &str = "raci_df_json";
pub const KEY_SELECTED_COMPLIANCE: &str = "selected_compliance";
pub const KEY_GLOSSARY: &str = "business_glossary";
pub const KEY_MATURITY_SCORES: &str = "maturity_scores";
pub const KEY_MATURITY_EVIDENCE: &str = "maturity_evidence";
pub const KEY_MATURITY_HISTORY: &str = "maturity_assessments_history";
pub const KEY_ROADMAP: &str = "roadmap_data";
pub const KEY_EXPORT_OPTIONS: &str = "export_options";

const GENERATED_FROM: &str = "London, England, UK";

/// Interview attachment metadata. Only the description is kept, never the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UploadedFile {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type", default)]
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MaturityAssessment {
    #[serde(default)]
    pub scores: IndexMap<String, u8>,
    #[serde(default)]
    pub evidence: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub include_branding: bool,
    pub include_glossary: bool,
    pub include_raw_data: bool,
    pub selected_sections: Vec<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_branding: false,
            include_glossary: true,
            include_raw_data: false,
            selected_sections: defaults::REPORT_SECTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Live state of one engagement session.
///
/// The struct is owned by the caller and passed by reference to every
/// operation that reads or mutates it. Persisted fields map one-to-one to
/// snapshot keys; transient fields are rebuilt on demand and never saved.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub project_metadata: IndexMap<String, String>,
    pub selected_sector: String,
    pub uploaded_logo_bytes: Option<Vec<u8>>,
    pub editable_exec_summary: String,
    pub show_summary_edit: bool,
    /// persona -> question index -> confidence (1-10)
    pub interview_confidence: IndexMap<String, IndexMap<String, f64>>,
    pub interview_notes: IndexMap<String, IndexMap<String, String>>,
    pub interview_questions: IndexMap<String, Vec<String>>,
    pub uploaded_interview_files: IndexMap<String, Vec<UploadedFile>>,
    pub dq_rules_config: RuleConfig,
    pub governance_scores: IndexMap<String, f64>,
    pub raci: Table,
    pub selected_compliance: Vec<String>,
    pub business_glossary: IndexMap<String, String>,
    pub maturity_scores: IndexMap<String, u8>,
    pub maturity_evidence: IndexMap<String, String>,
    pub maturity_history: BTreeMap<DateTime<Utc>, MaturityAssessment>,
    pub roadmap: IndexMap<String, Table>,
    pub export_options: ExportOptions,
    /// Snapshot keys this version does not know about, written back as found.
    pub extras: IndexMap<String, StateValue>,

    // --- Transient ---
    pub current_data: Option<Table>,
    pub current_data_name: Option<String>,
    pub quality_report: Option<QualityReport>,
    pub data_trust_score: f64,
    pub profile: Option<DatasetProfile>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::created_at(Utc::now())
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh defaults, with the project metadata stamped at `now`.
    pub fn created_at(now: DateTime<Utc>) -> Self {
        let project_metadata = [
            ("Project Name", "Enterprise Data Strategy Initiative".to_string()),
            ("Project Lead", "TBD".to_string()),
            ("Client Name", "Internal".to_string()),
            ("Generated Date", now.format("%Y-%m-%d").to_string()),
            ("Generated Time", now.format("%H:%M:%S UTC").to_string()),
            ("Generated From", GENERATED_FROM.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            project_metadata,
            selected_sector: defaults::SECTORS[0].to_string(),
            uploaded_logo_bytes: None,
            editable_exec_summary: String::new(),
            show_summary_edit: false,
            interview_confidence: IndexMap::new(),
            interview_notes: IndexMap::new(),
            interview_questions: defaults::interview_questions(),
            uploaded_interview_files: IndexMap::new(),
            dq_rules_config: RuleConfig::default(),
            governance_scores: defaults::governance_scores(),
            raci: defaults::raci_table(),
            selected_compliance: defaults::selected_compliance(),
            business_glossary: defaults::business_glossary(),
            maturity_scores: defaults::maturity_scores(),
            maturity_evidence: defaults::maturity_evidence(),
            maturity_history: BTreeMap::new(),
            roadmap: defaults::roadmap_tables(),
            export_options: ExportOptions::default(),
            extras: IndexMap::new(),
            current_data: None,
            current_data_name: None,
            quality_report: None,
            data_trust_score: 0.0,
            profile: None,
        }
    }

    /// Key-name convention used to decode this state's snapshots.
    pub fn layout() -> KeyLayout {
        KeyLayout {
            indexed: vec![IndexedTableKey {
                key: KEY_RACI,
                index_column: defaults::RACI_ID_COLUMN,
                fallback: defaults::raci_table,
            }],
            grouped: vec![GroupedTableKey {
                key: KEY_ROADMAP,
                fallback: defaults::roadmap_tables,
            }],
            history: vec![KEY_MATURITY_HISTORY],
            ..KeyLayout::default()
        }
    }

    // =========================================================================
    //  SNAPSHOT
    // =========================================================================

    /// Captures every persisted field (plus unknown extras) as a snapshot.
    pub fn to_snapshot(&self) -> Snapshot {
        let mut snap = Snapshot::new();

        put_json(&mut snap, KEY_PROJECT_METADATA, &self.project_metadata);
        put_json(&mut snap, KEY_SELECTED_SECTOR, &self.selected_sector);
        if let Some(bytes) = &self.uploaded_logo_bytes {
            snap.insert(KEY_LOGO_BYTES, StateValue::Bytes(bytes.clone()));
        }
        put_json(&mut snap, KEY_EXEC_SUMMARY, &self.editable_exec_summary);
        put_json(&mut snap, KEY_SHOW_SUMMARY_EDIT, &self.show_summary_edit);
        put_json(&mut snap, KEY_INTERVIEW_CONFIDENCE, &self.interview_confidence);
        put_json(&mut snap, KEY_INTERVIEW_NOTES, &self.interview_notes);
        put_json(&mut snap, KEY_INTERVIEW_QUESTIONS, &self.interview_questions);
        put_json(&mut snap, KEY_INTERVIEW_FILES, &self.uploaded_interview_files);
        put_json(&mut snap, KEY_DQ_RULES, &self.dq_rules_config);
        put_json(&mut snap, KEY_GOVERNANCE_SCORES, &self.governance_scores);
        snap.insert(KEY_RACI, StateValue::Table(self.raci.clone()));
        put_json(&mut snap, KEY_SELECTED_COMPLIANCE, &self.selected_compliance);
        put_json(&mut snap, KEY_GLOSSARY, &self.business_glossary);
        put_json(&mut snap, KEY_MATURITY_SCORES, &self.maturity_scores);
        put_json(&mut snap, KEY_MATURITY_EVIDENCE, &self.maturity_evidence);

        let history = self
            .maturity_history
            .iter()
            .filter_map(|(ts, assessment)| match serde_json::to_value(assessment) {
                Ok(v) => Some((*ts, v)),
                Err(e) => {
                    warn!(timestamp = %ts, "Skipping unserializable assessment: {}", e);
                    None
                }
            })
            .collect();
        snap.insert(KEY_MATURITY_HISTORY, StateValue::History(history));
        snap.insert(KEY_ROADMAP, StateValue::Tables(self.roadmap.clone()));
        put_json(&mut snap, KEY_EXPORT_OPTIONS, &self.export_options);

        for (key, value) in &self.extras {
            if !snap.contains_key(key) {
                snap.insert(key.clone(), value.clone());
            }
        }
        snap
    }

    /// Overlays a decoded snapshot onto this state.
    ///
    /// A value that does not fit its field leaves the field untouched and
    /// produces a warning. Unknown keys are kept in `extras`.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> Vec<SnapshotWarning> {
        let mut warnings = Vec::new();
        let w = &mut warnings;

        for (key, value) in snapshot {
            match key.as_str() {
                KEY_PROJECT_METADATA => assign(&mut self.project_metadata, &key, value, w),
                KEY_SELECTED_SECTOR => assign(&mut self.selected_sector, &key, value, w),
                KEY_LOGO_BYTES => match value {
                    StateValue::Bytes(bytes) => self.uploaded_logo_bytes = Some(bytes),
                    StateValue::Json(Value::Null) => self.uploaded_logo_bytes = None,
                    other => mismatch(&key, "bytes", &other, w),
                },
                KEY_EXEC_SUMMARY => assign(&mut self.editable_exec_summary, &key, value, w),
                KEY_SHOW_SUMMARY_EDIT => assign(&mut self.show_summary_edit, &key, value, w),
                KEY_INTERVIEW_CONFIDENCE => assign(&mut self.interview_confidence, &key, value, w),
                KEY_INTERVIEW_NOTES => assign(&mut self.interview_notes, &key, value, w),
                KEY_INTERVIEW_QUESTIONS => assign(&mut self.interview_questions, &key, value, w),
                KEY_INTERVIEW_FILES => assign(&mut self.uploaded_interview_files, &key, value, w),
                KEY_DQ_RULES => assign(&mut self.dq_rules_config, &key, value, w),
                KEY_GOVERNANCE_SCORES => assign(&mut self.governance_scores, &key, value, w),
                KEY_RACI => match value {
                    StateValue::Table(table) => self.raci = table,
                    other => mismatch(&key, "table", &other, w),
                },
                KEY_SELECTED_COMPLIANCE => assign(&mut self.selected_compliance, &key, value, w),
                KEY_GLOSSARY => assign(&mut self.business_glossary, &key, value, w),
                KEY_MATURITY_SCORES => assign(&mut self.maturity_scores, &key, value, w),
                KEY_MATURITY_EVIDENCE => assign(&mut self.maturity_evidence, &key, value, w),
                KEY_MATURITY_HISTORY => match value {
                    StateValue::History(entries) => {
                        self.maturity_history = entries
                            .into_iter()
                            .filter_map(|(ts, raw)| {
                                match serde_json::from_value::<MaturityAssessment>(raw) {
                                    Ok(a) => Some((ts, a)),
                                    Err(e) => {
                                        w.push(SnapshotWarning::new(
                                            &key,
                                            format!("assessment at {} is malformed ({}), skipping", ts, e),
                                        ));
                                        None
                                    }
                                }
                            })
                            .collect();
                    }
                    other => mismatch(&key, "history", &other, w),
                },
                KEY_ROADMAP => match value {
                    StateValue::Tables(tables) => self.roadmap = tables,
                    other => mismatch(&key, "grouped tables", &other, w),
                },
                KEY_EXPORT_OPTIONS => assign(&mut self.export_options, &key, value, w),
                _ => {
                    debug!(key = %key, "Keeping unknown snapshot key");
                    self.extras.insert(key, value);
                }
            }
        }

        for warning in &warnings {
            warn!("{}", warning);
        }
        warnings
    }

    // =========================================================================
    //  HELPERS
    // =========================================================================

    /// Mean maturity level across dimensions, 0 when nothing is scored.
    pub fn overall_maturity(&self) -> f64 {
        if self.maturity_scores.is_empty() {
            return 0.0;
        }
        let total: f64 = self.maturity_scores.values().map(|&s| f64::from(s)).sum();
        total / self.maturity_scores.len() as f64
    }

    /// Mean of every recorded interview confidence score, rounded to one decimal.
    pub fn avg_stakeholder_confidence(&self) -> Option<f64> {
        let scores: Vec<f64> = self
            .interview_confidence
            .values()
            .flat_map(|per_question| per_question.values().copied())
            .filter(|v| v.is_finite())
            .collect();
        if scores.is_empty() {
            return None;
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    }

    /// Stores the current maturity scores and evidence under `at`.
    pub fn record_maturity_assessment(&mut self, at: DateTime<Utc>) {
        self.maturity_history.insert(
            at,
            MaturityAssessment {
                scores: self.maturity_scores.clone(),
                evidence: self.maturity_evidence.clone(),
            },
        );
    }

    /// All roadmap categories stacked into one table, `Category` first.
    pub fn full_roadmap(&self) -> Result<Table, DomainError> {
        let mut records = Vec::new();
        for (category, table) in &self.roadmap {
            for record in table.to_records() {
                let mut row = Map::new();
                row.insert("Category".to_string(), Value::String(category.clone()));
                if let Value::Object(fields) = record {
                    row.extend(fields);
                }
                records.push(Value::Object(row));
            }
        }
        Table::from_records(&records)
    }
}

fn put_json<T: Serialize>(snap: &mut Snapshot, key: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(v) => snap.insert(key, StateValue::Json(v)),
        Err(e) => warn!(key = %key, "Could not capture value: {}", e),
    }
}

fn assign<T: DeserializeOwned>(
    field: &mut T,
    key: &str,
    value: StateValue,
    warnings: &mut Vec<SnapshotWarning>,
) {
    match value {
        StateValue::Json(raw) => match serde_json::from_value(raw) {
            Ok(v) => *field = v,
            Err(e) => warnings.push(SnapshotWarning::new(
                key,
                format!("unexpected value ({}); keeping default", e),
            )),
        },
        other => mismatch(key, "json", &other, warnings),
    }
}

fn mismatch(key: &str, expected: &str, found: &StateValue, warnings: &mut Vec<SnapshotWarning>) {
    warnings.push(SnapshotWarning::new(
        key,
        format!(
            "expected {} but found {}; keeping default",
            expected,
            found.kind()
        ),
    ));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::snapshot::{decode, encode};
    use anyhow::Result;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 14, h, 0, 0).unwrap()
    }

    #[test]
    fn test_snapshot_round_trip_restores_state() -> Result<()> {
        let mut state = SessionState::created_at(at(9));
        state.selected_sector = "Finance".into();
        state.maturity_scores.insert("Data Quality".into(), 4);
        state.record_maturity_assessment(at(10));
        state
            .interview_confidence
            .insert("CDO".into(), IndexMap::from([("0".to_string(), 7.0)]));
        state.uploaded_logo_bytes = Some(vec![1, 2, 3]);
        state.extras.insert("custom_flag".into(), StateValue::Json(json!(true)));

        let doc = encode(&state.to_snapshot());
        assert!(doc.get(KEY_LOGO_BYTES).is_none());

        let decoded = decode(&doc, &SessionState::layout())?;
        assert!(decoded.warnings.is_empty());

        let mut restored = SessionState::created_at(at(12));
        let warnings = restored.apply_snapshot(decoded.snapshot);
        assert!(warnings.is_empty(), "{:?}", warnings);

        state.uploaded_logo_bytes = None;
        assert_eq!(restored, state);
        Ok(())
    }

    #[test]
    fn test_history_keeps_sub_microsecond_timestamps() -> Result<()> {
        let base = at(10);
        let first = base + chrono::TimeDelta::nanoseconds(123_456_789);
        let second = base + chrono::TimeDelta::nanoseconds(123_456_790);

        let mut state = SessionState::created_at(at(9));
        state.record_maturity_assessment(first);
        state.record_maturity_assessment(second);
        assert_eq!(state.maturity_history.len(), 2);

        let decoded = decode(&encode(&state.to_snapshot()), &SessionState::layout())?;
        let mut restored = SessionState::created_at(at(12));
        restored.apply_snapshot(decoded.snapshot);

        let keys: Vec<_> = restored.maturity_history.keys().copied().collect();
        assert_eq!(keys, vec![first, second]);
        Ok(())
    }

    #[test]
    fn test_mistyped_value_keeps_default() {
        let mut state = SessionState::created_at(at(9));
        let mut snap = Snapshot::new();
        snap.insert(KEY_MATURITY_SCORES, StateValue::Json(json!("high")));
        snap.insert(KEY_SELECTED_SECTOR, StateValue::Json(json!("Retail")));

        let warnings = state.apply_snapshot(snap);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].key, KEY_MATURITY_SCORES);
        assert_eq!(state.maturity_scores, defaults::maturity_scores());
        assert_eq!(state.selected_sector, "Retail");
    }

    #[test]
    fn test_rule_config_accepts_partial_object() {
        let mut state = SessionState::created_at(at(9));
        let mut snap = Snapshot::new();
        snap.insert(
            KEY_DQ_RULES,
            StateValue::Json(json!({"uniqueness_col": "OrderID", "consistency_range": [0, 10]})),
        );
        assert!(state.apply_snapshot(snap).is_empty());
        assert_eq!(state.dq_rules_config.uniqueness_col.as_deref(), Some("OrderID"));
        assert_eq!(state.dq_rules_config.consistency_range, Some((0.0, 10.0)));
        assert_eq!(state.dq_rules_config.timeliness_days, 90);
    }

    #[test]
    fn test_helpers() -> Result<()> {
        let mut state = SessionState::created_at(at(9));
        assert_eq!(state.overall_maturity(), 2.0);
        assert_eq!(state.avg_stakeholder_confidence(), None);

        state.interview_confidence.insert(
            "CDO".into(),
            IndexMap::from([("0".to_string(), 7.0), ("1".to_string(), 8.0)]),
        );
        state
            .interview_confidence
            .insert("Data Scientist".into(), IndexMap::from([("0".to_string(), 5.0)]));
        assert_eq!(state.avg_stakeholder_confidence(), Some(6.7));

        let roadmap = state.full_roadmap()?;
        assert_eq!(roadmap.row_count(), 9);
        assert_eq!(roadmap.column_names()[0], "Category");
        assert_eq!(roadmap.column_names()[1], "ID");
        Ok(())
    }
}
