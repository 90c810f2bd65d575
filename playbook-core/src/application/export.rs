// playbook-core/src/application/export.rs
//
// Downloadable artifacts, built on demand from the live session. Output only.

use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

use crate::domain::dataset::Table;
use crate::domain::error::DomainError;
use crate::domain::session::{SessionState, defaults};
use crate::domain::snapshot::timestamp_key;
use crate::error::PlaybookError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Roadmap,
    Raci,
    MaturityHistory,
    QualityReport,
    Summary,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Roadmap,
        ArtifactKind::Raci,
        ArtifactKind::MaturityHistory,
        ArtifactKind::QualityReport,
        ArtifactKind::Summary,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Roadmap => "roadmap.csv",
            ArtifactKind::Raci => "raci.csv",
            ArtifactKind::MaturityHistory => "maturity_history.csv",
            ArtifactKind::QualityReport => "quality_report.json",
            ArtifactKind::Summary => "summary.txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ArtifactKind::Roadmap | ArtifactKind::Raci | ArtifactKind::MaturityHistory => "text/csv",
            ArtifactKind::QualityReport => "application/json",
            ArtifactKind::Summary => "text/plain",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            ArtifactKind::Roadmap => "roadmap",
            ArtifactKind::Raci => "raci",
            ArtifactKind::MaturityHistory => "maturity-history",
            ArtifactKind::QualityReport => "quality-report",
            ArtifactKind::Summary => "summary",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactKind::ALL
            .into_iter()
            .find(|k| k.slug() == s)
            .ok_or_else(|| format!("unknown artifact '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn build_artifact(state: &SessionState, kind: ArtifactKind) -> Result<Artifact, PlaybookError> {
    let bytes = match kind {
        ArtifactKind::Roadmap => state.full_roadmap()?.to_csv().into_bytes(),
        ArtifactKind::Raci => state.raci.to_csv().into_bytes(),
        ArtifactKind::MaturityHistory => maturity_history_table(state)?.to_csv().into_bytes(),
        ArtifactKind::QualityReport => {
            let mut bytes = serde_json::to_vec_pretty(&quality_report_json(state)?)
                .map_err(|e| PlaybookError::InternalError(e.to_string()))?;
            bytes.push(b'\n');
            bytes
        }
        ArtifactKind::Summary => executive_summary(state).into_bytes(),
    };

    Ok(Artifact {
        file_name: kind.file_name(),
        content_type: kind.content_type(),
        bytes,
    })
}

/// One row per recorded assessment, oldest first.
fn maturity_history_table(state: &SessionState) -> Result<Table, DomainError> {
    let records: Vec<Value> = state
        .maturity_history
        .iter()
        .map(|(ts, assessment)| {
            let mut row = Map::new();
            row.insert("Timestamp".to_string(), Value::String(timestamp_key(ts)));
            for (dimension, score) in &assessment.scores {
                row.insert(dimension.clone(), Value::from(*score));
            }
            Value::Object(row)
        })
        .collect();

    if records.is_empty() {
        let mut names = vec!["Timestamp".to_string()];
        names.extend(defaults::MATURITY_DIMENSIONS.iter().map(|d| d.to_string()));
        return Table::from_rows(names, Vec::new());
    }
    Table::from_records(&records)
}

fn quality_report_json(state: &SessionState) -> Result<Value, PlaybookError> {
    let report = match (&state.current_data, &state.quality_report) {
        (_, Some(report)) => report,
        (None, None) => return Err(DomainError::NoDataset.into()),
        (Some(_), None) => return Err(DomainError::NoAnalysis.into()),
    };

    let dimensions: Map<String, Value> = report
        .scores
        .iter()
        .map(|(d, outcome)| {
            let value = serde_json::to_value(outcome).unwrap_or(Value::Null);
            (d.to_string(), value)
        })
        .collect();
    let issues: Map<String, Value> = report
        .issues
        .iter()
        .map(|(d, text)| (d.to_string(), Value::String(text.clone())))
        .collect();

    Ok(json!({
        "dataset": state.current_data_name,
        "trust_score": report.trust_score,
        "dimensions": dimensions,
        "issues": issues,
        "rules": state.dq_rules_config,
    }))
}

/// The user-edited summary when there is one, otherwise a narrative
/// generated from the session's scores.
pub fn executive_summary(state: &SessionState) -> String {
    if !state.editable_exec_summary.trim().is_empty() {
        let mut text = state.editable_exec_summary.clone();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        return text;
    }

    let avg_maturity = state.overall_maturity();
    let level = (avg_maturity.round() as usize)
        .checked_sub(1)
        .and_then(|i| defaults::MATURITY_LEVELS.get(i))
        .copied()
        .unwrap_or("N/A");
    let highest_maturity = first_by(&state.maturity_scores, |a, b| b > a).unwrap_or("N/A");
    let lowest_maturity = first_by(&state.maturity_scores, |a, b| b < a).unwrap_or("N/A");

    let gov = &state.governance_scores;
    let avg_gov = if gov.is_empty() {
        0.0
    } else {
        gov.values().sum::<f64>() / gov.len() as f64
    };
    let lowest_gov = first_by(gov, |a, b| b < a);
    let lowest_gov_name = lowest_gov.unwrap_or("N/A");
    let lowest_gov_score = lowest_gov
        .and_then(|k| gov.get(k))
        .map_or_else(|| "N/A".to_string(), |s| format!("{}%", s));

    let confidence = state
        .avg_stakeholder_confidence()
        .map_or_else(|| "N/A".to_string(), |c| format!("{}/10", c));
    let trust = state
        .quality_report
        .as_ref()
        .map_or_else(|| "N/A".to_string(), |r| format!("{}%", r.trust_score));
    let project = state
        .project_metadata
        .get("Project Name")
        .map_or("Data Strategy Playbook", String::as_str);

    format!(
        "{project}\n\
         Sector: {sector}\n\
         \n\
         * Overall Maturity: Level {avg_maturity:.1} ({level}). Strengths observed in '{highest_maturity}', while '{lowest_maturity}' requires development.\n\
         * Governance: Average score is {avg_gov:.1}%. The area needing most attention is '{lowest_gov_name}' (Score: {lowest_gov_score}).\n\
         * Data Trust & Quality: Stakeholder confidence averages {confidence}. Sample data analysis yielded a Trust Score of {trust}.\n\
         * Priority Areas: Improve '{lowest_gov_name}' governance, address the data quality issues found, and advance maturity in '{lowest_maturity}'.\n",
        sector = state.selected_sector,
    )
}

/// Key of the first entry that no later entry beats under `better`.
fn first_by<'a, V: Copy>(
    map: &'a indexmap::IndexMap<String, V>,
    better: impl Fn(V, V) -> bool,
) -> Option<&'a str> {
    let mut best: Option<(&'a str, V)> = None;
    for (k, &v) in map {
        match best {
            Some((_, b)) if !better(b, v) => {}
            _ => best = Some((k.as_str(), v)),
        }
    }
    best.map(|(k, _)| k)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::Cell;
    use crate::domain::quality::{QualityScorer, RuleConfig};
    use anyhow::Result;
    use chrono::{TimeZone, Utc};

    fn state() -> SessionState {
        SessionState::created_at(Utc.with_ymd_and_hms(2025, 4, 14, 9, 0, 0).unwrap())
    }

    #[test]
    fn test_artifact_kind_names() -> Result<()> {
        assert_eq!("maturity-history".parse::<ArtifactKind>(), Ok(ArtifactKind::MaturityHistory));
        assert!("pdf".parse::<ArtifactKind>().is_err());
        for kind in ArtifactKind::ALL {
            assert_eq!(kind.to_string().parse::<ArtifactKind>(), Ok(kind));
        }
        Ok(())
    }

    #[test]
    fn test_roadmap_csv() -> Result<()> {
        let artifact = build_artifact(&state(), ArtifactKind::Roadmap)?;
        assert_eq!(artifact.file_name, "roadmap.csv");
        let text = String::from_utf8(artifact.bytes)?;
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Category,ID,Task,Owner,Effort,Cost,Status,Progress (%),Dependencies (IDs)")
        );
        assert_eq!(lines.count(), 9);
        assert!(text.contains("Mid-Term (3-12 Months),MT2,"));
        assert!(text.contains(",\"QW2,MT1\"\n"));
        Ok(())
    }

    #[test]
    fn test_maturity_history_csv() -> Result<()> {
        let mut s = state();
        let empty = String::from_utf8(build_artifact(&s, ArtifactKind::MaturityHistory)?.bytes)?;
        assert_eq!(empty.lines().count(), 1);

        s.record_maturity_assessment(Utc.with_ymd_and_hms(2025, 4, 14, 10, 0, 0).unwrap());
        let text = String::from_utf8(build_artifact(&s, ArtifactKind::MaturityHistory)?.bytes)?;
        let row = text.lines().nth(1).unwrap();
        assert_eq!(row, "2025-04-14T10:00:00.000000000Z,2,2,2,2,2,2,2");
        Ok(())
    }

    #[test]
    fn test_quality_report_requires_analysis() -> Result<()> {
        let mut s = state();
        assert!(build_artifact(&s, ArtifactKind::QualityReport).is_err());

        let table = Table::from_rows(
            vec!["CustomerID".into()],
            vec![vec!["A".into()], vec!["A".into()], vec![Cell::Missing]],
        )?;
        s.quality_report = Some(QualityScorer::new().score(&table, &RuleConfig::default()));
        s.current_data = Some(table);

        let artifact = build_artifact(&s, ArtifactKind::QualityReport)?;
        let doc: Value = serde_json::from_slice(&artifact.bytes)?;
        assert_eq!(doc["dimensions"]["Uniqueness"], json!({"status": "score", "detail": 50.0}));
        assert_eq!(doc["dimensions"]["Timeliness"]["status"], json!("not_applicable"));
        assert!(doc["issues"]["Uniqueness"].is_string());
        Ok(())
    }

    #[test]
    fn test_generated_summary() {
        insta::assert_snapshot!(executive_summary(&state()).trim_end(), @r"
        Enterprise Data Strategy Initiative
        Sector: Mobility

        * Overall Maturity: Level 2.0 (2 - Managed). Strengths observed in 'Strategy & Vision', while 'Strategy & Vision' requires development.
        * Governance: Average score is 52.5%. The area needing most attention is 'Data Stewardship' (Score: 40%).
        * Data Trust & Quality: Stakeholder confidence averages N/A. Sample data analysis yielded a Trust Score of N/A.
        * Priority Areas: Improve 'Data Stewardship' governance, address the data quality issues found, and advance maturity in 'Strategy & Vision'.
        ");
    }

    #[test]
    fn test_edited_summary_wins() -> Result<()> {
        let mut s = state();
        s.editable_exec_summary = "Custom text".into();
        let artifact = build_artifact(&s, ArtifactKind::Summary)?;
        assert_eq!(artifact.bytes, b"Custom text\n");
        assert_eq!(artifact.content_type, "text/plain");
        Ok(())
    }
}
