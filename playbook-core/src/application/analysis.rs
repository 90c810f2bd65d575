// playbook-core/src/application/analysis.rs

use tracing::{info, instrument, warn};

use crate::domain::dataset::DatasetProfile;
use crate::domain::error::DomainError;
use crate::domain::quality::{DimensionOutcome, QualityReport, QualityScorer};
use crate::domain::session::SessionState;
use crate::error::PlaybookError;
use crate::ports::dataset_source::DatasetSource;

/// Replaces the session's current dataset. Results derived from the previous
/// dataset are discarded.
#[instrument(skip_all, fields(source = %source.label()))]
pub fn load_dataset(state: &mut SessionState, source: &dyn DatasetSource) -> Result<(), PlaybookError> {
    let table = source.load()?;
    info!(rows = table.row_count(), columns = table.column_count(), "📥 Dataset ready");

    state.current_data = Some(table);
    state.current_data_name = Some(source.label());
    state.quality_report = None;
    state.profile = None;
    state.data_trust_score = 0.0;
    Ok(())
}

/// Scores the current dataset against the session's rule configuration.
pub fn run_analysis<'a>(
    state: &'a mut SessionState,
    scorer: &QualityScorer,
) -> Result<&'a QualityReport, PlaybookError> {
    let table = state.current_data.as_ref().ok_or(DomainError::NoDataset)?;
    let report = scorer.score(table, &state.dq_rules_config);

    for (dimension, outcome) in &report.scores {
        if let DimensionOutcome::Error(e) = outcome {
            warn!(%dimension, "Dimension failed: {}", e);
        }
    }
    info!(trust_score = report.trust_score, "🔍 Analysis complete");

    state.data_trust_score = report.trust_score;
    Ok(state.quality_report.insert(report))
}

pub fn profile_dataset(state: &mut SessionState) -> Result<&DatasetProfile, PlaybookError> {
    let table = state.current_data.as_ref().ok_or(DomainError::NoDataset)?;
    let profile = DatasetProfile::from_table(table);
    Ok(state.profile.insert(profile))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::{Cell, Table};
    use crate::domain::quality::Dimension;
    use anyhow::Result;
    use chrono::{TimeZone, Utc};

    struct FixedSource(Table);

    impl DatasetSource for FixedSource {
        fn load(&self) -> Result<Table, PlaybookError> {
            Ok(self.0.clone())
        }

        fn label(&self) -> String {
            "fixed".to_string()
        }
    }

    fn orders() -> Result<Table> {
        Ok(Table::from_rows(
            vec!["CustomerID".into(), "TransactionAmount".into()],
            vec![
                vec!["C1".into(), Cell::Float(10.0)],
                vec!["C2".into(), Cell::Float(-1.0)],
                vec!["C2".into(), Cell::Missing],
                vec!["C3".into(), Cell::Float(4.0)],
            ],
        )?)
    }

    #[test]
    fn test_analysis_requires_a_dataset() {
        let mut state = SessionState::new();
        let err = run_analysis(&mut state, &QualityScorer::new()).unwrap_err();
        assert!(matches!(err, PlaybookError::Domain(DomainError::NoDataset)));
        assert!(profile_dataset(&mut state).is_err());
    }

    #[test]
    fn test_analysis_updates_state() -> Result<()> {
        let mut state = SessionState::new();
        load_dataset(&mut state, &FixedSource(orders()?))?;
        assert_eq!(state.current_data_name.as_deref(), Some("fixed"));

        let scorer = QualityScorer::at(Utc.with_ymd_and_hms(2025, 4, 14, 0, 0, 0).unwrap());
        let report = run_analysis(&mut state, &scorer)?.clone();

        assert_eq!(report.outcome(Dimension::Uniqueness).and_then(|o| o.score()), Some(75.0));
        assert_eq!(report.outcome(Dimension::Validity).and_then(|o| o.score()), Some(50.0));
        assert_eq!(state.data_trust_score, report.trust_score);

        let profile = profile_dataset(&mut state)?;
        assert_eq!(profile.rows, 4);

        // A new dataset invalidates the previous results
        load_dataset(&mut state, &FixedSource(orders()?))?;
        assert!(state.quality_report.is_none());
        assert!(state.profile.is_none());
        Ok(())
    }
}
