// playbook/src/commands/analyze.rs
//
// USE CASE: Score a dataset on the five quality dimensions.

use comfy_table::{Table, presets::UTF8_FULL};
use std::path::Path;

use playbook_core::application::{load_dataset, run_analysis};
use playbook_core::domain::quality::{QualityReport, QualityScorer, RuleConfig};

use crate::cli::{DataArgs, RuleOverrides};
use crate::commands::{Workspace, required_dataset_source};

pub fn execute(
    project_dir: &Path,
    input: &DataArgs,
    overrides: &RuleOverrides,
    save_rules: bool,
) -> anyhow::Result<()> {
    let source = required_dataset_source(input)?;
    let (mut ws, outcome) = Workspace::open(project_dir)?;

    // Les règles du projet ne remplacent pas celles d'une session sauvegardée
    if let (false, Some(rules)) = (outcome.loaded, ws.config.data_quality.clone()) {
        println!("⚙️  Using data quality rules from project '{}'", ws.config.name);
        ws.state.dq_rules_config = rules;
    }
    overrides.apply(&mut ws.state.dq_rules_config);

    println!("📥 Loading dataset '{}'...", source.label());
    load_dataset(&mut ws.state, source.as_ref())?;

    let report = run_analysis(&mut ws.state, &QualityScorer::new())?;
    print_report(report);

    if save_rules {
        ws.save()?;
    }
    Ok(())
}

fn print_report(report: &QualityReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Dimension", "Outcome", "Issue"]);
    for (dimension, outcome) in &report.scores {
        let issue = report.issues.get(dimension).cloned().unwrap_or_default();
        table.add_row(vec![dimension.to_string(), outcome.to_string(), issue]);
    }
    println!("{table}");

    println!("\n🛡️  Data Trust Score: {:.1}%", report.trust_score);
    if let Some((dimension, score)) = report.weakest().filter(|(_, s)| *s < 100.0) {
        println!("👉 Weakest dimension: {} ({:.1}%)", dimension, score);
    }
}

impl RuleOverrides {
    pub fn apply(&self, rules: &mut RuleConfig) {
        if let Some(cols) = &self.completeness_cols {
            rules.completeness_cols = cols.iter().filter(|c| !c.is_empty()).cloned().collect();
        }
        if let Some(col) = &self.uniqueness_col {
            rules.uniqueness_col = Some(col.clone());
        }
        if let Some(col) = &self.timeliness_col {
            rules.timeliness_col = Some(col.clone());
        }
        if let Some(days) = self.timeliness_days {
            rules.timeliness_days = days;
        }
        if let Some(col) = &self.validity_col {
            rules.validity_col = Some(col.clone());
        }
        if let Some(condition) = &self.validity_condition {
            rules.validity_condition = Some(condition.clone());
        }
        if let Some(col) = &self.consistency_col {
            rules.consistency_col = Some(col.clone());
        }
        if let (Some(min), Some(max)) = (self.consistency_min, self.consistency_max) {
            rules.consistency_range = Some((min, max));
        }
    }
}
