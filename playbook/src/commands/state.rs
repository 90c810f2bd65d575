// playbook/src/commands/state.rs
//
// USE CASE: Inspect, reset or extend the saved session.

use chrono::Utc;
use comfy_table::{Table, presets::UTF8_FULL};
use std::path::Path;

use playbook_core::domain::session::SessionState;

use crate::cli::StateAction;
use crate::commands::Workspace;

pub fn execute(project_dir: &Path, action: StateAction) -> anyhow::Result<()> {
    let (mut ws, outcome) = Workspace::open(project_dir)?;

    match action {
        StateAction::Show => {
            if !outcome.loaded {
                println!("ℹ️  No saved session at {}", ws.store.path().display());
            }
            print_summary(&ws.state)?;
        }
        StateAction::Reset => {
            ws.state = SessionState::new();
            ws.save()?;
            println!("🧹 Session reset to defaults");
        }
        StateAction::RecordMaturity => {
            ws.state.record_maturity_assessment(Utc::now());
            println!(
                "📈 Recorded maturity assessment (overall {:.1}, {} in history)",
                ws.state.overall_maturity(),
                ws.state.maturity_history.len()
            );
            ws.save()?;
        }
    }
    Ok(())
}

fn print_summary(state: &SessionState) -> anyhow::Result<()> {
    let project = state
        .project_metadata
        .get("Project Name")
        .map_or("-", String::as_str);
    let avg_gov = if state.governance_scores.is_empty() {
        0.0
    } else {
        state.governance_scores.values().sum::<f64>() / state.governance_scores.len() as f64
    };
    let confidence = state
        .avg_stakeholder_confidence()
        .map_or_else(|| "N/A".to_string(), |c| format!("{}/10", c));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Item", "Value"]);
    table.add_row(vec!["Project".to_string(), project.to_string()]);
    table.add_row(vec!["Sector".to_string(), state.selected_sector.clone()]);
    table.add_row(vec![
        "Compliance".to_string(),
        state.selected_compliance.join(", "),
    ]);
    table.add_row(vec![
        "Overall maturity".to_string(),
        format!("{:.1}", state.overall_maturity()),
    ]);
    table.add_row(vec![
        "Maturity assessments".to_string(),
        state.maturity_history.len().to_string(),
    ]);
    table.add_row(vec!["Governance average".to_string(), format!("{:.1}%", avg_gov)]);
    table.add_row(vec!["Stakeholder confidence".to_string(), confidence]);
    table.add_row(vec![
        "Roadmap items".to_string(),
        state.full_roadmap()?.row_count().to_string(),
    ]);
    table.add_row(vec![
        "RACI activities".to_string(),
        state.raci.row_count().to_string(),
    ]);
    table.add_row(vec![
        "Glossary terms".to_string(),
        state.business_glossary.len().to_string(),
    ]);
    if !state.extras.is_empty() {
        let keys: Vec<&str> = state.extras.keys().map(String::as_str).collect();
        table.add_row(vec!["Other keys".to_string(), keys.join(", ")]);
    }
    println!("{table}");
    Ok(())
}
