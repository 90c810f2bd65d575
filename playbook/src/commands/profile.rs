// playbook/src/commands/profile.rs

use comfy_table::{Table, presets::UTF8_FULL};
use std::path::Path;

use playbook_core::application::{load_dataset, profile_dataset};

use crate::cli::DataArgs;
use crate::commands::{Workspace, required_dataset_source};

pub fn execute(project_dir: &Path, input: &DataArgs) -> anyhow::Result<()> {
    let source = required_dataset_source(input)?;
    let (mut ws, _) = Workspace::open(project_dir)?;

    load_dataset(&mut ws.state, source.as_ref())?;
    let profile = profile_dataset(&mut ws.state)?;

    println!(
        "\n📊 Profile of '{}': {} rows x {} columns",
        source.label(),
        profile.rows,
        profile.columns
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Column", "Missing %", "Distinct", "Mean", "Std", "Min", "Max",
    ]);
    for (name, missing) in &profile.missing_pct {
        let distinct = profile.distinct.get(name).copied().unwrap_or_default();
        let mut row = vec![name.clone(), format!("{:.1}", missing), distinct.to_string()];
        match profile.numeric.get(name) {
            Some(n) => row.extend([
                format!("{:.2}", n.mean),
                n.std.map_or_else(|| "-".to_string(), |s| format!("{:.2}", s)),
                format!("{:.2}", n.min),
                format!("{:.2}", n.max),
            ]),
            None => row.extend(std::iter::repeat_n("-".to_string(), 4)),
        }
        table.add_row(row);
    }
    println!("{table}");
    Ok(())
}
