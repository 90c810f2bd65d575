// playbook/src/commands/sample.rs

use anyhow::Context;
use std::path::Path;

use playbook_core::infrastructure::adapters::SampleDatasetSource;
use playbook_core::infrastructure::fs::atomic_write;

pub fn execute(out: &Path, seed: u64) -> anyhow::Result<()> {
    let table = SampleDatasetSource::new(seed, chrono::Utc::now().date_naive()).generate();

    atomic_write(out, table.to_csv())
        .with_context(|| format!("Failed to write sample dataset to {}", out.display()))?;
    println!(
        "🧪 Wrote {} rows of synthetic sales data to {}",
        table.row_count(),
        out.display()
    );
    Ok(())
}
