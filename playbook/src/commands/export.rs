// playbook/src/commands/export.rs

use anyhow::Context;
use std::path::{Path, PathBuf};

use playbook_core::application::{ArtifactKind, build_artifact, load_dataset, run_analysis};
use playbook_core::domain::quality::QualityScorer;
use playbook_core::infrastructure::fs::atomic_write;

use crate::cli::DataArgs;
use crate::commands::{Workspace, dataset_source};

pub fn execute(
    project_dir: &Path,
    kind: ArtifactKind,
    out: Option<PathBuf>,
    input: &DataArgs,
) -> anyhow::Result<()> {
    let (mut ws, _) = Workspace::open(project_dir)?;

    // Le rapport qualité n'est jamais sauvegardé: on le recalcule
    if let Some(source) = dataset_source(input)? {
        load_dataset(&mut ws.state, source.as_ref())?;
        run_analysis(&mut ws.state, &QualityScorer::new())?;
    }

    let artifact = build_artifact(&ws.state, kind)
        .with_context(|| format!("Cannot build the '{}' artifact", kind))?;
    let out = out.unwrap_or_else(|| PathBuf::from(artifact.file_name));

    atomic_write(&out, &artifact.bytes)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!(
        "📦 Exported {} ({}, {} bytes) to {}",
        kind,
        artifact.content_type,
        artifact.bytes.len(),
        out.display()
    );
    Ok(())
}
