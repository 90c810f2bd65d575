// playbook/src/commands/mod.rs

pub mod analyze;
pub mod export;
pub mod profile;
pub mod sample;
pub mod state;

use anyhow::Context;
use std::path::Path;

use playbook_core::application::{LoadOutcome, load_session, save_session, state_path};
use playbook_core::domain::project::ProjectConfig;
use playbook_core::domain::session::SessionState;
use playbook_core::infrastructure::adapters::{DuckDbDatasetSource, SampleDatasetSource};
use playbook_core::infrastructure::config::load_or_default;
use playbook_core::infrastructure::store::JsonFileStore;
use playbook_core::ports::dataset_source::DatasetSource;

use crate::cli::DataArgs;

/// A project's configuration plus its saved session, loaded over defaults.
pub struct Workspace {
    pub config: ProjectConfig,
    pub store: JsonFileStore,
    pub state: SessionState,
}

impl Workspace {
    pub fn open(project_dir: &Path) -> anyhow::Result<(Self, LoadOutcome)> {
        let config = load_or_default(project_dir)
            .with_context(|| format!("Failed to load project config in {}", project_dir.display()))?;
        let store = JsonFileStore::new(state_path(project_dir, &config));

        let mut state = SessionState::new();
        let outcome = load_session(&mut state, &store);
        if outcome.loaded {
            println!("📂 Session loaded from {}", store.path().display());
        }
        if let Some(reason) = &outcome.failure {
            println!("   Starting from defaults ({})", reason);
        }
        for warning in &outcome.warnings {
            println!("⚠️  {}", warning);
        }

        Ok((
            Self {
                config,
                store,
                state,
            },
            outcome,
        ))
    }

    pub fn save(&self) -> anyhow::Result<()> {
        save_session(&self.state, &self.store)
            .with_context(|| format!("Failed to save session to {}", self.store.path().display()))?;
        println!("💾 Session saved to {}", self.store.path().display());
        Ok(())
    }
}

/// The dataset adapter selected on the command line, if any.
pub fn dataset_source(input: &DataArgs) -> anyhow::Result<Option<Box<dyn DatasetSource>>> {
    if input.sample {
        return Ok(Some(Box::new(SampleDatasetSource::new(
            input.seed,
            chrono::Utc::now().date_naive(),
        ))));
    }
    match &input.data {
        Some(path) => {
            let source = DuckDbDatasetSource::new(path)
                .with_context(|| format!("Failed to open a DuckDB session for {}", path.display()))?;
            Ok(Some(Box::new(source)))
        }
        None => Ok(None),
    }
}

/// Like [`dataset_source`], but a dataset is mandatory.
pub fn required_dataset_source(input: &DataArgs) -> anyhow::Result<Box<dyn DatasetSource>> {
    match dataset_source(input)? {
        Some(source) => Ok(source),
        None => anyhow::bail!("❌ No dataset given.\n👉 Pass --data <FILE> or --sample."),
    }
}
