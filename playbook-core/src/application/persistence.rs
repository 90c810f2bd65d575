// playbook-core/src/application/persistence.rs

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::domain::project::ProjectConfig;
use crate::domain::session::SessionState;
use crate::domain::snapshot::{SnapshotWarning, decode, encode};
use crate::error::PlaybookError;
use crate::ports::state_store::StateStore;

/// What a load attempt produced. A failed load never raises: the state is
/// reset to defaults and `loaded` is false.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadOutcome {
    pub loaded: bool,
    pub warnings: Vec<SnapshotWarning>,
    /// Why nothing could be loaded, when `loaded` is false.
    pub failure: Option<String>,
}

/// Location of the snapshot file for a project.
pub fn state_path(project_dir: &Path, config: &ProjectConfig) -> PathBuf {
    let configured = Path::new(&config.state_file);
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        project_dir.join(configured)
    }
}

#[instrument(skip_all)]
pub fn save_session(state: &SessionState, store: &dyn StateStore) -> Result<(), PlaybookError> {
    let document = encode(&state.to_snapshot());
    store.write(&document)?;
    info!("💾 Session saved");
    Ok(())
}

/// Replaces `state` entirely with the stored snapshot laid over defaults.
#[instrument(skip_all)]
pub fn load_session(state: &mut SessionState, store: &dyn StateStore) -> LoadOutcome {
    *state = SessionState::new();

    let document = match store.read() {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            info!("No saved session, starting from defaults");
            return LoadOutcome {
                failure: Some("no saved session found".to_string()),
                ..LoadOutcome::default()
            };
        }
        Err(e) => return failed(e.to_string()),
    };

    let decoded = match decode(&document, &SessionState::layout()) {
        Ok(decoded) => decoded,
        Err(e) => return failed(e.to_string()),
    };

    let mut warnings = decoded.warnings;
    warnings.extend(state.apply_snapshot(decoded.snapshot));
    info!(warnings = warnings.len(), "📂 Session loaded");

    LoadOutcome {
        loaded: true,
        warnings,
        failure: None,
    }
}

fn failed(reason: String) -> LoadOutcome {
    warn!("Could not load session, using defaults: {}", reason);
    LoadOutcome {
        loaded: false,
        warnings: Vec::new(),
        failure: Some(reason),
    }
}
