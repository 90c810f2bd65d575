// playbook-core/src/application/mod.rs

pub mod analysis;
pub mod export;
pub mod persistence;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI fait simplement :
// `use playbook_core::application::{load_dataset, run_analysis, save_session};`

pub use analysis::{load_dataset, profile_dataset, run_analysis};
pub use export::{Artifact, ArtifactKind, build_artifact, executive_summary};
pub use persistence::{LoadOutcome, load_session, save_session, state_path};
