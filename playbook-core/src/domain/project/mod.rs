// playbook-core/src/domain/project/mod.rs

pub mod configuration;
pub use configuration::{DEFAULT_STATE_FILE, ProjectConfig};
