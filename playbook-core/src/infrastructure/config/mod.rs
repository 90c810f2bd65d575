pub mod project;

pub use crate::domain::project::ProjectConfig;
pub use project::{PROJECT_FILES, load_or_default, load_project_config};
