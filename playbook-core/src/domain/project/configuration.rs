// src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::quality::RuleConfig;

pub const DEFAULT_STATE_FILE: &str = "playbook_state.json";

/// Contents of `playbook.yaml`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    /// Snapshot file, relative to the project directory.
    #[validate(custom(function = "validate_state_file"))]
    #[serde(rename = "state-file", default = "default_state_file")]
    pub state_file: String,

    #[serde(rename = "config-paths", default)]
    pub config_paths: Vec<String>,

    /// Rule configuration used when a session has none of its own.
    #[serde(default)]
    pub data_quality: Option<RuleConfig>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "playbook".to_string(),
            version: default_version(),
            state_file: default_state_file(),
            config_paths: Vec::new(),
            data_quality: None,
        }
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_state_file() -> String {
    DEFAULT_STATE_FILE.to_string()
}

fn validate_state_file(path: &str) -> Result<(), ValidationError> {
    if path.trim().is_empty() {
        return Err(ValidationError::new("empty_state_file"));
    }
    if !path.ends_with(".json") {
        return Err(ValidationError::new("state_file_not_json"));
    }
    Ok(())
}
