// playbook-core/src/infrastructure/config/project.rs

use serde::{Deserialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::configuration::ProjectConfig;
use crate::domain::quality::RuleConfig;
use crate::infrastructure::error::InfrastructureError;

pub const PROJECT_FILES: [&str; 2] = ["playbook_project_conf.yaml", "playbook.yaml"];

pub const ENV_STATE_FILE: &str = "PLAYBOOK_STATE_FILE";

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Découverte du fichier principal
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project manifest");

    // 2. Chargement YAML Base
    let mut config: ProjectConfig = load_fragment(&config_path)?;

    // 3. Satellites (un fichier corrompu arrête tout)
    if let Some(config_folder) = config.config_paths.first() {
        let config_dir = project_dir.join(config_folder);
        if config_dir.exists() {
            load_satellite_configs(&mut config, &config_dir)?;
        }
    }

    // 4. Override via variables d'environnement
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;
    Ok(config)
}

/// Same as [`load_project_config`], but a directory without a project file
/// yields the defaults (still subject to environment overrides).
pub fn load_or_default(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    match load_project_config(project_dir) {
        Err(InfrastructureError::ConfigNotFound(_)) => {
            info!("No project file found, using defaults");
            let mut config = ProjectConfig::default();
            apply_env_overrides(&mut config, |name| std::env::var(name).ok());
            config
                .validate()
                .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;
            Ok(config)
        }
        other => other,
    }
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in PROJECT_FILES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, PROJECT_FILES
    )))
}

// --- LOGIQUE GÉNÉRIQUE ---

/// Charge un fragment de configuration typé depuis un fichier YAML.
fn load_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| {
        InfrastructureError::ConfigError(format!("Failed to parse YAML at {:?}: {}", path, e))
    })
}

fn load_satellite_configs(
    config: &mut ProjectConfig,
    config_dir: &Path,
) -> Result<(), InfrastructureError> {
    let qual_path = config_dir.join("quality.yml");
    if qual_path.exists() {
        #[derive(Deserialize)]
        struct QualityWrapper {
            data_quality: Option<RuleConfig>,
        }

        let wrapper: QualityWrapper = load_fragment(&qual_path)?;
        if let Some(rules) = wrapper.data_quality {
            config.data_quality = Some(rules);
            info!("  ✅ Quality rules loaded");
        }
    }
    Ok(())
}

/// Layering: `PLAYBOOK_STATE_FILE=/tmp/s.json playbook state show`.
fn apply_env_overrides(config: &mut ProjectConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup(ENV_STATE_FILE) {
        info!(old = ?config.state_file, new = ?val, "Overriding state file via ENV");
        config.state_file = val;
    }
}
