//! Configuration loader with dual-location support
//!
//! Loads configuration from:
//! 1. Default values
//! 2. User-level config: ~/.agent-chat/config.toml
//! 3. Project-level config: ./.agent-chat/config.toml
//! 4. Environment overrides (see [`ChatConfig::apply_env`])
//!
//! Later sources override earlier ones key by key, so a project file that only
//! sets `[authorization] poll_interval_ms` keeps the user's `timeout_ms`.

use crate::config::schema::ChatConfig;
use crate::error::{ChatError, Result};
use langgraph_client::config::load_config_file;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_DIR: &str = ".agent-chat";
const CONFIG_FILE: &str = "config.toml";

pub struct ConfigLoader {
    user_config_path: Option<PathBuf>,
    project_config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            user_config_path: dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE)),
            project_config_path: std::env::current_dir()
                .ok()
                .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE)),
        }
    }

    /// Loader reading exactly the given files.
    pub fn with_paths(user: Option<PathBuf>, project: Option<PathBuf>) -> Self {
        Self {
            user_config_path: user,
            project_config_path: project,
        }
    }

    pub fn user_config_path(&self) -> Option<&Path> {
        self.user_config_path.as_deref()
    }

    pub fn project_config_path(&self) -> Option<&Path> {
        self.project_config_path.as_deref()
    }

    /// Load defaults, then the user file, then the project file, then env.
    pub fn load(&self) -> Result<ChatConfig> {
        let mut merged = toml::Value::try_from(ChatConfig::default())
            .map_err(|e| ChatError::Config(format!("Failed to encode defaults: {}", e)))?;

        for path in [&self.user_config_path, &self.project_config_path].into_iter().flatten() {
            if !path.exists() {
                debug!(path = %path.display(), "Config file not found");
                continue;
            }
            let layer: toml::Value = load_config_file(path)?;
            debug!(path = %path.display(), "Loaded config layer");
            merge_values(&mut merged, layer);
        }

        let mut config: ChatConfig = merged
            .try_into()
            .map_err(|e| ChatError::Config(format!("Invalid configuration: {}", e)))?;
        config.apply_env()?;

        info!(api_url = %config.server.api_url, assistant_id = %config.server.assistant_id, "Configuration loaded");
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively overlay `overlay` onto `base`; tables merge, everything else replaces.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
