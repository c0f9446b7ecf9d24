//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Global config (~/.setuptemplate/config.yaml)
//! 3. Explicit config file (--config)
//! 4. Environment variables (SETUPTEMPLATE_* prefix)
//! 5. CLI flags (handled by caller)
//!
//! File layers are deep-merged as YAML documents before deserialization, so a
//! file only has to name the keys it changes.

use crate::error::{Error, Result};
use crate::types::RuntimeConfig;
use crate::utils::get_config_dir;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "defaults.yaml";
const GLOBAL_CONFIG_FILE: &str = "config.yaml";

/// Configuration hierarchy loader
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Directory holding the global config file
    config_dir: Utf8PathBuf,
    /// Config file passed on the command line
    explicit_file: Option<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a loader rooted at ~/.setuptemplate
    pub fn new() -> Result<Self> {
        Ok(Self::with_dir(get_config_dir()?))
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self {
            config_dir,
            explicit_file: None,
        }
    }

    /// Layer an explicit config file on top of the global one
    pub fn with_file(mut self, path: Option<Utf8PathBuf>) -> Self {
        self.explicit_file = path;
        self
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load(&self) -> Result<RuntimeConfig> {
        let mut document = Self::load_embedded_defaults()?;

        let global = self.config_dir.join(GLOBAL_CONFIG_FILE);
        if global.exists() {
            debug!("Loading global config: {}", global);
            merge_values(&mut document, Self::load_yaml_file(&global)?);
        }

        if let Some(path) = &self.explicit_file {
            if !path.exists() {
                return Err(Error::config_not_found(path.as_str()));
            }
            debug!("Loading config file: {}", path);
            merge_values(&mut document, Self::load_yaml_file(path)?);
        }

        let config: RuntimeConfig = serde_yaml_ng::from_value(document)
            .map_err(|e| Error::invalid_config(e.to_string()))?;

        Self::apply_env_overrides(config)
    }

    fn load_embedded_defaults() -> Result<Value> {
        let embedded_file = EmbeddedConfigs::get(DEFAULTS_FILE).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", DEFAULTS_FILE))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", DEFAULTS_FILE))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                DEFAULTS_FILE, e
            ))
        })
    }

    fn load_yaml_file(path: &Utf8Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("SETUPTEMPLATE_TEMPLATE_REPO") {
            config.templates.repository = val;
        }

        if let Ok(val) = env::var("SETUPTEMPLATE_BRANCH_MARKER") {
            config.templates.branch_marker = val;
        }

        if let Ok(val) = env::var("SETUPTEMPLATE_VENV_CANDIDATES") {
            config.environment.venv_candidates = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(val) = env::var("SETUPTEMPLATE_PYTHON") {
            config.environment.python = val;
        }

        if let Ok(val) = env::var("SETUPTEMPLATE_PIP") {
            config.installer.program = val;
        }

        if let Ok(val) = env::var("SETUPTEMPLATE_CLONE_TIMEOUT_SECS") {
            config.network.clone_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("SETUPTEMPLATE_CLONE_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("SETUPTEMPLATE_INSTALL_TIMEOUT_SECS") {
            config.network.install_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("SETUPTEMPLATE_INSTALL_TIMEOUT_SECS must be a valid number")
            })?;
        }

        Ok(config)
    }
}

/// Deep-merge `overlay` into `base`; mappings merge key by key, anything else replaces
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
