//! Per-invocation application context

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use setuptemplate_core::{ConfigLoader, RuntimeConfig};

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Layered runtime configuration
    pub config: RuntimeConfig,
    /// Suppress status output
    pub quiet: bool,
}

impl AppContext {
    /// Load configuration, layering `config_file` over the global config
    pub fn load(config_file: Option<Utf8PathBuf>, quiet: bool) -> Result<Self> {
        let loader = ConfigLoader::new()
            .context("Failed to locate the configuration directory")?
            .with_file(config_file);
        let config = loader.load().with_context(|| {
            format!("Failed to load configuration from {}", loader.config_dir())
        })?;

        Ok(Self { config, quiet })
    }

    /// Print a status line unless quiet
    pub fn status(&self, print: impl FnOnce()) {
        if !self.quiet {
            print();
        }
    }
}
