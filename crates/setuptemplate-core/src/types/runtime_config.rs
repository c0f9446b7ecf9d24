//! Runtime configuration types
//!
//! These types control where templates come from, how virtual environments
//! are recognised, which installer is invoked and how long external
//! commands may run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Complete runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Template repository settings
    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Virtual environment conventions
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Package installer settings
    #[serde(default)]
    pub installer: InstallerConfig,

    /// Timeouts for external commands
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Template repository settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TemplatesConfig {
    /// Repository whose branches hold the framework templates
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Substring a branch name must contain to be offered as a template
    #[serde(default = "default_branch_marker")]
    pub branch_marker: String,

    /// Frameworks offered when branch discovery is unavailable
    #[serde(default = "default_frameworks")]
    pub frameworks: Vec<FrameworkEntry>,

    /// Template variable answers used instead of the template's defaults
    #[serde(default)]
    pub default_context: BTreeMap<String, String>,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            branch_marker: default_branch_marker(),
            frameworks: default_frameworks(),
            default_context: BTreeMap::new(),
        }
    }
}

impl TemplatesConfig {
    /// Find a configured framework by display name (case-insensitive)
    pub fn framework(&self, name: &str) -> Option<&FrameworkEntry> {
        self.frameworks
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

/// A framework display name and the branch holding its template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FrameworkEntry {
    /// Name shown to the operator (e.g. "Django")
    pub name: String,
    /// Branch of the template repository (e.g. "django_template")
    pub branch: String,
}

impl FrameworkEntry {
    pub fn new(name: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branch: branch.into(),
        }
    }
}

fn default_repository() -> String {
    "https://github.com/anupam8nith/templates.git".to_string()
}
fn default_branch_marker() -> String {
    "_template".to_string()
}
fn default_frameworks() -> Vec<FrameworkEntry> {
    vec![
        FrameworkEntry::new("Django", "django_template"),
        FrameworkEntry::new("Flask", "flask_template"),
        FrameworkEntry::new("FastAPI", "fastapi_template"),
    ]
}

/// Virtual environment conventions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnvironmentConfig {
    /// Directory names recognised as virtual environments, in priority order
    #[serde(default = "default_venv_candidates")]
    pub venv_candidates: Vec<String>,

    /// How many directory levels below the project root are searched
    #[serde(default = "default_search_depth")]
    pub search_depth: usize,

    /// Python interpreter used to create virtual environments
    #[serde(default = "default_python")]
    pub python: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            venv_candidates: default_venv_candidates(),
            search_depth: default_search_depth(),
            python: default_python(),
        }
    }
}

fn default_venv_candidates() -> Vec<String> {
    vec!["venv".to_string(), ".venv".to_string(), "env".to_string()]
}
fn default_search_depth() -> usize {
    2
}
fn default_python() -> String {
    "python3".to_string()
}

/// Package installer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstallerConfig {
    /// Installer executable, resolved inside the activated environment
    #[serde(default = "default_installer_program")]
    pub program: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            program: default_installer_program(),
        }
    }
}

fn default_installer_program() -> String {
    "pip".to_string()
}

/// Timeouts for external commands; `0` disables a timeout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Timeout for `git clone` in seconds
    #[serde(default = "default_clone_timeout")]
    pub clone_timeout_secs: u64,

    /// Timeout for the dependency install command in seconds
    #[serde(default)]
    pub install_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            clone_timeout_secs: default_clone_timeout(),
            install_timeout_secs: 0,
        }
    }
}

impl NetworkConfig {
    /// Clone timeout, if enabled
    pub fn clone_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.clone_timeout_secs)
    }

    /// Install timeout, if enabled
    pub fn install_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.install_timeout_secs)
    }
}

fn default_clone_timeout() -> u64 {
    300 // 5 minutes
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
