//! Type definitions shared across setuptemplate crates

mod runtime_config;

pub use runtime_config::{
    EnvironmentConfig, FrameworkEntry, InstallerConfig, NetworkConfig, RuntimeConfig,
    TemplatesConfig,
};
