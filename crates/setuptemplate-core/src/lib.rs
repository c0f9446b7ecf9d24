//! # setuptemplate-core
//!
//! Core library for the setuptemplate CLI providing:
//! - Runtime configuration types (template repository, venv conventions,
//!   installer settings, timeouts)
//! - Hierarchical configuration loading with precedence
//! - Shared error types

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::ConfigLoader;
pub use error::{Error, Result};
pub use types::RuntimeConfig;
pub use utils::get_home_dir;
