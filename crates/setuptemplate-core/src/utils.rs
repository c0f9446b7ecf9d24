//! Shared utility functions for setuptemplate crates

use crate::error::{Error, Result};
use camino::Utf8PathBuf;

/// Get the user's home directory
///
/// Prefers the HOME environment variable over `dirs::home_dir()` so that a
/// HOME override (containers, CI sandboxes) is respected.
pub fn get_home_dir() -> Result<Utf8PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(Utf8PathBuf::from(home));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| Error::invalid_config("Could not determine home directory"))?;
    Utf8PathBuf::from_path_buf(home)
        .map_err(|p| Error::invalid_config(format!("Home directory is not UTF-8: {}", p.display())))
}

/// Get the setuptemplate configuration directory (~/.setuptemplate)
pub fn get_config_dir() -> Result<Utf8PathBuf> {
    Ok(get_home_dir()?.join(".setuptemplate"))
}
