//! Dependency manifest resolution

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Manifest looked up in the project root when none is given
pub const DEFAULT_MANIFEST: &str = "requirements.txt";

/// Resolve the requirements file for `project`
///
/// An explicit path is used as given (relative paths resolve against the
/// working directory); otherwise `project/requirements.txt` is expected.
pub fn resolve_manifest(project: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    let manifest = match explicit {
        Some(path) => path.to_path_buf(),
        None => project.join(DEFAULT_MANIFEST),
    };

    if manifest.is_file() {
        Ok(manifest)
    } else {
        Err(Error::manifest_not_found(manifest.as_str()))
    }
}
