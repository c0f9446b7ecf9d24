//! Path conversion helpers

use crate::error::{Error, Result};
use camino::Utf8PathBuf;
use std::path::Path;

/// Convert a std path into a UTF-8 path, reporting non-UTF-8 paths as path errors
pub(crate) fn utf8_path(path: &Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).map_err(|p| {
        Error::path_error(p.display().to_string(), "path is not valid UTF-8")
    })
}
