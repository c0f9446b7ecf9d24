//! Template source definitions

use camino::Utf8PathBuf;
use std::fmt;

/// Where a template is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Template directory on the local filesystem
    Local(Utf8PathBuf),
    /// Repository URL and the branch or tag holding the template
    Remote { url: String, reference: String },
}

impl TemplateSource {
    pub fn local(path: impl Into<Utf8PathBuf>) -> Self {
        Self::Local(path.into())
    }

    pub fn remote(url: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::Remote {
            url: url.into(),
            reference: reference.into(),
        }
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path),
            Self::Remote { url, reference } => write!(f, "{}@{}", url, reference),
        }
    }
}
