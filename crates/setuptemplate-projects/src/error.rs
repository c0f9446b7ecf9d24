//! Error types for setuptemplate-projects

use thiserror::Error;

/// Result type alias using setuptemplate-projects's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of failures, used for reporting and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Remote template or repository unreachable
    SourceUnavailable,
    /// Template malformed or rejected by the rendering engine
    Template,
    /// Filesystem target not creatable or writable
    Path,
    /// No usable virtual environment
    VenvNotFound,
    /// Dependency manifest missing
    ManifestNotFound,
    /// Installer or venv command failed
    InstallFailed,
    /// Anything else
    Unexpected,
}

impl ErrorKind {
    /// Process exit code reported for this kind of failure
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Unexpected => 1,
            Self::SourceUnavailable => 3,
            Self::Template => 4,
            Self::Path => 5,
            Self::VenvNotFound => 6,
            Self::ManifestNotFound => 7,
            Self::InstallFailed => 8,
        }
    }

    /// Human-readable name of the kind
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceUnavailable => "SourceUnavailable",
            Self::Template => "TemplateError",
            Self::Path => "PathError",
            Self::VenvNotFound => "VenvNotFound",
            Self::ManifestNotFound => "ManifestNotFound",
            Self::InstallFailed => "InstallFailed",
            Self::Unexpected => "UnexpectedError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project scaffolding error types
#[derive(Error, Debug)]
pub enum Error {
    /// Template repository could not be reached or cloned
    #[error("Template source unavailable: {location}: {reason}")]
    SourceUnavailable { location: String, reason: String },

    /// Template is malformed or incompatible
    #[error("Template error: {message}")]
    TemplateError { message: String },

    /// Filesystem target cannot be created or written
    #[error("Cannot use path {path}: {reason}")]
    PathError { path: String, reason: String },

    /// Virtual environment not found
    #[error("Virtual environment not found: {message}")]
    VenvNotFound {
        message: String,
        hint: Option<String>,
    },

    /// Requirements file not found
    #[error("Requirements file not found at: {path}")]
    ManifestNotFound { path: String },

    /// Installer command failed
    #[error("Dependency installation failed: {message}")]
    InstallFailed { message: String },

    /// Anything not covered above
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Glob pattern error
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    /// Directory traversal error
    #[error("Cannot walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] setuptemplate_core::Error),
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            Self::TemplateError { .. } | Self::JsonParse(_) | Self::Glob(_) => ErrorKind::Template,
            Self::PathError { .. } | Self::Walk(_) => ErrorKind::Path,
            Self::VenvNotFound { .. } => ErrorKind::VenvNotFound,
            Self::ManifestNotFound { .. } => ErrorKind::ManifestNotFound,
            Self::InstallFailed { .. } => ErrorKind::InstallFailed,
            Self::Unexpected(_) | Self::Io(_) | Self::Core(_) => ErrorKind::Unexpected,
        }
    }

    /// Operator guidance attached to the error, if any
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::VenvNotFound { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    /// Create a source unavailable error
    pub fn source_unavailable(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Create a template error
    pub fn template_error(message: impl Into<String>) -> Self {
        Self::TemplateError {
            message: message.into(),
        }
    }

    /// Create a path error
    pub fn path_error(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::PathError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a venv not found error
    pub fn venv_not_found(message: impl Into<String>, hint: Option<String>) -> Self {
        Self::VenvNotFound {
            message: message.into(),
            hint,
        }
    }

    /// Create a manifest not found error
    pub fn manifest_not_found(path: impl Into<String>) -> Self {
        Self::ManifestNotFound { path: path.into() }
    }

    /// Create an install failed error
    pub fn install_failed(message: impl Into<String>) -> Self {
        Self::InstallFailed {
            message: message.into(),
        }
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

impl From<tera::Error> for Error {
    fn from(err: tera::Error) -> Self {
        // Tera's top-level message only names the template; the cause is in the chain.
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::template_error(message)
    }
}
