//! Python environment handling
//!
//! - `venv`: locating and creating virtual environments inside a project
//! - `requirements`: resolving the dependency manifest
//! - `installer`: running the package installer inside an environment

mod installer;
mod requirements;
mod venv;

pub use installer::{install, install_command, InstallOutcome, InstallRequest};
pub use requirements::{resolve_manifest, DEFAULT_MANIFEST};
pub use venv::{create_venv, locate_venv, Environment, Platform};
