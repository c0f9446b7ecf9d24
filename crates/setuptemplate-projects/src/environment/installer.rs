//! Dependency installation inside a virtual environment

use super::requirements::resolve_manifest;
use super::venv::{locate_venv, Environment, Platform};
use crate::error::{Error, Result};
use crate::process::{CommandRunner, CommandSpec};
use camino::{Utf8Path, Utf8PathBuf};
use setuptemplate_core::RuntimeConfig;
use std::io;
use tracing::{info, warn};

/// What to install and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    /// Project directory
    pub project: Utf8PathBuf,
    /// Requirements file; defaults to `project/requirements.txt`
    pub requirements: Option<Utf8PathBuf>,
    /// Environment directory name; searched for when absent
    pub venv: Option<String>,
}

impl InstallRequest {
    pub fn new(project: impl Into<Utf8PathBuf>) -> Self {
        Self {
            project: project.into(),
            requirements: None,
            venv: None,
        }
    }

    pub fn with_requirements(mut self, requirements: Option<Utf8PathBuf>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_venv(mut self, venv: Option<String>) -> Self {
        self.venv = venv;
        self
    }
}

/// A completed installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub manifest: Utf8PathBuf,
    pub environment: Environment,
    /// The invocation that ran
    pub command: CommandSpec,
}

/// Build the shell invocation that activates `env` and installs `manifest`
///
/// Activation and installation share one shell so the installer sees the
/// activated environment.
pub fn install_command(
    platform: Platform,
    env: &Environment,
    manifest: &Utf8Path,
    program: &str,
) -> CommandSpec {
    let activate = env.activation_script(platform);
    match platform {
        Platform::Posix => CommandSpec::new("sh").args([
            "-c",
            ". \"$1\" && shift && exec \"$@\"",
            "setuptemplate",
            activate.as_str(),
            program,
            "install",
            "-r",
            manifest.as_str(),
        ]),
        Platform::Windows => CommandSpec::new("cmd").args([
            "/C",
            "call",
            activate.as_str(),
            "&&",
            program,
            "install",
            "-r",
            manifest.as_str(),
        ]),
    }
}

/// Install the project's requirements into its virtual environment
///
/// The manifest is resolved first, then the environment. Nothing is run
/// unless both exist; the installer is never run outside an environment.
///
/// # Errors
/// - [`Error::ManifestNotFound`] when the requirements file is missing
/// - [`Error::VenvNotFound`] when no environment is found
/// - [`Error::InstallFailed`] when the installer cannot start, times out or
///   exits unsuccessfully
pub async fn install<R>(
    runner: &R,
    request: &InstallRequest,
    config: &RuntimeConfig,
    platform: Platform,
) -> Result<InstallOutcome>
where
    R: CommandRunner + ?Sized,
{
    let manifest = resolve_manifest(&request.project, request.requirements.as_deref())?;
    let environment = locate_venv(
        &request.project,
        request.venv.as_deref(),
        &config.environment,
    )?;

    let command = install_command(platform, &environment, &manifest, &config.installer.program);
    info!("Installing {} into {}", manifest, environment.path);

    let output = runner.run(&command).await.map_err(|e| match e.kind() {
        io::ErrorKind::TimedOut => Error::install_failed(e.to_string()),
        _ => Error::install_failed(format!("could not run `{}`: {}", command.display(), e)),
    })?;

    if !output.success {
        warn!("Installer exited with {}", output.status_description());
        let detail = output.stderr.trim();
        return Err(Error::install_failed(if detail.is_empty() {
            format!("{} exited with {}", config.installer.program, output.status_description())
        } else {
            format!(
                "{} exited with {}: {}",
                config.installer.program,
                output.status_description(),
                detail
            )
        }));
    }

    Ok(InstallOutcome {
        manifest,
        environment,
        command,
    })
}
