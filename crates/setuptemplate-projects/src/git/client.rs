//! Git client seam and the `git` executable implementation

use crate::error::{Error, Result};
use crate::process::{CommandRunner, CommandSpec, SystemRunner};
use async_trait::async_trait;
use camino::Utf8Path;
use std::io;
use std::time::Duration;
use tracing::{debug, info};

/// Options for cloning a repository
#[derive(Debug, Clone, Default)]
pub struct CloneOptions {
    /// Shallow clone with specified depth
    pub depth: Option<u32>,
    /// Branch or tag to check out
    pub branch: Option<String>,
    /// Skip populating the working tree
    pub no_checkout: bool,
}

/// The git operations the scaffolder relies on
#[async_trait]
pub trait GitClient: Send + Sync {
    /// Clone `url` into `destination`
    ///
    /// Any failure to obtain the repository is reported as
    /// [`Error::SourceUnavailable`].
    async fn clone_repository(
        &self,
        url: &str,
        destination: &Utf8Path,
        options: &CloneOptions,
    ) -> Result<()>;

    /// List the full names of all refs (`refs/remotes/...`, `refs/tags/...`)
    /// of a local repository in enumeration order
    async fn list_refs(&self, repository: &Utf8Path) -> Result<Vec<String>>;
}

/// Git client backed by the `git` executable
#[derive(Debug, Clone, Default)]
pub struct SystemGit<R = SystemRunner> {
    runner: R,
}

impl SystemGit<SystemRunner> {
    /// Run the installed `git`, killing any invocation that exceeds `timeout`
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self::new(SystemRunner::new().with_timeout(timeout))
    }
}

impl<R: CommandRunner> SystemGit<R> {
    /// Create a client running git through `runner`
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl<R: CommandRunner> GitClient for SystemGit<R> {
    async fn clone_repository(
        &self,
        url: &str,
        destination: &Utf8Path,
        options: &CloneOptions,
    ) -> Result<()> {
        info!("Cloning repository: {} -> {}", url, destination);

        let mut cmd = CommandSpec::new("git").args(["clone", "--quiet"]);

        if let Some(depth) = options.depth {
            cmd = cmd.arg("--depth").arg(depth.to_string());
        }

        if let Some(branch) = &options.branch {
            cmd = cmd.arg("--branch").arg(branch);
        }

        if options.no_checkout {
            cmd = cmd.arg("--no-checkout");
        }

        cmd = cmd.arg(url).arg(destination.as_str());

        let output = self
            .runner
            .run(&cmd)
            .await
            .map_err(|e| Error::source_unavailable(url, describe_io_failure(&e)))?;

        if !output.success {
            return Err(Error::source_unavailable(url, output.stderr.trim()));
        }

        debug!("Repository cloned successfully");
        Ok(())
    }

    async fn list_refs(&self, repository: &Utf8Path) -> Result<Vec<String>> {
        let cmd = CommandSpec::new("git")
            .args(["for-each-ref", "--format=%(refname)", "refs/remotes", "refs/tags"])
            .current_dir(repository);

        let output = self
            .runner
            .run(&cmd)
            .await
            .map_err(|e| Error::source_unavailable(repository.as_str(), describe_io_failure(&e)))?;

        if !output.success {
            return Err(Error::source_unavailable(
                repository.as_str(),
                format!("git for-each-ref failed: {}", output.stderr.trim()),
            ));
        }

        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

fn describe_io_failure(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => {
            "git command not found. Please ensure git is installed and in PATH".to_string()
        }
        _ => err.to_string(),
    }
}
