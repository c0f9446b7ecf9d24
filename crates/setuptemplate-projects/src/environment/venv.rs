//! Virtual environment lookup and creation

use crate::error::{Error, Result};
use crate::paths::utf8_path;
use crate::process::{CommandRunner, CommandSpec};
use camino::{Utf8Path, Utf8PathBuf};
use setuptemplate_core::types::EnvironmentConfig;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Directories never searched for environments
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules"];

/// Operating system family, which decides the activation script layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Posix,
}

impl Platform {
    /// The platform this binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Activation script of the environment at `venv`
    pub fn activation_script(self, venv: &Utf8Path) -> Utf8PathBuf {
        match self {
            Self::Windows => venv.join("Scripts").join("activate.bat"),
            Self::Posix => venv.join("bin").join("activate"),
        }
    }
}

/// A virtual environment inside a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Project directory the environment belongs to
    pub root: Utf8PathBuf,
    /// Location relative to the project (e.g. `.venv` or `backend/venv`)
    pub name: String,
    /// Absolute or project-joined location of the environment
    pub path: Utf8PathBuf,
}

impl Environment {
    fn new(root: &Utf8Path, path: Utf8PathBuf) -> Self {
        let name = path
            .strip_prefix(root)
            .map(|p| p.to_string())
            .unwrap_or_else(|_| path.to_string());
        Self {
            root: root.to_path_buf(),
            name,
            path,
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Activation script path; derived only, not checked for existence
    pub fn activation_script(&self, platform: Platform) -> Utf8PathBuf {
        platform.activation_script(&self.path)
    }
}

/// Find the virtual environment of `project`
///
/// With an explicit `name`, only `project/name` is considered. Otherwise the
/// project is searched up to `config.search_depth` levels deep for directories
/// named like one of `config.venv_candidates`. When several match, the
/// shallowest wins, then the earlier candidate name, then the path order.
///
/// # Errors
/// - [`Error::VenvNotFound`] when no environment matches
/// - [`Error::PathError`] when the project directory is missing
pub fn locate_venv(
    project: &Utf8Path,
    name: Option<&str>,
    config: &EnvironmentConfig,
) -> Result<Environment> {
    if let Some(name) = name {
        let env = Environment::new(project, project.join(name));
        if env.exists() {
            info!("Using virtual environment {}", env.path);
            return Ok(env);
        }
        return Err(Error::venv_not_found(
            format!("'{}' not found in {}", name, project),
            Some(format!("{} -m venv {}", config.python, env.path)),
        ));
    }

    if !project.is_dir() {
        return Err(Error::path_error(project.as_str(), "not a directory"));
    }

    let mut matches = find_candidates(project, config)?;
    matches.sort();

    let mut ranked = matches.into_iter();
    let Some((_, _, chosen)) = ranked.next() else {
        return Err(Error::venv_not_found(
            format!(
                "none of [{}] found in {}",
                config.venv_candidates.join(", "),
                project
            ),
            Some(format!("{} -m venv .venv", config.python)),
        ));
    };

    info!("Using virtual environment {}", chosen);
    for (_, _, ignored) in ranked {
        info!("Ignoring additional virtual environment {}", ignored);
    }

    Ok(Environment::new(project, chosen))
}

/// Matching directories as `(depth, candidate rank, path)`
fn find_candidates(
    project: &Utf8Path,
    config: &EnvironmentConfig,
) -> Result<Vec<(usize, usize, Utf8PathBuf)>> {
    let mut matches = Vec::new();
    let mut walker = WalkDir::new(project)
        .min_depth(1)
        .max_depth(config.search_depth)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                debug!("Skipping unreadable entry: {}", err);
                continue;
            }
        };

        let is_dir =
            entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir());
        if !is_dir {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let file_name: &str = &file_name;
        if SKIPPED_DIRS.contains(&file_name) {
            // Symlinks are not entered
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            continue;
        }

        if let Some(rank) = config
            .venv_candidates
            .iter()
            .position(|candidate| candidate == file_name)
        {
            debug!("Candidate virtual environment: {}", entry.path().display());
            matches.push((entry.depth(), rank, utf8_path(entry.path())?));
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
        }
    }

    Ok(matches)
}

/// Create `project/name` with `<python> -m venv`, reusing an existing directory
///
/// # Errors
/// Returns [`Error::InstallFailed`] when the interpreter cannot be started or
/// exits unsuccessfully.
pub async fn create_venv<R>(
    runner: &R,
    project: &Utf8Path,
    name: &str,
    python: &str,
) -> Result<Environment>
where
    R: CommandRunner + ?Sized,
{
    if name.trim().is_empty() {
        return Err(Error::path_error(project.as_str(), "virtual environment name is empty"));
    }

    let env = Environment::new(project, project.join(name));
    if env.exists() {
        info!("Reusing existing virtual environment {}", env.path);
        return Ok(env);
    }

    let cmd = CommandSpec::new(python)
        .args(["-m", "venv"])
        .arg(env.path.as_str());
    info!("Creating virtual environment: {}", cmd.display());

    let output = runner.run(&cmd).await.map_err(|e| {
        Error::install_failed(format!("could not run `{}`: {}", cmd.display(), e))
    })?;

    if !output.success {
        return Err(Error::install_failed(format!(
            "`{}` failed with {}: {}",
            cmd.display(),
            output.status_description(),
            output.stderr.trim()
        )));
    }

    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::process::CommandOutput;
    use async_trait::async_trait;
    use std::fs;
    use std::io;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn project() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        (temp, path)
    }

    fn mkdirs(root: &Utf8Path, dirs: &[&str]) {
        for dir in dirs {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
    }

    #[test]
    fn test_activation_script_layout() {
        let venv = Utf8Path::new("proj/venv");
        assert_eq!(
            Platform::Posix.activation_script(venv),
            Utf8PathBuf::from("proj/venv/bin/activate")
        );
        assert_eq!(
            Platform::Windows.activation_script(venv),
            Utf8Path::new("proj/venv").join("Scripts").join("activate.bat")
        );
    }

    #[test]
    fn test_explicit_name() {
        let (_t, root) = project();
        mkdirs(&root, &["venv"]);
        let env = locate_venv(&root, Some("venv"), &EnvironmentConfig::default()).unwrap();
        assert_eq!(env.path, root.join("venv"));
        assert_eq!(env.name, "venv");
    }

    #[test]
    fn test_explicit_name_has_no_fallback() {
        let (_t, root) = project();
        mkdirs(&root, &["venv"]);
        let err = locate_venv(&root, Some(".venv"), &EnvironmentConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VenvNotFound);
        assert!(err.hint().unwrap().contains("-m venv"));
    }

    #[test]
    fn test_search_prefers_shallow_then_candidate_order() {
        let (_t, root) = project();
        mkdirs(&root, &["app/venv", "env", ".venv"]);
        let env = locate_venv(&root, None, &EnvironmentConfig::default()).unwrap();
        assert_eq!(env.name, ".venv");
    }

    #[test]
    fn test_search_finds_nested_environment() {
        let (_t, root) = project();
        mkdirs(&root, &["backend/venv/lib", "node_modules/venv", ".git/env"]);
        let env = locate_venv(&root, None, &EnvironmentConfig::default()).unwrap();
        assert_eq!(env.name, "backend/venv");
    }

    #[test]
    fn test_search_respects_depth() {
        let (_t, root) = project();
        mkdirs(&root, &["a/b/venv"]);
        let err = locate_venv(&root, None, &EnvironmentConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VenvNotFound);
        assert_eq!(err.hint(), Some("python3 -m venv .venv"));
    }

    #[test]
    fn test_files_named_like_candidates_are_ignored() {
        let (_t, root) = project();
        fs::write(root.join("env"), "SECRET=1").unwrap();
        let err = locate_venv(&root, None, &EnvironmentConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VenvNotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_skipped_dir_keeps_siblings() {
        let (_t, root) = project();
        let (_e, elsewhere) = project();
        mkdirs(&root, &["venv/bin"]);
        std::os::unix::fs::symlink(elsewhere.as_std_path(), root.join("node_modules")).unwrap();

        let env = locate_venv(&root, None, &EnvironmentConfig::default()).unwrap();
        assert_eq!(env.path, root.join("venv"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_candidate_keeps_siblings() {
        let (_t, root) = project();
        let (_e, elsewhere) = project();
        std::os::unix::fs::symlink(elsewhere.as_std_path(), root.join(".venv")).unwrap();
        mkdirs(&root, &["env"]);

        let env = locate_venv(&root, None, &EnvironmentConfig::default()).unwrap();
        assert_eq!(env.name, ".venv");
    }

    struct Recorder {
        calls: Mutex<Vec<CommandSpec>>,
        success: bool,
    }

    #[async_trait]
    impl CommandRunner for Recorder {
        async fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
            self.calls.lock().unwrap().push(spec.clone());
            Ok(CommandOutput {
                code: Some(if self.success { 0 } else { 1 }),
                success: self.success,
                stderr: "No module named venv".to_string(),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_create_venv_runs_python_once() {
        let (_t, root) = project();
        let runner = Recorder {
            calls: Mutex::new(Vec::new()),
            success: true,
        };
        let env = create_venv(&runner, &root, ".venv", "python3").await.unwrap();
        assert_eq!(env.path, root.join(".venv"));

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "python3");
        assert_eq!(calls[0].args, vec!["-m", "venv", root.join(".venv").as_str()]);
    }

    #[tokio::test]
    async fn test_create_venv_reuses_existing() {
        let (_t, root) = project();
        mkdirs(&root, &[".venv"]);
        let runner = Recorder {
            calls: Mutex::new(Vec::new()),
            success: true,
        };
        create_venv(&runner, &root, ".venv", "python3").await.unwrap();
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_venv_failure() {
        let (_t, root) = project();
        let runner = Recorder {
            calls: Mutex::new(Vec::new()),
            success: false,
        };
        let err = create_venv(&runner, &root, ".venv", "python3").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InstallFailed);
        assert!(err.to_string().contains("No module named venv"));
    }
}
