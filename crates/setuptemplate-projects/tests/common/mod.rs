//! Shared fixtures and test doubles for setuptemplate-projects integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use setuptemplate_projects::git::{CloneOptions, GitClient};
use setuptemplate_projects::process::{CommandOutput, CommandRunner, CommandSpec};
use setuptemplate_projects::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::sync::Mutex;
use tempfile::TempDir;
use walkdir::WalkDir;

/// The on-disk Django-style template used across tests
pub fn fixture_template() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("base_django_project")
}

/// A temporary directory with a UTF-8 path
pub fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("temp path is UTF-8");
    (temp, path)
}

/// Recursively copy `from` into `to`
pub fn copy_tree(from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let destination = to.as_std_path().join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(destination)?;
        } else {
            fs::copy(entry.path(), destination)?;
        }
    }
    Ok(())
}

/// Relative path -> contents for every file under `root`
pub fn snapshot(root: &Utf8Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap();
            (
                relative.to_string_lossy().replace('\\', "/"),
                fs::read(e.path()).unwrap(),
            )
        })
        .collect()
}

/// Git double that "clones" known branches by copying a local template
pub struct FixtureGit {
    branches: BTreeMap<String, Utf8PathBuf>,
    pub clones: Mutex<Vec<(String, CloneOptions)>>,
}

impl FixtureGit {
    pub fn new() -> Self {
        Self {
            branches: BTreeMap::new(),
            clones: Mutex::new(Vec::new()),
        }
    }

    pub fn with_branch(mut self, branch: &str, template: Utf8PathBuf) -> Self {
        self.branches.insert(branch.to_string(), template);
        self
    }
}

#[async_trait]
impl GitClient for FixtureGit {
    async fn clone_repository(
        &self,
        url: &str,
        destination: &Utf8Path,
        options: &CloneOptions,
    ) -> Result<()> {
        self.clones
            .lock()
            .unwrap()
            .push((url.to_string(), options.clone()));

        let branch = options.branch.clone().unwrap_or_default();
        let template = self.branches.get(&branch).ok_or_else(|| {
            Error::source_unavailable(url, format!("Remote branch {} not found in upstream origin", branch))
        })?;
        copy_tree(template, destination)?;
        Ok(())
    }

    async fn list_refs(&self, _repository: &Utf8Path) -> Result<Vec<String>> {
        Ok(self
            .branches
            .keys()
            .map(|b| format!("refs/remotes/origin/{}", b))
            .collect())
    }
}

/// Command runner that records every invocation and reports success
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(spec.clone());
        Ok(CommandOutput {
            code: Some(0),
            success: true,
            ..Default::default()
        })
    }
}
