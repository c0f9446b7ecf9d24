//! Materialize a template source into a target directory

use super::engine::{MaterializeReport, TemplateEngine, VariablePrompter};
use super::source::TemplateSource;
use crate::error::{Error, Result};
use crate::git::{CloneOptions, GitClient};
use crate::paths::utf8_path;
use camino::Utf8Path;
use std::fs;
use tracing::{debug, info};

/// Render `source` into `target`, creating `target` (and missing parents)
/// first
///
/// Remote sources are shallow-cloned at their reference into a temporary
/// directory that is removed once rendering finishes. Existing files in
/// `target` with the same rendered path are overwritten, so rendering the same
/// template twice with the same answers yields the same tree.
///
/// # Errors
/// - [`Error::PathError`] if `target` cannot be created
/// - [`Error::SourceUnavailable`] if a remote template cannot be fetched
/// - [`Error::TemplateError`] if the template is missing or malformed
pub async fn materialize<G, E>(
    target: &Utf8Path,
    source: &TemplateSource,
    git: &G,
    engine: &E,
    prompter: &mut dyn VariablePrompter,
) -> Result<MaterializeReport>
where
    G: GitClient + ?Sized,
    E: TemplateEngine + ?Sized,
{
    info!("Materializing {} into {}", source, target);

    fs::create_dir_all(target).map_err(|e| Error::path_error(target.as_str(), e))?;

    match source {
        TemplateSource::Local(template_dir) => {
            if !template_dir.is_dir() {
                return Err(Error::template_error(format!(
                    "Template directory not found: {}",
                    template_dir
                )));
            }
            engine.render(template_dir, target, prompter)
        }
        TemplateSource::Remote { url, reference } => {
            let scratch = tempfile::Builder::new()
                .prefix("setuptemplate-template-")
                .tempdir()
                .map_err(|e| Error::path_error(std::env::temp_dir().display().to_string(), e))?;
            let checkout = utf8_path(&scratch.path().join("template"))?;

            let options = CloneOptions {
                depth: Some(1),
                branch: Some(reference.clone()),
                no_checkout: false,
            };
            git.clone_repository(url, &checkout, &options).await?;
            debug!("Template checked out at {}", checkout);

            engine.render(&checkout, target, prompter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::templates::UseDefaults;
    use async_trait::async_trait;
    use camino::Utf8PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Git that records clone requests and never touches the network
    #[derive(Default)]
    struct RecordingGit {
        clones: Mutex<Vec<(String, Option<String>, Option<u32>)>>,
        fail: bool,
    }

    #[async_trait]
    impl GitClient for RecordingGit {
        async fn clone_repository(
            &self,
            url: &str,
            destination: &Utf8Path,
            options: &CloneOptions,
        ) -> Result<()> {
            self.clones.lock().unwrap().push((
                url.to_string(),
                options.branch.clone(),
                options.depth,
            ));
            if self.fail {
                return Err(Error::source_unavailable(url, "Remote branch not found"));
            }
            fs::create_dir_all(destination)?;
            Ok(())
        }

        async fn list_refs(&self, _repository: &Utf8Path) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    /// Engine that records the directories it was asked to render
    #[derive(Default)]
    struct RecordingEngine {
        calls: Mutex<Vec<(Utf8PathBuf, Utf8PathBuf, bool)>>,
    }

    impl TemplateEngine for RecordingEngine {
        fn render(
            &self,
            template_dir: &Utf8Path,
            output_dir: &Utf8Path,
            _prompter: &mut dyn VariablePrompter,
        ) -> Result<MaterializeReport> {
            self.calls.lock().unwrap().push((
                template_dir.to_path_buf(),
                output_dir.to_path_buf(),
                template_dir.is_dir(),
            ));
            Ok(MaterializeReport {
                project_root: output_dir.join("project"),
                files: Vec::new(),
            })
        }
    }

    fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        (temp, path)
    }

    #[tokio::test]
    async fn test_remote_source_clones_reference_shallowly() {
        let (_t, root) = utf8_tempdir();
        let target = root.join("a/b/site");
        let git = RecordingGit::default();
        let engine = RecordingEngine::default();

        let source = TemplateSource::remote("https://example.com/templates.git", "flask_template");
        let report = materialize(&target, &source, &git, &engine, &mut UseDefaults)
            .await
            .unwrap();

        assert!(target.is_dir());
        assert_eq!(report.project_root, target.join("project"));
        assert_eq!(
            git.clones.lock().unwrap().as_slice(),
            &[(
                "https://example.com/templates.git".to_string(),
                Some("flask_template".to_string()),
                Some(1)
            )]
        );

        let calls = engine.calls.lock().unwrap();
        let (checkout, output, existed) = &calls[0];
        assert!(*existed);
        assert_eq!(output, &target);
        assert!(!checkout.exists(), "temporary checkout should be removed");
    }

    #[tokio::test]
    async fn test_clone_failure_is_source_unavailable() {
        let (_t, root) = utf8_tempdir();
        let git = RecordingGit {
            fail: true,
            ..Default::default()
        };
        let engine = RecordingEngine::default();

        let source = TemplateSource::remote("https://example.com/templates.git", "nope_template");
        let err = materialize(&root, &source, &git, &engine, &mut UseDefaults)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
        assert!(engine.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_local_template() {
        let (_t, root) = utf8_tempdir();
        let source = TemplateSource::local(root.join("does-not-exist"));

        let err = materialize(
            &root.join("out"),
            &source,
            &RecordingGit::default(),
            &RecordingEngine::default(),
            &mut UseDefaults,
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Template);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_uncreatable_target_is_path_error() {
        let (_t, root) = utf8_tempdir();
        fs::write(root.join("file"), "not a directory").unwrap();

        let err = materialize(
            &root.join("file/site"),
            &TemplateSource::local(root.clone()),
            &RecordingGit::default(),
            &RecordingEngine::default(),
            &mut UseDefaults,
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Path);
    }
}
