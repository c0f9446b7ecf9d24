//! Template branch discovery
//!
//! The template repository keeps one framework template per branch. Discovery
//! clones the repository into a scratch directory, enumerates its refs and
//! keeps the branch names that carry the template marker.

use super::client::{CloneOptions, GitClient};
use crate::error::{Error, Result};
use crate::paths::utf8_path;
use tracing::{debug, info};

/// Clone `repo_url` into a temporary directory and list the branch/tag names
/// containing `marker`, in ref enumeration order
///
/// The temporary clone is removed before returning, on success and on failure.
///
/// # Errors
/// Returns [`Error::SourceUnavailable`] when the repository cannot be cloned
/// or its refs cannot be listed.
pub async fn discover_templates<G>(git: &G, repo_url: &str, marker: &str) -> Result<Vec<String>>
where
    G: GitClient + ?Sized,
{
    info!("Discovering templates in {}", repo_url);

    let scratch = tempfile::Builder::new()
        .prefix("setuptemplate-refs-")
        .tempdir()
        .map_err(|e| Error::path_error(std::env::temp_dir().display().to_string(), e))?;
    let checkout = utf8_path(&scratch.path().join("repo"))?;

    let options = CloneOptions {
        no_checkout: true,
        ..Default::default()
    };
    git.clone_repository(repo_url, &checkout, &options).await?;

    let refs = git.list_refs(&checkout).await?;
    debug!("Found {} refs", refs.len());

    let branches = filter_by_marker(short_ref_names(&refs), marker);
    info!("Found {} template branch(es)", branches.len());

    Ok(branches)
}

/// Reduce full ref names to short branch/tag names
///
/// `refs/remotes/<remote>/<name>`, `refs/heads/<name>` and `refs/tags/<name>`
/// become `<name>`. Symbolic `HEAD` refs are dropped, and a name seen twice
/// (a branch and a tag, or two remotes) is kept only once, at its first
/// position.
pub fn short_ref_names<S: AsRef<str>>(refs: &[S]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for full in refs {
        let full = full.as_ref();
        let short = if let Some(rest) = full.strip_prefix("refs/remotes/") {
            match rest.split_once('/') {
                Some((_remote, name)) => name,
                None => continue,
            }
        } else if let Some(name) = full.strip_prefix("refs/heads/") {
            name
        } else if let Some(name) = full.strip_prefix("refs/tags/") {
            name
        } else {
            full
        };

        if short.is_empty() || short == "HEAD" {
            continue;
        }

        if !names.iter().any(|n| n == short) {
            names.push(short.to_string());
        }
    }

    names
}

/// Keep only names containing `marker`, preserving order
pub fn filter_by_marker(names: Vec<String>, marker: &str) -> Vec<String> {
    names.into_iter().filter(|n| n.contains(marker)).collect()
}
