//! Git operations module
//!
//! Git itself is consumed through the `git` executable; this module wraps the
//! two operations the scaffolder needs (clone and ref enumeration) behind the
//! [`GitClient`] trait and builds template branch discovery on top of them.
//!
//! # Examples
//!
//! ```no_run
//! use setuptemplate_projects::git::{discover_templates, SystemGit};
//!
//! # async fn example() -> setuptemplate_projects::Result<()> {
//! let branches = discover_templates(
//!     &SystemGit::with_timeout(None),
//!     "https://github.com/anupam8nith/templates.git",
//!     "_template",
//! )
//! .await?;
//! assert!(branches.iter().all(|b| b.contains("_template")));
//! # Ok(())
//! # }
//! ```

mod client;
mod discovery;

pub use client::{CloneOptions, GitClient, SystemGit};
pub use discovery::{discover_templates, filter_by_marker, short_ref_names};
