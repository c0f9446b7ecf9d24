//! # setuptemplate-projects
//!
//! Project scaffolding library for the setuptemplate CLI providing:
//! - Template branch discovery over a git repository
//! - Framework selection with a pluggable answer source
//! - Project materialization from local or remote cookiecutter-style templates
//! - Virtual environment lookup and creation
//! - Dependency installation inside the located environment
//!
//! # Examples
//!
//! ## Discover template branches
//!
//! ```no_run
//! use setuptemplate_projects::git::{discover_templates, SystemGit};
//!
//! # async fn example() -> setuptemplate_projects::Result<()> {
//! let git = SystemGit::with_timeout(None);
//! let branches =
//!     discover_templates(&git, "https://github.com/anupam8nith/templates.git", "_template")
//!         .await?;
//! for branch in branches {
//!     println!("{}", branch);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Materialize a local template without prompting
//!
//! ```no_run
//! use camino::Utf8Path;
//! use setuptemplate_projects::git::SystemGit;
//! use setuptemplate_projects::templates::{materialize, CookiecutterEngine, TemplateSource, UseDefaults};
//!
//! # async fn example() -> setuptemplate_projects::Result<()> {
//! let source = TemplateSource::local("templates/base_django_project");
//! let report = materialize(
//!     Utf8Path::new("/tmp/my-site"),
//!     &source,
//!     &SystemGit::with_timeout(None),
//!     &CookiecutterEngine::new(),
//!     &mut UseDefaults,
//! )
//! .await?;
//! println!("Project created at {}", report.project_root);
//! # Ok(())
//! # }
//! ```

pub mod environment;
pub mod error;
pub mod git;
mod paths;
pub mod process;
pub mod selector;
pub mod templates;

pub use error::{Error, ErrorKind, Result};
