//! Project templates
//!
//! Materialization turns a [`TemplateSource`] into a project tree:
//!
//! - `source`: where a template comes from (local directory or repository + ref)
//! - `engine`: the [`TemplateEngine`] seam and the variable prompting seam
//! - `cookiecutter`: the Tera-backed engine for cookiecutter-layout templates
//! - `materialize`: resolves the source and drives the engine
//!
//! # Template layout
//!
//! ```text
//! base_django_project/
//! ├── cookiecutter.json                    # variables and defaults
//! └── {{cookiecutter.project_name}}/       # rendered into the output directory
//!     ├── manage.py
//!     └── {{cookiecutter.project_name}}/
//!         └── settings.py
//! ```

mod cookiecutter;
mod engine;
mod materialize;
mod source;

pub use cookiecutter::CookiecutterEngine;
pub use engine::{
    MaterializeReport, PresetAnswers, TemplateEngine, UseDefaults, VariablePrompter,
};
pub use materialize::materialize;
pub use source::TemplateSource;
