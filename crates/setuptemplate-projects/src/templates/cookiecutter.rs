//! Tera-backed rendering of cookiecutter-layout templates
//!
//! Handles:
//! - Variable definitions from `cookiecutter.json` (defaults, choice lists,
//!   private `_` keys), with defaults rendered against earlier answers
//! - Templated directory and file names
//! - File bodies rendered with `{{ cookiecutter.<name> }}` in scope
//! - `_copy_without_render` globs and binary files copied verbatim

use super::engine::{MaterializeReport, TemplateEngine, VariablePrompter};
use crate::error::{Error, Result};
use crate::paths::utf8_path;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::{Map, Value};
use std::fs;
use tera::{Context, Tera};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Variable definitions file at the template root
pub const CONTEXT_FILE: &str = "cookiecutter.json";

/// Name the variables are exposed under inside templates
const CONTEXT_KEY: &str = "cookiecutter";

/// Private variable listing globs that are copied without rendering
const COPY_WITHOUT_RENDER: &str = "_copy_without_render";

/// Template engine for cookiecutter-layout template directories
#[derive(Debug, Clone, Copy, Default)]
pub struct CookiecutterEngine;

impl CookiecutterEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self
    }

    /// Read the variable definitions of a template, keeping file order
    pub fn load_variables(template_dir: &Utf8Path) -> Result<Map<String, Value>> {
        let path = template_dir.join(CONTEXT_FILE);
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::template_error(format!("Cannot read {}: {}", path, e)))?;

        let parsed: Value = serde_json::from_str(&content)
            .map_err(|e| Error::template_error(format!("Invalid {}: {}", path, e)))?;

        match parsed {
            Value::Object(map) => Ok(map),
            _ => Err(Error::template_error(format!(
                "{} must contain a JSON object",
                path
            ))),
        }
    }

    /// Resolve every variable, asking `prompter` for public ones
    pub fn collect_variables(
        definitions: Map<String, Value>,
        prompter: &mut dyn VariablePrompter,
    ) -> Result<Map<String, Value>> {
        let mut resolved = Map::new();

        for (name, definition) in definitions {
            if name.starts_with('_') {
                resolved.insert(name, definition);
                continue;
            }

            let context = tera_context(&resolved);
            let value = match definition {
                Value::String(default) => {
                    let default = render_str(&default, &context)?;
                    Value::String(prompter.text(&name, &default)?)
                }
                Value::Array(items) => {
                    let options = items
                        .iter()
                        .map(|item| match item {
                            Value::String(s) => render_str(s, &context),
                            other => Ok(other.to_string()),
                        })
                        .collect::<Result<Vec<_>>>()?;

                    if options.is_empty() {
                        return Err(Error::template_error(format!(
                            "Choice variable `{}` has no options",
                            name
                        )));
                    }

                    let index = prompter.choice(&name, &options)?;
                    let chosen = options.into_iter().nth(index).ok_or_else(|| {
                        Error::template_error(format!("Invalid choice for `{}`", name))
                    })?;
                    Value::String(chosen)
                }
                other => other,
            };

            debug!("Template variable {} = {}", name, value);
            resolved.insert(name, value);
        }

        Ok(resolved)
    }

    fn render_tree(
        &self,
        template_dir: &Utf8Path,
        project_dir: &Utf8Path,
        output_dir: &Utf8Path,
        context: &Context,
        verbatim: &GlobSet,
    ) -> Result<MaterializeReport> {
        let mut project_root = None;
        let mut files = Vec::new();

        for entry in WalkDir::new(project_dir).sort_by_file_name() {
            let entry = entry
                .map_err(|e| Error::template_error(format!("Cannot read template: {}", e)))?;
            let source = utf8_path(entry.path())?;
            let relative = source.strip_prefix(template_dir).map_err(|_| {
                Error::unexpected(format!("{} is outside {}", source, template_dir))
            })?;
            let destination = output_dir.join(render_relative_path(relative, context)?);

            if entry.depth() == 0 {
                project_root = Some(destination.clone());
            }

            if entry.file_type().is_dir() {
                fs::create_dir_all(&destination)
                    .map_err(|e| Error::path_error(destination.as_str(), e))?;
                continue;
            }

            if entry.path_is_symlink() {
                check_symlink(&source, relative)?;
            }

            let inside_project = source.strip_prefix(project_dir).unwrap_or(source.as_path());
            let copy_only = verbatim.is_match(inside_project.as_std_path());
            render_file(&source, &destination, context, copy_only)
                .map_err(|e| in_file(e, relative))?;
            files.push(destination);
        }

        let project_root = project_root
            .ok_or_else(|| Error::template_error(format!("{} is empty", project_dir)))?;

        Ok(MaterializeReport {
            project_root,
            files,
        })
    }
}

impl TemplateEngine for CookiecutterEngine {
    fn render(
        &self,
        template_dir: &Utf8Path,
        output_dir: &Utf8Path,
        prompter: &mut dyn VariablePrompter,
    ) -> Result<MaterializeReport> {
        info!("Rendering template: {}", template_dir);

        let definitions = Self::load_variables(template_dir)?;
        let project_dir = find_project_dir(template_dir)?;
        let variables = Self::collect_variables(definitions, prompter)?;
        let verbatim = copy_without_render(&variables)?;
        let context = tera_context(&variables);

        let report = self.render_tree(template_dir, &project_dir, output_dir, &context, &verbatim)?;
        info!(
            "Rendered {} file(s) into {}",
            report.files.len(),
            report.project_root
        );
        Ok(report)
    }
}

fn tera_context(variables: &Map<String, Value>) -> Context {
    let mut context = Context::new();
    context.insert(CONTEXT_KEY, variables);
    context
}

fn render_str(template: &str, context: &Context) -> Result<String> {
    if !(template.contains("{{") || template.contains("{%") || template.contains("{#")) {
        return Ok(template.to_string());
    }
    Ok(Tera::one_off(template, context, false)?)
}

/// The single top-level directory whose name is a template expression
fn find_project_dir(template_dir: &Utf8Path) -> Result<Utf8PathBuf> {
    let entries = template_dir
        .read_dir_utf8()
        .map_err(|e| Error::template_error(format!("Cannot read {}: {}", template_dir, e)))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if entry.file_type()?.is_dir() && name.contains("{{") && name.contains("}}") {
            candidates.push(entry.path().to_path_buf());
        }
    }
    candidates.sort();

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(Error::template_error(format!(
            "No templated project directory (e.g. {{{{cookiecutter.project_name}}}}) in {}",
            template_dir
        ))),
        _ => Err(Error::template_error(format!(
            "Multiple templated project directories in {}: {}",
            template_dir,
            candidates
                .iter()
                .filter_map(|c| c.file_name())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

fn copy_without_render(variables: &Map<String, Value>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    match variables.get(COPY_WITHOUT_RENDER) {
        None => {}
        Some(Value::Array(patterns)) => {
            for pattern in patterns {
                let pattern = pattern.as_str().ok_or_else(|| {
                    Error::template_error(format!("{} entries must be strings", COPY_WITHOUT_RENDER))
                })?;
                builder.add(Glob::new(pattern)?);
            }
        }
        Some(_) => {
            return Err(Error::template_error(format!(
                "{} must be a list of glob patterns",
                COPY_WITHOUT_RENDER
            )))
        }
    }

    Ok(builder.build()?)
}

fn render_relative_path(relative: &Utf8Path, context: &Context) -> Result<Utf8PathBuf> {
    let mut rendered = Utf8PathBuf::new();

    for component in relative.components() {
        let name = render_str(component.as_str(), context).map_err(|e| in_file(e, relative))?;
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(Error::template_error(format!(
                "Path component `{}` renders to invalid name `{}`",
                component, name
            )));
        }
        rendered.push(name);
    }

    Ok(rendered)
}

fn render_file(
    source: &Utf8Path,
    destination: &Utf8Path,
    context: &Context,
    copy_only: bool,
) -> Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::path_error(parent.as_str(), e))?;
    }

    let bytes = fs::read(source)?;
    let output = if copy_only {
        bytes
    } else {
        match String::from_utf8(bytes) {
            Ok(text) => render_str(&text, context)?.into_bytes(),
            Err(binary) => binary.into_bytes(),
        }
    };

    fs::write(destination, output).map_err(|e| Error::path_error(destination.as_str(), e))?;

    let permissions = fs::metadata(source)?.permissions();
    if !permissions.readonly() {
        fs::set_permissions(destination, permissions)
            .map_err(|e| Error::path_error(destination.as_str(), e))?;
    }

    Ok(())
}

/// Only links to regular files can be rendered
fn check_symlink(source: &Utf8Path, relative: &Utf8Path) -> Result<()> {
    match fs::metadata(source) {
        Ok(metadata) if metadata.is_dir() => Err(Error::template_error(format!(
            "{}: symlinked directories are not supported",
            relative
        ))),
        Ok(_) => Ok(()),
        Err(e) => Err(Error::template_error(format!(
            "{}: broken symlink: {}",
            relative, e
        ))),
    }
}

/// Prefix template errors with the template path they came from
fn in_file(err: Error, path: &Utf8Path) -> Error {
    match err {
        Error::TemplateError { message } => {
            Error::template_error(format!("{}: {}", path, message))
        }
        other => other,
    }
}
