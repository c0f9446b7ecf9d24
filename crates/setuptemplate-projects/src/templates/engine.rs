//! Rendering engine and variable prompting seams

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use tracing::debug;

/// Outcome of rendering a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    /// The rendered project directory inside the output directory
    pub project_root: Utf8PathBuf,
    /// Files written, in creation order
    pub files: Vec<Utf8PathBuf>,
}

/// Renders a template directory into an output directory
pub trait TemplateEngine {
    /// Render `template_dir` into `output_dir`, asking `prompter` for
    /// template variables
    fn render(
        &self,
        template_dir: &Utf8Path,
        output_dir: &Utf8Path,
        prompter: &mut dyn VariablePrompter,
    ) -> Result<MaterializeReport>;
}

/// Supplies values for template variables
pub trait VariablePrompter {
    /// Value for a free-text variable
    fn text(&mut self, name: &str, default: &str) -> Result<String>;

    /// Index into `options` for a choice variable
    fn choice(&mut self, name: &str, options: &[String]) -> Result<usize>;
}

/// Accept every default without asking (non-interactive rendering)
#[derive(Debug, Clone, Copy, Default)]
pub struct UseDefaults;

impl VariablePrompter for UseDefaults {
    fn text(&mut self, _name: &str, default: &str) -> Result<String> {
        Ok(default.to_string())
    }

    fn choice(&mut self, _name: &str, _options: &[String]) -> Result<usize> {
        Ok(0)
    }
}

/// Answers known up front (command-line pairs, config), falling back to
/// another prompter for everything else
pub struct PresetAnswers<'a> {
    answers: BTreeMap<String, String>,
    fallback: &'a mut dyn VariablePrompter,
}

impl<'a> PresetAnswers<'a> {
    pub fn new(answers: BTreeMap<String, String>, fallback: &'a mut dyn VariablePrompter) -> Self {
        Self { answers, fallback }
    }
}

impl VariablePrompter for PresetAnswers<'_> {
    fn text(&mut self, name: &str, default: &str) -> Result<String> {
        match self.answers.get(name) {
            Some(value) => {
                debug!("Using preset value for {}", name);
                Ok(value.clone())
            }
            None => self.fallback.text(name, default),
        }
    }

    fn choice(&mut self, name: &str, options: &[String]) -> Result<usize> {
        let Some(value) = self.answers.get(name) else {
            return self.fallback.choice(name, options);
        };

        options.iter().position(|o| o == value).ok_or_else(|| {
            Error::template_error(format!(
                "'{}' is not a valid choice for {} (expected one of: {})",
                value,
                name,
                options.join(", ")
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn answers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_preset_text_overrides_default() {
        let mut fallback = UseDefaults;
        let mut preset = PresetAnswers::new(answers(&[("project_name", "blog")]), &mut fallback);
        assert_eq!(preset.text("project_name", "mysite").unwrap(), "blog");
        assert_eq!(preset.text("author", "Jane Doe").unwrap(), "Jane Doe");
    }

    #[test]
    fn test_preset_choice() {
        let options = vec!["sqlite3".to_string(), "postgresql".to_string()];
        let mut fallback = UseDefaults;
        let mut preset = PresetAnswers::new(answers(&[("database", "postgresql")]), &mut fallback);
        assert_eq!(preset.choice("database", &options).unwrap(), 1);
        assert_eq!(preset.choice("cache", &options).unwrap(), 0);
    }

    #[test]
    fn test_preset_choice_must_be_an_option() {
        let options = vec!["sqlite3".to_string(), "postgresql".to_string()];
        let mut fallback = UseDefaults;
        let mut preset = PresetAnswers::new(answers(&[("database", "oracle")]), &mut fallback);
        let err = preset.choice("database", &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Template);
        assert!(err.to_string().contains("sqlite3, postgresql"));
    }
}
