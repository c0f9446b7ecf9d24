//! Framework selection
//!
//! Selection is split in two: [`parse_selection`] is a pure function from a
//! candidate count and an answer to an index, and [`select`] drives the
//! re-prompt loop over any [`Prompt`] implementation (terminal, scripted
//! answers, ...).

use crate::error::{Error, Result};
use setuptemplate_core::types::FrameworkEntry;
use thiserror::Error;
use tracing::debug;

/// A framework the operator can pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkOption {
    /// Name shown in the list
    pub label: String,
    /// Branch or tag holding the template
    pub reference: String,
}

impl FrameworkOption {
    /// Option for a discovered branch; the branch name is its own label
    pub fn from_branch(branch: impl Into<String>) -> Self {
        let branch = branch.into();
        Self {
            label: branch.clone(),
            reference: branch,
        }
    }

    /// Option for a configured framework entry
    pub fn from_entry(entry: &FrameworkEntry) -> Self {
        Self {
            label: entry.name.clone(),
            reference: entry.branch.clone(),
        }
    }
}

/// Find an option by label or reference, ignoring case
pub fn resolve_framework<'a>(
    options: &'a [FrameworkOption],
    requested: &str,
) -> Option<&'a FrameworkOption> {
    options.iter().find(|o| {
        o.label.eq_ignore_ascii_case(requested) || o.reference.eq_ignore_ascii_case(requested)
    })
}

/// Why an answer was rejected; the message is shown to the operator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid input. Please enter a number.")]
    NotANumber { input: String },

    #[error("Invalid choice. Please select between 1 and {max}.")]
    OutOfRange { choice: i64, max: usize },
}

/// Parse a 1-based answer against `count` candidates, returning a 0-based index
pub fn parse_selection(count: usize, answer: &str) -> std::result::Result<usize, SelectionError> {
    let choice: i64 = answer
        .trim()
        .parse()
        .map_err(|_| SelectionError::NotANumber {
            input: answer.to_string(),
        })?;

    match usize::try_from(choice) {
        Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
        _ => Err(SelectionError::OutOfRange { choice, max: count }),
    }
}

/// Channel through which the selector talks to the operator
pub trait Prompt {
    /// Display an informational line
    fn show(&mut self, line: &str);

    /// Ask a question and return the raw answer
    ///
    /// An error means the channel is gone (closed stdin, no terminal); it ends
    /// the selection instead of re-prompting.
    fn ask(&mut self, question: &str) -> std::io::Result<String>;

    /// Tell the operator their answer was rejected
    fn reject(&mut self, message: &str);
}

/// Show `names` with 1-based ordinals and ask until a valid ordinal is given
///
/// There is no retry limit: invalid answers are rejected with a corrective
/// message and the question is asked again.
///
/// # Errors
/// [`Error::TemplateError`] when `names` is empty, [`Error::Io`] when the
/// prompt channel fails.
pub fn select<P>(names: &[String], prompt: &mut P) -> Result<String>
where
    P: Prompt + ?Sized,
{
    if names.is_empty() {
        return Err(Error::template_error("no templates available to choose from"));
    }

    prompt.show("Select your framework:");
    for (i, name) in names.iter().enumerate() {
        prompt.show(&format!("{}. {}", i + 1, name));
    }

    let question = format!("Enter your choice (1-{})", names.len());
    loop {
        let answer = prompt.ask(&question)?;
        match parse_selection(names.len(), &answer) {
            Ok(index) => {
                debug!("Selected {}", names[index]);
                return Ok(names[index].clone());
            }
            Err(rejection) => prompt.reject(&rejection.to_string()),
        }
    }
}
