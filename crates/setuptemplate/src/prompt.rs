//! Terminal implementations of the library's prompting seams
//!
//! Interactive terminals get dialoguer widgets. Without a terminal, the
//! framework prompt reads answers line by line from stdin and template
//! variables keep their defaults.

use console::Term;
use dialoguer::{Input, Select};
use setuptemplate_projects::selector::Prompt;
use setuptemplate_projects::templates::VariablePrompter;
use setuptemplate_projects::{Error, Result};
use std::io::{self, BufRead};
use tracing::debug;

fn is_interactive() -> bool {
    Term::stderr().is_term() && Term::stdout().is_term()
}

/// Framework prompt on the controlling terminal
pub struct TerminalPrompt {
    interactive: bool,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            interactive: is_interactive(),
        }
    }
}

impl Prompt for TerminalPrompt {
    fn show(&mut self, line: &str) {
        println!("{}", line);
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        if self.interactive {
            return Input::<String>::new()
                .with_prompt(question)
                .allow_empty(true)
                .interact_text()
                .map_err(io::Error::other);
        }

        println!("{}: ", question);
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a framework was chosen",
            ));
        }
        Ok(line)
    }

    fn reject(&mut self, message: &str) {
        println!("{}\n", message);
    }
}

/// Template variable prompts using dialoguer
pub struct DialoguerVariables {
    interactive: bool,
}

impl DialoguerVariables {
    pub fn new() -> Self {
        Self {
            interactive: is_interactive(),
        }
    }
}

impl VariablePrompter for DialoguerVariables {
    fn text(&mut self, name: &str, default: &str) -> Result<String> {
        if !self.interactive {
            debug!("No terminal, using default for {}", name);
            return Ok(default.to_string());
        }

        Input::<String>::new()
            .with_prompt(name)
            .default(default.to_string())
            .interact_text()
            .map_err(|e| Error::Io(io::Error::other(e)))
    }

    fn choice(&mut self, name: &str, options: &[String]) -> Result<usize> {
        if !self.interactive {
            debug!("No terminal, using first option for {}", name);
            return Ok(0);
        }

        Select::new()
            .with_prompt(name)
            .items(options)
            .default(0)
            .interact()
            .map_err(|e| Error::Io(io::Error::other(e)))
    }
}
