//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// setuptemplate - scaffold Django, Flask and FastAPI projects from templates
#[derive(Parser, Debug)]
#[command(name = "setuptemplate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (--verbose, --verbose --verbose)
    #[arg(long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a config file layered over ~/.setuptemplate/config.yaml
    #[arg(short, long, global = true, env = "SETUPTEMPLATE_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new project from a framework template
    At(AtArgs),

    /// Install a project's requirements into its virtual environment
    Install(InstallArgs),
}

#[derive(Args, Debug)]
pub struct AtArgs {
    /// Directory the project is generated into (created if missing)
    pub project_path: Utf8PathBuf,

    /// Framework name or template branch; skips the selection prompt
    #[arg(short, long)]
    pub framework: Option<String>,

    /// Render a local template directory instead of a repository branch
    #[arg(short, long, conflicts_with_all = ["framework", "repo"])]
    pub template: Option<Utf8PathBuf>,

    /// Template repository URL (overrides config)
    #[arg(long)]
    pub repo: Option<String>,

    /// Accept template defaults instead of prompting for variables
    #[arg(long)]
    pub no_input: bool,

    /// Answer a template variable (repeatable), e.g. --set project_name=blog
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// Create a virtual environment in the generated project
    #[arg(long, num_args = 0..=1, default_missing_value = ".venv", value_name = "NAME")]
    pub create_venv: Option<String>,

    /// Install the generated project's requirements afterwards
    #[arg(long)]
    pub install: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Project directory (defaults to the current directory)
    #[arg(default_value = ".")]
    pub project_path: Utf8PathBuf,

    /// Path to requirements.txt
    #[arg(short, long)]
    pub requirements: Option<Utf8PathBuf>,

    /// Name of the virtual environment directory
    #[arg(short, long)]
    pub venv: Option<String>,
}
