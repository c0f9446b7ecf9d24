//! setuptemplate CLI - scaffold Python web projects from framework templates
//!
//! This is the main entry point for the setuptemplate command-line interface.

mod cli;
mod commands;
mod context;
mod output;
mod prompt;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use context::AppContext;
use setuptemplate_projects::{Error as ProjectError, ErrorKind};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Usage errors exit with code 2 from inside clap
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::load(cli.config, cli.quiet)?;

    match cli.command {
        Commands::At(args) => commands::at::run(args, &ctx).await,
        Commands::Install(args) => commands::install::run(args, &ctx).await,
    }
}

/// Print the failure and map it to the process exit code
fn report(err: &anyhow::Error) -> ExitCode {
    let (kind, hint) = match err.downcast_ref::<ProjectError>() {
        Some(e) => (e.kind(), e.hint()),
        None => (ErrorKind::Unexpected, None),
    };

    tracing::debug!(kind = %kind, "Command failed: {:?}", err);
    output::error(&format!("{}: {}", kind, describe(err)));
    if let Some(hint) = hint {
        output::hint(hint);
    }

    ExitCode::from(kind.exit_code())
}

/// Join the error chain, dropping causes already spelled out by an outer error
fn describe(err: &anyhow::Error) -> String {
    let mut message = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if message.contains(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    message
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("info"),
                1 => EnvFilter::new("debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
