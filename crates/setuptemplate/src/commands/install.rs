//! `setuptemplate install`: install requirements into the project's venv

use anyhow::Result;

use setuptemplate_projects::environment::{install, InstallRequest, Platform};
use setuptemplate_projects::process::SystemRunner;
use setuptemplate_projects::ErrorKind;

use crate::cli::InstallArgs;
use crate::context::AppContext;
use crate::output;

pub async fn run(args: InstallArgs, ctx: &AppContext) -> Result<()> {
    let request = InstallRequest::new(args.project_path)
        .with_requirements(args.requirements)
        .with_venv(args.venv);

    install_into(ctx, request).await
}

/// Install `request` with the configured installer, streaming its output
pub(crate) async fn install_into(ctx: &AppContext, request: InstallRequest) -> Result<()> {
    let runner = SystemRunner::new()
        .with_timeout(ctx.config.network.install_timeout())
        .inherit_output(!ctx.quiet);

    ctx.status(|| output::info(&format!("Installing dependencies for {}", request.project)));

    match install(&runner, &request, &ctx.config, Platform::current()).await {
        Ok(outcome) => {
            ctx.status(|| {
                output::success("Dependencies installed successfully");
                output::kv("Environment", outcome.environment.path.as_str());
                output::kv("Requirements", outcome.manifest.as_str());
            });
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::VenvNotFound => {
            output::warning("No virtual environment found, skipping installation");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
