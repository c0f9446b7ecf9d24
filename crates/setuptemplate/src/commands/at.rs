//! `setuptemplate at`: generate a project from a framework template

use anyhow::{Context, Result};
use tracing::warn;

use setuptemplate_projects::environment::{create_venv, InstallRequest};
use setuptemplate_projects::git::{discover_templates, GitClient, SystemGit};
use setuptemplate_projects::process::SystemRunner;
use setuptemplate_projects::selector::{resolve_framework, select, FrameworkOption};
use setuptemplate_projects::templates::{
    materialize, CookiecutterEngine, PresetAnswers, TemplateSource, UseDefaults,
    VariablePrompter,
};
use setuptemplate_projects::Error as ProjectError;

use crate::cli::AtArgs;
use crate::context::AppContext;
use crate::output;
use crate::prompt::{DialoguerVariables, TerminalPrompt};

pub async fn run(args: AtArgs, ctx: &AppContext) -> Result<()> {
    let config = &ctx.config;
    let repo = args
        .repo
        .clone()
        .unwrap_or_else(|| config.templates.repository.clone());
    let git = SystemGit::with_timeout(config.network.clone_timeout());

    let source = match &args.template {
        Some(dir) => TemplateSource::local(dir.clone()),
        None => {
            let reference = choose_reference(&args, ctx, &git, &repo).await?;
            TemplateSource::remote(repo, reference)
        }
    };

    ctx.status(|| output::header("Generating project setup..."));

    let mut fallback: Box<dyn VariablePrompter> = if args.no_input {
        Box::new(UseDefaults)
    } else {
        Box::new(DialoguerVariables::new())
    };
    let mut answers = config.templates.default_context.clone();
    answers.extend(args.set.iter().cloned());
    let mut prompter = PresetAnswers::new(answers, fallback.as_mut());

    let report = materialize(
        &args.project_path,
        &source,
        &git,
        &CookiecutterEngine::new(),
        &mut prompter,
    )
    .await
    .with_context(|| format!("Failed to generate project from {}", source))?;

    ctx.status(|| {
        output::success("Project setup generated successfully");
        output::kv("Template", &source.to_string());
        output::kv("Project", report.project_root.as_str());
        output::kv("Files", &report.files.len().to_string());
    });

    if let Some(name) = &args.create_venv {
        let runner = SystemRunner::new()
            .with_timeout(config.network.install_timeout())
            .inherit_output(!ctx.quiet);
        let env = create_venv(&runner, &report.project_root, name, &config.environment.python)
            .await?;
        ctx.status(|| output::success(&format!("Virtual environment ready: {}", env.path)));
    }

    if args.install {
        let request =
            InstallRequest::new(report.project_root.clone()).with_venv(args.create_venv.clone());
        super::install::install_into(ctx, request).await?;
    }

    Ok(())
}

/// Pick the template branch: configured framework, discovered branch or prompt
async fn choose_reference<G: GitClient>(
    args: &AtArgs,
    ctx: &AppContext,
    git: &G,
    repo: &str,
) -> Result<String> {
    if let Some(requested) = &args.framework {
        if let Some(entry) = ctx.config.templates.framework(requested) {
            return Ok(entry.branch.clone());
        }
    }

    let options = discover_options(ctx, git, repo).await;

    if let Some(requested) = &args.framework {
        return match resolve_framework(&options, requested) {
            Some(option) => Ok(option.reference.clone()),
            None => Err(ProjectError::template_error(format!(
                "Unknown framework '{}'. Available: {}",
                requested,
                options
                    .iter()
                    .map(|o| o.label.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
            .into()),
        };
    }

    let labels: Vec<String> = options.iter().map(|o| o.label.clone()).collect();
    let chosen = select(&labels, &mut TerminalPrompt::new())?;
    let option = options
        .into_iter()
        .find(|o| o.label == chosen)
        .ok_or_else(|| ProjectError::unexpected(format!("selected unknown option {}", chosen)))?;

    Ok(option.reference)
}

/// Template branches of `repo`, or the configured frameworks when discovery
/// fails or finds nothing
async fn discover_options<G: GitClient>(
    ctx: &AppContext,
    git: &G,
    repo: &str,
) -> Vec<FrameworkOption> {
    let marker = &ctx.config.templates.branch_marker;
    let spinner = (!ctx.quiet).then(|| output::spinner("Discovering templates..."));
    let discovered = discover_templates(git, repo, marker).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let fallback = || -> Vec<FrameworkOption> {
        ctx.config
            .templates
            .frameworks
            .iter()
            .map(FrameworkOption::from_entry)
            .collect()
    };

    match discovered {
        Ok(branches) if !branches.is_empty() => {
            branches.into_iter().map(FrameworkOption::from_branch).collect()
        }
        Ok(_) => {
            ctx.status(|| {
                output::warning(&format!(
                    "No branches containing '{}' in {}, using configured frameworks",
                    marker, repo
                ))
            });
            fallback()
        }
        Err(e) => {
            warn!("Template discovery failed: {}", e);
            ctx.status(|| output::warning("Template discovery failed, using configured frameworks"));
            fallback()
        }
    }
}
