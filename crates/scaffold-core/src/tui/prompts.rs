//! Charm-style CLI prompts using cliclack

use crate::error::ScaffoldError;
use crate::naming::suggest_project_name;
use crate::orchestrator::{Orchestrator, ScaffoldRequest};
use crate::product::ProductConfig;
use crate::registry::{NpmRegistry, VersionOption, VersionResolver, VersionSource, LATEST};
use crate::runtime::{PackageManager, ProcessRunner};
use crate::summary;
use crate::templates::{MaterializeReport, TemplateCatalog, TemplateDescriptor};
use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name, also used as the directory name
    pub project_name: Option<String>,

    /// Template name to use
    pub template: Option<String>,

    /// Local directory to use for templates instead of the bundled ones
    pub template_dir: Option<PathBuf>,

    /// Package manager override (auto-detected if omitted)
    pub package_manager: Option<PackageManager>,

    /// Dependency version to pin (prompts if omitted)
    pub dependency_version: Option<String>,

    /// Install dependencies after scaffolding (prompts if omitted)
    pub install: Option<bool>,

    /// Run the dev server after install (prompts if omitted)
    pub run: Option<bool>,

    /// Allow using a non-empty directory
    pub force: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Registry wrapper that announces each network fetch
struct Announced<S>(S);

impl<S: VersionSource + Sync> VersionSource for Announced<S> {
    async fn fetch_versions(&self, package: &str) -> crate::error::Result<Vec<String>> {
        let _ = cliclack::log::step(format!("Fetching {} versions...", package));
        self.0.fetch_versions(package).await
    }
}

/// Map a cliclack error: Ctrl+C / Esc become cancellation
fn prompt_error(e: io::Error) -> ScaffoldError {
    if e.kind() == io::ErrorKind::Interrupted {
        ScaffoldError::Cancelled
    } else {
        ScaffoldError::Prompt(e)
    }
}

/// Error message including its source chain
fn describe(e: ScaffoldError) -> String {
    format!("{:#}", anyhow::Error::from(e))
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(format!(
        "Welcome to {} - let's scaffold a new project!",
        config.display_name()
    ))?;
    cliclack::log::remark("Press Ctrl+C at any time to cancel.")?;

    // Step 1: Load the template catalog and reject unknown --template early
    let template_root = args
        .template_dir
        .clone()
        .unwrap_or_else(|| config.template_dir());
    let catalog = TemplateCatalog::load(&template_root)?;
    if let Some(name) = &args.template {
        catalog.find(name)?;
    }

    // Step 2: Project name and directory
    let project_name = select_project_name(&args)?;
    let current_dir = std::env::current_dir().context("Failed to read current directory")?;
    let target_dir = current_dir.join(&project_name);

    // Step 3: Template
    let template = select_template(&catalog, &args)?;

    let request = ScaffoldRequest::new(
        &project_name,
        &target_dir,
        template.clone(),
        &template_root,
        args.dependency_version.clone().unwrap_or_default(),
        args.force,
    )?;

    let pm = args.package_manager.unwrap_or_else(PackageManager::detect);
    let orchestrator = Orchestrator::new(ProcessRunner, pm, config.dependency_package());

    // Step 4: Validate the target, then resolve the dependency version
    let registry = NpmRegistry::from_config(config)?;
    let mut resolver = VersionResolver::new(Announced(registry), config.dependency_package());
    let mut chooser = version_chooser(config.dependency_package(), args.yes);

    let prepared = orchestrator
        .prepare(&request, &mut resolver, &mut chooser, |path| {
            confirm_overwrite(path, args.yes)
        })
        .await;
    let (_, resolution) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            if matches!(e, ScaffoldError::TargetNotEmpty { .. }) {
                cliclack::outro_cancel("Aborted.")?;
            }
            return Err(e.into());
        }
    };
    report_notices(&resolution.notices)?;
    cliclack::log::info(format!(
        "Using {}@{}",
        config.dependency_package(),
        resolution.version
    ))?;

    // Step 5: Scaffold project
    let spinner = cliclack::spinner();
    spinner.start("Scaffolding project...");
    let report = match orchestrator.scaffold(&request, &resolution.version).await {
        Ok(report) => report,
        Err(e) => {
            spinner.stop("Scaffold failed.");
            return Err(e.into());
        }
    };
    spinner.stop("Scaffold complete.");
    report_problems(&report)?;

    // Step 6: Install dependencies
    let mut installed = false;
    if decide(args.install, args.yes, true, &format!("Install dependencies with {}?", pm))? {
        cliclack::log::step(format!("Installing dependencies with {}...", pm))?;
        match orchestrator.install(&target_dir).await {
            Ok(()) => {
                installed = true;
                cliclack::log::success("Dependencies installed.")?;
            }
            Err(e) => {
                cliclack::log::error(format!("Dependency installation failed: {}", describe(e)))?
            }
        }
    }

    // Step 7: Run dev server (only after a successful install)
    let mut ran = false;
    if installed && decide(args.run, args.yes, false, &format!("Run dev server now with {}?", pm))? {
        cliclack::log::step("Starting dev server...")?;
        match orchestrator.run_dev(&target_dir).await {
            Ok(()) => ran = true,
            Err(e) => cliclack::log::error(describe(e))?,
        }
    }

    // Step 8: Summary
    print_summary(config, &project_name, pm, installed, ran)?;

    Ok(())
}

fn select_project_name(args: &CreateArgs) -> Result<String> {
    if let Some(name) = &args.project_name {
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("Project name cannot be empty");
        }
        return Ok(name.to_string());
    }

    let suggested = suggest_project_name(&mut rand::thread_rng());

    if args.yes {
        cliclack::log::info(format!("Using project name: {}", suggested))?;
        return Ok(suggested);
    }

    let name: String = cliclack::input("Project name (enter to accept default)")
        .placeholder(&suggested)
        .default_input(&suggested)
        .validate(|input: &String| {
            if input.trim().is_empty() {
                Err("Name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact()
        .map_err(prompt_error)?;

    Ok(name.trim().to_string())
}

fn select_template<'a>(
    catalog: &'a TemplateCatalog,
    args: &CreateArgs,
) -> Result<&'a TemplateDescriptor> {
    if let Some(name) = &args.template {
        let template = catalog.find(name)?;
        cliclack::log::info(format!("Using template: {}", template.label))?;
        return Ok(template);
    }

    let default = catalog
        .default_template()
        .ok_or_else(|| anyhow::anyhow!("No templates available"))?;

    if args.yes || catalog.templates.len() == 1 {
        cliclack::log::info(format!("Using template: {}", default.label))?;
        return Ok(default);
    }

    let mut select = cliclack::select("Select a template");
    for template in &catalog.templates {
        select = select.item(template.name.clone(), &template.label, "");
    }

    let selected: String = select
        .initial_value(default.name.clone())
        .interact()
        .map_err(prompt_error)?;

    Ok(catalog.find(&selected)?)
}

/// Version picker handed to the resolver; `--yes` takes the first option
fn version_chooser(
    package: &str,
    yes: bool,
) -> impl FnMut(&[VersionOption]) -> crate::error::Result<Option<String>> + '_ {
    move |options| {
        if yes {
            return Ok(options.first().map(|o| o.value.clone()));
        }

        let mut select = cliclack::select(format!("Select {} version (latest recommended)", package));
        for option in options {
            select = select.item(option.value.clone(), &option.label, "");
        }
        select
            .initial_value(LATEST.to_string())
            .interact()
            .map(Some)
            .or_else(|e| match prompt_error(e) {
                ScaffoldError::Cancelled => Ok(None),
                other => Err(other),
            })
    }
}

fn confirm_overwrite(path: &Path, yes: bool) -> crate::error::Result<bool> {
    if yes {
        return Ok(true);
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    cliclack::confirm(format!("Directory {} is not empty. Continue?", name))
        .initial_value(false)
        .interact()
        .map_err(prompt_error)
}

/// Explicit flag wins, then --yes, then an interactive confirm
fn decide(flag: Option<bool>, yes: bool, default: bool, prompt: &str) -> Result<bool> {
    if let Some(value) = flag {
        return Ok(value);
    }
    if yes {
        return Ok(default);
    }
    Ok(cliclack::confirm(prompt)
        .initial_value(default)
        .interact()
        .map_err(prompt_error)?)
}

/// Text shown for a notice raised while resolving the version
fn notice_message(notice: &ScaffoldError) -> String {
    match notice {
        ScaffoldError::Registry { .. } => {
            format!("{}. Using {} version as fallback.", notice, LATEST)
        }
        other => other.to_string(),
    }
}

fn report_notices(notices: &[ScaffoldError]) -> Result<()> {
    for notice in notices {
        if notice.is_recoverable() {
            cliclack::log::warning(notice_message(notice))?;
        } else {
            cliclack::log::error(notice_message(notice))?;
        }
    }
    Ok(())
}

fn report_problems(report: &MaterializeReport) -> Result<()> {
    for problem in report.problems() {
        cliclack::log::warning(format!(
            "Skipped {}: {:?}",
            problem.path.display(),
            problem.outcome
        ))?;
    }
    Ok(())
}

fn print_summary<C: ProductConfig>(
    config: &C,
    project_name: &str,
    pm: PackageManager,
    installed: bool,
    ran: bool,
) -> Result<()> {
    let steps = summary::next_steps(project_name, pm, installed, ran);

    println!();
    println!("{}", summary::render_box(&steps, &config.help_links()));
    println!();

    cliclack::outro(format!("Enjoy {}! ツ", config.display_name()))?;

    Ok(())
}
