//! create-textmode - Project scaffolding for textmode.js sketches

mod logging;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser};
use scaffold_core::runtime::PackageManager;
use scaffold_core::tui::CreateArgs;
use scaffold_core::{HelpLink, ProductConfig, ScaffoldError};
use std::path::PathBuf;

/// textmode.js product configuration
#[derive(Clone)]
pub struct TextmodeConfig;

impl ProductConfig for TextmodeConfig {
    fn name(&self) -> &'static str {
        "create-textmode"
    }

    fn display_name(&self) -> &'static str {
        "textmode.js"
    }

    fn dependency_package(&self) -> &'static str {
        "textmode.js"
    }

    fn registry_url_env(&self) -> &'static str {
        "TEXTMODE_REGISTRY_URL"
    }

    fn default_template_dir(&self) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("templates")
    }

    fn template_dir_env(&self) -> &'static str {
        "TEXTMODE_TEMPLATE_DIR"
    }

    fn help_links(&self) -> Vec<HelpLink> {
        vec![
            HelpLink {
                title: "Documentation",
                url: "https://code.textmode.art",
            },
            HelpLink {
                title: "Discord",
                url: "https://discord.gg/sjrw8QXNks",
            },
            HelpLink {
                title: "Issues",
                url: "https://github.com/humanbydefinition/create-textmode.js/issues",
            },
        ]
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding textmode.js projects"
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-textmode")]
#[command(version)]
pub struct Args {
    /// Project name, also used as the directory name
    #[arg(value_name = "PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Project name (takes precedence over the positional argument)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Template name to use
    #[arg(short, long)]
    pub template: Option<String>,

    /// Package manager to install and run with (npm, pnpm, yarn, bun)
    #[arg(long = "pm")]
    pub package_manager: Option<PackageManager>,

    /// textmode.js version to pin ("latest" or an exact version)
    #[arg(long = "textmode-version")]
    pub textmode_version: Option<String>,

    /// Install dependencies after scaffolding
    #[arg(long, overrides_with = "no_install")]
    pub install: bool,

    /// Skip dependency installation
    #[arg(long = "no-install", overrides_with = "install")]
    pub no_install: bool,

    /// Start the dev server after installing
    #[arg(long, overrides_with = "no_run")]
    pub run: bool,

    /// Do not start the dev server
    #[arg(long = "no-run", overrides_with = "run")]
    pub no_run: bool,

    /// Scaffold into a non-empty directory without asking
    #[arg(short, long)]
    pub force: bool,

    /// Local directory to use for templates instead of the bundled ones (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

/// Collapse a `--flag/--no-flag` pair into "unset", "on" or "off"
fn tri_state(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        CreateArgs {
            project_name: args.name.or(args.project_name),
            template: args.template,
            template_dir: args.template_dir,
            package_manager: args.package_manager,
            dependency_version: args.textmode_version,
            install: tri_state(args.install, args.no_install),
            run: tri_state(args.run, args.no_run),
            force: args.force,
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let config = TextmodeConfig;
    let matches = Args::command()
        .about(config.cli_description())
        .get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    logging::init_logging(args.verbose)?;

    let result = scaffold_core::run(&config, args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = &result {
        if matches!(e.downcast_ref::<ScaffoldError>(), Some(ScaffoldError::Cancelled)) {
            let _ = cliclack::outro_cancel("Operation cancelled.");
            std::process::exit(130);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> CreateArgs {
        let mut full = vec!["create-textmode"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap().into()
    }

    #[test]
    fn test_defaults_leave_everything_to_prompts() {
        let args = parse(&[]);
        assert_eq!(args.project_name, None);
        assert_eq!(args.install, None);
        assert_eq!(args.run, None);
        assert!(!args.force);
    }

    #[test]
    fn test_name_flag_beats_positional() {
        assert_eq!(parse(&["a"]).project_name.as_deref(), Some("a"));
        assert_eq!(parse(&["a", "--name", "b"]).project_name.as_deref(), Some("b"));
    }

    #[test]
    fn test_install_and_run_toggles() {
        let args = parse(&["--install", "--no-run"]);
        assert_eq!(args.install, Some(true));
        assert_eq!(args.run, Some(false));

        let args = parse(&["--install", "--no-install"]);
        assert_eq!(args.install, Some(false));
    }

    #[test]
    fn test_package_manager_and_version() {
        let args = parse(&["--pm", "pnpm", "--textmode-version", "0.3.1", "-f", "-y"]);
        assert_eq!(args.package_manager, Some(PackageManager::Pnpm));
        assert_eq!(args.dependency_version.as_deref(), Some("0.3.1"));
        assert!(args.force);
        assert!(args.yes);
    }

    #[test]
    fn test_unknown_package_manager_is_rejected() {
        assert!(Args::try_parse_from(["create-textmode", "--pm", "cargo"]).is_err());
    }

    #[test]
    fn test_help_uses_product_description() {
        let help = Args::command()
            .about(TextmodeConfig.cli_description())
            .render_help()
            .to_string();
        assert!(help.contains("CLI for scaffolding textmode.js projects"));
    }

    #[test]
    fn test_bundled_templates_dir() {
        assert!(TextmodeConfig
            .default_template_dir()
            .join("template.yaml")
            .exists());
    }
}
