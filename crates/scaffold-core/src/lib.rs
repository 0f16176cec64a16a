//! Scaffold Core - Shared library for `create-*` project scaffolders
//!
//! This library copies a template tree into a new project directory, fills in
//! the project name, pins the product's dependency to a version resolved
//! against an npm-compatible registry, and optionally installs dependencies
//! and starts the dev server with the user's package manager.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Directory probing, version resolution, template
//!   materialization and package manager commands
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and `Orchestrator`,
//!   which sequences Validate -> ResolveVersion -> Scaffold -> Install -> Run
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts and the summary box
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffold_core::{NpmRegistry, Orchestrator, ProcessRunner, RunPlan, VersionResolver};
//!
//! let catalog = TemplateCatalog::load(&MyConfig.template_dir())?;
//! let template = catalog.find("vanilla-js")?.clone();
//! let request = ScaffoldRequest::new("my-app", cwd.join("my-app"), template, root, "latest", false)?;
//!
//! let mut resolver = VersionResolver::new(NpmRegistry::from_config(&MyConfig)?, "my-lib");
//! let orchestrator = Orchestrator::new(ProcessRunner, PackageManager::detect(), "my-lib");
//! let result = orchestrator
//!     .execute(&request, &mut resolver, &mut chooser, |_| Ok(false), RunPlan::default())
//!     .await?;
//! ```

pub mod error;
pub mod naming;
pub mod orchestrator;
pub mod probe;
pub mod product;
pub mod registry;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod summary;
#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::{Result, ScaffoldError};
pub use orchestrator::{Orchestrator, RunPlan, ScaffoldRequest, ScaffoldResult};
pub use probe::TargetState;
pub use product::{HelpLink, ProductConfig};
pub use registry::{NpmRegistry, VersionOption, VersionResolver, VersionSource, LATEST};
pub use runtime::{CommandRunner, CommandSpec, PackageManager, ProcessRunner};
pub use templates::{scaffold, MaterializeReport, TemplateCatalog, TemplateDescriptor};

#[cfg(feature = "tui")]
pub use tui::run;
