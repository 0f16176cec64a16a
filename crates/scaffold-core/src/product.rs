//! Product configuration trait for CLI binaries
//!
//! A binary implements this trait to tell the core which library it
//! scaffolds projects for, where its templates live, and what to print.

use std::path::PathBuf;

/// A titled link shown in the end-of-run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpLink {
    pub title: &'static str,
    pub url: &'static str,
}

/// Configuration trait for a scaffolding product
///
/// Each product defines:
/// - Product identity (name, display name)
/// - The dependency pinned into generated manifests and its registry
/// - Where the bundled templates live
/// - Links printed after scaffolding
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Package name looked up in the registry and pinned under `dependencies`
    fn dependency_package(&self) -> &'static str;

    /// Default registry base URL
    fn default_registry_url(&self) -> &'static str {
        crate::registry::DEFAULT_REGISTRY_URL
    }

    /// Environment variable name for overriding the registry URL
    fn registry_url_env(&self) -> &'static str;

    /// Directory containing `template.yaml` and the template trees
    fn default_template_dir(&self) -> PathBuf;

    /// Environment variable name for overriding the template directory
    fn template_dir_env(&self) -> &'static str;

    /// Links shown at the end of a run
    fn help_links(&self) -> Vec<HelpLink>;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }

    /// Template directory after applying the env override
    fn template_dir(&self) -> PathBuf {
        std::env::var_os(self.template_dir_env())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.default_template_dir())
    }
}
