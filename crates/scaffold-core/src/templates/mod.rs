//! Template catalog and materialization
//!
//! This module provides:
//! - The bundled template catalog (TemplateCatalog, TemplateDescriptor)
//! - Bulk copying of a template tree into the target directory
//! - `{{name}}` substitution and `_gitignore` restoration
//! - package.json name and dependency patching

pub mod catalog;
pub mod copier;
pub mod manifest;
pub mod placeholders;

use crate::error::Result;
use std::path::Path;

pub use catalog::{TemplateCatalog, TemplateDescriptor};
pub use copier::copy_tree;
pub use manifest::{ManifestOutcome, ManifestSkip, PackageManifest};
pub use placeholders::{FileOutcome, FileReport, SkipReason};

/// Everything the materializer did, per file
#[derive(Debug, Clone)]
pub struct MaterializeReport {
    /// Files copied from the template
    pub copied: usize,
    /// Outcome of the rewrite pass for every file under the target
    pub files: Vec<FileReport>,
    pub name_patch: ManifestOutcome,
    pub dependency_patch: ManifestOutcome,
}

impl MaterializeReport {
    /// Files the rewrite pass could not handle (excluding non-text files)
    pub fn problems(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|r| {
            matches!(&r.outcome, FileOutcome::Skipped(reason) if *reason != SkipReason::NotText)
        })
    }

    /// Number of files where the placeholder was replaced
    pub fn rewritten(&self) -> usize {
        self.files
            .iter()
            .filter(|r| r.outcome == FileOutcome::Rewritten)
            .count()
    }
}

/// Materialize `template_source` into `target_dir`.
///
/// Directory creation and the bulk copy must succeed; every later step is
/// best-effort per file and only shows up in the returned report.
pub async fn scaffold(
    template_source: &Path,
    target_dir: &Path,
    project_name: &str,
    dependency_key: &str,
    dependency_version: &str,
) -> Result<MaterializeReport> {
    let copied = copy_tree(template_source, target_dir).await?;

    let files = placeholders::rewrite_tree(target_dir, project_name).await;
    let name_patch = manifest::set_package_name(target_dir, project_name).await;
    let dependency_patch =
        manifest::set_dependency_version(target_dir, dependency_key, dependency_version).await;

    tracing::info!(
        target = %target_dir.display(),
        copied,
        ?name_patch,
        ?dependency_patch,
        "template materialized"
    );

    Ok(MaterializeReport {
        copied,
        files,
        name_patch,
        dependency_patch,
    })
}
