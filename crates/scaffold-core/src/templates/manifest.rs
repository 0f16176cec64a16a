//! package.json patching
//!
//! Not every template ships a manifest, so every problem here is reported as
//! a [`ManifestSkip`] instead of an error.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Manifest file name at the project root
pub const MANIFEST_FILE: &str = "package.json";

/// Why a manifest patch did nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSkip {
    Missing,
    Unreadable(String),
    Invalid(String),
    /// Top-level JSON value is not an object
    NotAnObject,
    /// `dependencies` does not declare the key being pinned
    DependencyAbsent,
    /// Nothing to pin
    EmptyVersion,
    WriteFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestOutcome {
    Patched,
    Skipped(ManifestSkip),
}

/// In-memory package manifest, key order preserved
#[derive(Debug, Clone)]
pub struct PackageManifest {
    path: PathBuf,
    fields: Map<String, Value>,
}

impl PackageManifest {
    /// Path of the manifest inside a project directory
    pub fn path_in(project_dir: &Path) -> PathBuf {
        project_dir.join(MANIFEST_FILE)
    }

    /// Read and parse the manifest in `project_dir`
    pub async fn load(project_dir: &Path) -> Result<Self, ManifestSkip> {
        let path = Self::path_in(project_dir);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ManifestSkip::Missing)
            }
            Err(e) => return Err(ManifestSkip::Unreadable(e.to_string())),
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(fields)) => Ok(Self { path, fields }),
            Ok(_) => Err(ManifestSkip::NotAnObject),
            Err(e) => Err(ManifestSkip::Invalid(e.to_string())),
        }
    }

    /// Write back with 2-space indentation and a trailing newline
    pub async fn save(&self) -> Result<(), ManifestSkip> {
        let mut content = serde_json::to_string_pretty(&self.fields)
            .map_err(|e| ManifestSkip::WriteFailed(e.to_string()))?;
        content.push('\n');
        fs::write(&self.path, content)
            .await
            .map_err(|e| ManifestSkip::WriteFailed(e.to_string()))
    }

    pub fn set_name(&mut self, name: &str) {
        self.fields
            .insert("name".to_string(), Value::String(name.to_string()));
    }

    /// Overwrite an existing dependency constraint. Returns false when the
    /// key is not declared; the dependency is never added.
    pub fn pin_dependency(&mut self, key: &str, version: &str) -> bool {
        match self
            .fields
            .get_mut("dependencies")
            .and_then(Value::as_object_mut)
            .and_then(|deps| deps.get_mut(key))
        {
            Some(slot) => {
                *slot = Value::String(version.to_string());
                true
            }
            None => false,
        }
    }
}

/// Set the manifest `name` field to `project_name`
pub async fn set_package_name(project_dir: &Path, project_name: &str) -> ManifestOutcome {
    let mut manifest = match PackageManifest::load(project_dir).await {
        Ok(manifest) => manifest,
        Err(skip) => return ManifestOutcome::Skipped(skip),
    };

    manifest.set_name(project_name);
    finish(manifest.save().await)
}

/// Pin `dependencies.<key>` to `version` if the template already declares it
pub async fn set_dependency_version(
    project_dir: &Path,
    key: &str,
    version: &str,
) -> ManifestOutcome {
    if version.is_empty() {
        return ManifestOutcome::Skipped(ManifestSkip::EmptyVersion);
    }

    let mut manifest = match PackageManifest::load(project_dir).await {
        Ok(manifest) => manifest,
        Err(skip) => return ManifestOutcome::Skipped(skip),
    };

    if !manifest.pin_dependency(key, version) {
        return ManifestOutcome::Skipped(ManifestSkip::DependencyAbsent);
    }

    finish(manifest.save().await)
}

fn finish(saved: Result<(), ManifestSkip>) -> ManifestOutcome {
    match saved {
        Ok(()) => ManifestOutcome::Patched,
        Err(skip) => ManifestOutcome::Skipped(skip),
    }
}
