//! Bundled template catalog (templates/template.yaml)

use crate::error::{Result, ScaffoldError};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Catalog file name at the templates root
pub const CATALOG_FILE: &str = "template.yaml";

/// A named template directory shipped with the tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateDescriptor {
    /// Unique key used on the command line
    pub name: String,

    /// Human-readable label shown in the picker
    pub label: String,

    /// Directory relative to the templates root
    pub dir: String,
}

impl TemplateDescriptor {
    /// Absolute source path of this template under `root`
    pub fn source_path(&self, root: &Path) -> PathBuf {
        root.join(&self.dir)
    }
}

/// Root catalog listing every available template
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateCatalog {
    pub templates: Vec<TemplateDescriptor>,
}

impl TemplateCatalog {
    /// Parse a catalog, rejecting duplicate template names
    pub fn parse(content: &str) -> Result<Self> {
        let catalog: TemplateCatalog =
            serde_yaml::from_str(content).map_err(|e| ScaffoldError::Catalog(e.to_string()))?;

        let mut seen = HashSet::new();
        for template in &catalog.templates {
            if !seen.insert(template.name.as_str()) {
                return Err(ScaffoldError::Catalog(format!(
                    "duplicate template name '{}'",
                    template.name
                )));
            }
        }

        if catalog.templates.is_empty() {
            return Err(ScaffoldError::Catalog("no templates listed".to_string()));
        }

        Ok(catalog)
    }

    /// Load `template.yaml` from a templates root directory
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CATALOG_FILE);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ScaffoldError::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Look up a template by name
    pub fn find(&self, name: &str) -> Result<&TemplateDescriptor> {
        self.templates
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| ScaffoldError::UnknownTemplate {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }

    /// The template offered first in the picker
    pub fn default_template(&self) -> Option<&TemplateDescriptor> {
        self.templates.first()
    }
}
