//! Package registry access (npm-compatible JSON documents)

use crate::error::{Result, ScaffoldError};
use crate::product::ProductConfig;
use anyhow::Context;
use serde::Deserialize;
use std::future::Future;
use url::Url;

/// Public npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Anything that can list every published version of a package
pub trait VersionSource {
    /// All published version strings, unfiltered and in registry order
    fn fetch_versions(&self, package: &str)
        -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Subset of the registry's package document that we care about
#[derive(Debug, Deserialize)]
struct PackageDocument {
    #[serde(default)]
    versions: serde_json::Map<String, serde_json::Value>,
}

/// HTTP client for an npm-style registry
pub struct NpmRegistry {
    base_url: Url,
    client: reqwest::Client,
}

impl NpmRegistry {
    /// Create a registry client with a custom user agent
    pub fn new(base_url: Url, user_agent: &str) -> Self {
        Self {
            base_url,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a registry client from a product config, honoring its URL override env var
    pub fn from_config<C: ProductConfig>(config: &C) -> anyhow::Result<Self> {
        let url_str = std::env::var(config.registry_url_env())
            .unwrap_or_else(|_| config.default_registry_url().to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid registry URL: {}", url_str))?;
        Ok(Self::new(url, config.user_agent()))
    }

    /// Build the package document URL, preserving any query parameters
    fn package_url(&self, package: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                registry_error(
                    package,
                    format!("URL cannot have path segments: {}", self.base_url),
                )
            })?
            .pop_if_empty()
            .push(package);
        Ok(url)
    }

    async fn fetch_document(&self, package: &str) -> Result<PackageDocument> {
        let url = self.package_url(package)?;
        tracing::debug!(%url, "fetching package document");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| registry_error(package, format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(registry_error(
                package,
                format!("{} returned HTTP {}", url, response.status()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| registry_error(package, format!("failed to read body: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| registry_error(package, format!("invalid JSON: {}", e)))
    }
}

impl VersionSource for NpmRegistry {
    async fn fetch_versions(&self, package: &str) -> Result<Vec<String>> {
        let document = self.fetch_document(package).await?;
        Ok(document.versions.keys().cloned().collect())
    }
}

fn registry_error(package: &str, reason: String) -> ScaffoldError {
    ScaffoldError::Registry {
        package: package.to_string(),
        reason,
    }
}
