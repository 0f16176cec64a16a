//! Picks the dependency version pinned into the generated manifest.
//!
//! Every path ends in a usable version string: registry outages and unknown
//! requested versions degrade to `"latest"` with a notice, never an error.
//! The only way out is the user cancelling the interactive chooser.

use super::npm::VersionSource;
use super::versions::stable_sorted;
use crate::error::{Result, ScaffoldError};

/// Literal dist-tag used as the fallback version
pub const LATEST: &str = "latest";

/// How many versions are offered by default
pub const DEFAULT_VERSION_LIMIT: usize = 20;

/// One entry offered to a [`VersionChooser`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionOption {
    pub value: String,
    pub label: String,
}

/// Interactive selection capability.
///
/// Returns `Ok(None)` when the user cancels.
pub trait VersionChooser {
    fn choose(&mut self, options: &[VersionOption]) -> Result<Option<String>>;
}

impl<F> VersionChooser for F
where
    F: FnMut(&[VersionOption]) -> Result<Option<String>>,
{
    fn choose(&mut self, options: &[VersionOption]) -> Result<Option<String>> {
        self(options)
    }
}

/// Outcome of the ResolveVersion stage
#[derive(Debug)]
pub struct VersionResolution {
    /// Version string to pin
    pub version: String,
    /// Stable versions known at resolution time (newest first, possibly empty)
    pub available: Vec<String>,
    /// Recovered problems the caller should show as warnings
    pub notices: Vec<ScaffoldError>,
}

/// Version resolver owning the per-run cache of stable versions
pub struct VersionResolver<S> {
    source: S,
    package: String,
    cache: Option<Vec<String>>,
}

impl<S: VersionSource> VersionResolver<S> {
    pub fn new(source: S, package: impl Into<String>) -> Self {
        Self {
            source,
            package: package.into(),
            cache: None,
        }
    }

    /// Name of the package being resolved
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Stable versions newest first, at most `limit` of them.
    ///
    /// The full sorted list is cached after the first successful fetch. A
    /// failed or empty fetch leaves the cache empty so the next call retries.
    pub async fn fetch_stable_versions(&mut self, limit: usize) -> Result<Vec<String>> {
        if let Some(cached) = &self.cache {
            return Ok(cached.iter().take(limit).cloned().collect());
        }

        let versions = stable_sorted(self.source.fetch_versions(&self.package).await?);
        if versions.is_empty() {
            return Err(ScaffoldError::Registry {
                package: self.package.clone(),
                reason: "no stable versions published".to_string(),
            });
        }

        tracing::debug!(package = %self.package, count = versions.len(), "cached stable versions");
        let limited = versions.iter().take(limit).cloned().collect();
        self.cache = Some(versions);
        Ok(limited)
    }

    /// Options offered to the chooser: `latest` first, then older versions
    pub fn options(available: &[String]) -> Vec<VersionOption> {
        let latest_label = match available.first() {
            Some(newest) => format!("{} ({})", LATEST, newest),
            None => format!("{} (recommended)", LATEST),
        };

        std::iter::once(VersionOption {
            value: LATEST.to_string(),
            label: latest_label,
        })
        .chain(available.iter().skip(1).map(|v| VersionOption {
            value: v.clone(),
            label: v.clone(),
        }))
        .collect()
    }

    /// Resolve a requested version against the available list.
    ///
    /// An empty request defers to `chooser` when there is anything to choose
    /// from. Unknown requests fall back to `latest` and push a notice.
    pub fn resolve<C: VersionChooser + ?Sized>(
        &self,
        requested: &str,
        available: &[String],
        chooser: &mut C,
        notices: &mut Vec<ScaffoldError>,
    ) -> Result<String> {
        if requested.is_empty() {
            if available.is_empty() {
                return Ok(LATEST.to_string());
            }
            return chooser
                .choose(&Self::options(available))?
                .ok_or(ScaffoldError::Cancelled);
        }

        if requested == LATEST || available.iter().any(|v| v == requested) {
            return Ok(requested.to_string());
        }

        let notice = ScaffoldError::RequestedVersionNotFound {
            package: self.package.clone(),
            version: requested.to_string(),
        };
        tracing::warn!("{}", notice);
        notices.push(notice);
        Ok(LATEST.to_string())
    }

    /// Full ResolveVersion stage: fetch (tolerating failure), then resolve
    pub async fn resolve_version<C: VersionChooser + ?Sized>(
        &mut self,
        requested: &str,
        chooser: &mut C,
    ) -> Result<VersionResolution> {
        let mut notices = Vec::new();

        let available = match self.fetch_stable_versions(DEFAULT_VERSION_LIMIT).await {
            Ok(versions) => versions,
            Err(e) => {
                tracing::warn!("{}; using {} as fallback", e, LATEST);
                notices.push(e);
                Vec::new()
            }
        };

        let version = self.resolve(requested, &available, chooser, &mut notices)?;

        Ok(VersionResolution {
            version,
            available,
            notices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Source returning canned versions or failing, counting calls
    #[derive(Clone)]
    struct FakeSource {
        versions: Option<Vec<&'static str>>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn ok(versions: Vec<&'static str>) -> Self {
            Self {
                versions: Some(versions),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                versions: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl VersionSource for FakeSource {
        async fn fetch_versions(&self, package: &str) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.versions {
                Some(v) => Ok(v.iter().map(|s| s.to_string()).collect()),
                None => Err(ScaffoldError::Registry {
                    package: package.to_string(),
                    reason: "offline".to_string(),
                }),
            }
        }
    }

    fn never_called(_: &[VersionOption]) -> Result<Option<String>> {
        panic!("chooser should not be consulted")
    }

    fn owned(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_fetch_filters_sorts_and_limits() {
        let mut resolver = VersionResolver::new(
            FakeSource::ok(vec!["0.1.0", "0.3.0-rc.1", "0.2.0", "0.10.0"]),
            "textmode.js",
        );
        let versions = resolver.fetch_stable_versions(2).await.unwrap();
        assert_eq!(versions, owned(&["0.10.0", "0.2.0"]));
    }

    #[tokio::test]
    async fn test_cache_populated_once() {
        let source = FakeSource::ok(vec!["1.0.0", "2.0.0"]);
        let calls = source.calls.clone();
        let mut resolver = VersionResolver::new(source, "textmode.js");

        resolver.fetch_stable_versions(20).await.unwrap();
        let second = resolver.fetch_stable_versions(1).await.unwrap();

        assert_eq!(second, owned(&["2.0.0"]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retried() {
        let source = FakeSource::failing();
        let calls = source.calls.clone();
        let mut resolver = VersionResolver::new(source, "textmode.js");

        assert!(resolver.fetch_stable_versions(20).await.is_err());
        assert!(resolver.fetch_stable_versions(20).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_only_prereleases_is_registry_error() {
        let mut resolver =
            VersionResolver::new(FakeSource::ok(vec!["1.0.0-beta"]), "textmode.js");
        let err = resolver.fetch_stable_versions(20).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::Registry { .. }));
    }

    #[test]
    fn test_options_put_latest_first() {
        let options =
            VersionResolver::<FakeSource>::options(&owned(&["0.3.0", "0.2.0", "0.1.0"]));
        assert_eq!(options[0].value, "latest");
        assert_eq!(options[0].label, "latest (0.3.0)");
        let rest: Vec<&str> = options[1..].iter().map(|o| o.value.as_str()).collect();
        assert_eq!(rest, vec!["0.2.0", "0.1.0"]);
    }

    #[test]
    fn test_resolve_known_and_latest_verbatim() {
        let resolver = VersionResolver::new(FakeSource::failing(), "textmode.js");
        let available = owned(&["0.2.0", "0.1.0"]);
        let mut notices = Vec::new();

        let v = resolver
            .resolve("0.1.0", &available, &mut never_called, &mut notices)
            .unwrap();
        assert_eq!(v, "0.1.0");

        let v = resolver
            .resolve("latest", &[], &mut never_called, &mut notices)
            .unwrap();
        assert_eq!(v, "latest");
        assert!(notices.is_empty());
    }

    #[test]
    fn test_resolve_unknown_falls_back_with_notice() {
        let resolver = VersionResolver::new(FakeSource::failing(), "textmode.js");
        let mut notices = Vec::new();

        let v = resolver
            .resolve("9.9.9", &owned(&["0.2.0"]), &mut never_called, &mut notices)
            .unwrap();
        assert_eq!(v, "latest");
        assert!(matches!(
            notices.as_slice(),
            [ScaffoldError::RequestedVersionNotFound { version, .. }] if version == "9.9.9"
        ));
    }

    #[test]
    fn test_resolve_empty_request_uses_chooser() {
        let resolver = VersionResolver::new(FakeSource::failing(), "textmode.js");
        let mut seen = Vec::new();
        let mut chooser = |options: &[VersionOption]| -> Result<Option<String>> {
            seen = options.to_vec();
            Ok(Some("0.1.0".to_string()))
        };

        let v = resolver
            .resolve("", &owned(&["0.2.0", "0.1.0"]), &mut chooser, &mut Vec::new())
            .unwrap();
        assert_eq!(v, "0.1.0");
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_resolve_chooser_cancel() {
        let resolver = VersionResolver::new(FakeSource::failing(), "textmode.js");
        let mut chooser = |_: &[VersionOption]| -> Result<Option<String>> { Ok(None) };

        let result = resolver.resolve("", &owned(&["0.2.0"]), &mut chooser, &mut Vec::new());
        assert!(matches!(result, Err(ScaffoldError::Cancelled)));
    }

    #[tokio::test]
    async fn test_registry_failure_resolves_to_latest() {
        let mut resolver = VersionResolver::new(FakeSource::failing(), "textmode.js");

        let resolution = resolver.resolve_version("", &mut never_called).await.unwrap();
        assert_eq!(resolution.version, "latest");
        assert!(resolution.available.is_empty());
        assert!(matches!(
            resolution.notices.as_slice(),
            [ScaffoldError::Registry { .. }]
        ));
    }
}
