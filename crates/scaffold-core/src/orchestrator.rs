//! Scaffold pipeline: Validate -> ResolveVersion -> Scaffold -> Install -> Run
//!
//! Validate and Scaffold are mandatory; their errors abort the run. Version
//! resolution never fails (short of the user cancelling), and Install/Run
//! failures are recorded as notices without touching the scaffolded tree.
//! Nothing is retried.

use crate::error::{Result, ScaffoldError};
use crate::probe::{self, TargetState};
use crate::registry::{VersionChooser, VersionResolution, VersionResolver, VersionSource};
use crate::runtime::{CommandRunner, PackageManager};
use crate::templates::{self, MaterializeReport, TemplateDescriptor};
use std::path::{Path, PathBuf};

/// Inputs for one scaffold run, fixed before any file I/O
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    project_name: String,
    target_dir: PathBuf,
    template: TemplateDescriptor,
    template_root: PathBuf,
    dependency_version: String,
    force: bool,
}

impl ScaffoldRequest {
    /// Build a request; `dependency_version` may be empty (ask), `latest`, or exact
    pub fn new(
        project_name: impl Into<String>,
        target_dir: impl Into<PathBuf>,
        template: TemplateDescriptor,
        template_root: impl Into<PathBuf>,
        dependency_version: impl Into<String>,
        force: bool,
    ) -> Result<Self> {
        let project_name = project_name.into().trim().to_string();
        if project_name.is_empty() {
            return Err(ScaffoldError::InvalidRequest(
                "project name cannot be empty".to_string(),
            ));
        }

        let target_dir = target_dir.into();
        if !target_dir.is_absolute() {
            return Err(ScaffoldError::InvalidRequest(format!(
                "target directory must be absolute: {}",
                target_dir.display()
            )));
        }

        Ok(Self {
            project_name,
            target_dir,
            template,
            template_root: template_root.into(),
            dependency_version: dependency_version.into().trim().to_string(),
            force,
        })
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn template(&self) -> &TemplateDescriptor {
        &self.template
    }

    /// Requested dependency version as given by the caller
    pub fn dependency_version(&self) -> &str {
        &self.dependency_version
    }

    pub fn force(&self) -> bool {
        self.force
    }

    /// Absolute path of the template tree to copy
    pub fn template_source(&self) -> PathBuf {
        self.template.source_path(&self.template_root)
    }
}

/// Which optional stages the caller wants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunPlan {
    pub install: bool,
    /// Only attempted after a successful install
    pub run: bool,
}

/// Which optional side effects actually happened
#[derive(Debug)]
pub struct ScaffoldResult {
    pub installed: bool,
    pub ran: bool,
    /// Version pinned into the manifest
    pub version: String,
    pub target: TargetState,
    pub report: MaterializeReport,
    /// Recovered problems (registry, unknown version, subprocess)
    pub notices: Vec<ScaffoldError>,
}

/// Sequences the scaffold stages for a product dependency
pub struct Orchestrator<R> {
    runner: R,
    package_manager: PackageManager,
    dependency_key: String,
}

impl<R: CommandRunner> Orchestrator<R> {
    pub fn new(runner: R, package_manager: PackageManager, dependency_key: impl Into<String>) -> Self {
        Self {
            runner,
            package_manager,
            dependency_key: dependency_key.into(),
        }
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    /// Validate stage
    pub async fn validate_target<F>(&self, request: &ScaffoldRequest, confirm: F) -> Result<TargetState>
    where
        F: FnOnce(&Path) -> Result<bool>,
    {
        probe::validate_target(request.target_dir(), request.force(), confirm).await
    }

    /// Validate then ResolveVersion.
    ///
    /// A declined overwrite returns before the registry or the chooser is
    /// consulted.
    pub async fn prepare<S, C, F>(
        &self,
        request: &ScaffoldRequest,
        resolver: &mut VersionResolver<S>,
        chooser: &mut C,
        confirm: F,
    ) -> Result<(TargetState, VersionResolution)>
    where
        S: VersionSource,
        C: VersionChooser + ?Sized,
        F: FnOnce(&Path) -> Result<bool>,
    {
        let target = self.validate_target(request, confirm).await?;
        let resolution = resolver
            .resolve_version(request.dependency_version(), chooser)
            .await?;
        Ok((target, resolution))
    }

    /// Scaffold stage, pinning `version` into the manifest
    pub async fn scaffold(&self, request: &ScaffoldRequest, version: &str) -> Result<MaterializeReport> {
        templates::scaffold(
            &request.template_source(),
            request.target_dir(),
            request.project_name(),
            &self.dependency_key,
            version,
        )
        .await
    }

    /// Install stage; failure is returned, never raised
    pub async fn install(&self, project_dir: &Path) -> Result<()> {
        self.runner
            .run(&self.package_manager.install_command(), project_dir)
            .await
    }

    /// Dev-server stage; failure is returned, never raised
    pub async fn run_dev(&self, project_dir: &Path) -> Result<()> {
        self.runner
            .run(&self.package_manager.dev_command(), project_dir)
            .await
    }

    /// Run the whole pipeline headlessly
    pub async fn execute<S, C, F>(
        &self,
        request: &ScaffoldRequest,
        resolver: &mut VersionResolver<S>,
        chooser: &mut C,
        confirm: F,
        plan: RunPlan,
    ) -> Result<ScaffoldResult>
    where
        S: VersionSource,
        C: VersionChooser + ?Sized,
        F: FnOnce(&Path) -> Result<bool>,
    {
        let (target, resolution) = self.prepare(request, resolver, chooser, confirm).await?;
        let mut notices = resolution.notices;

        let report = self.scaffold(request, &resolution.version).await?;

        let mut installed = false;
        if plan.install {
            match self.install(request.target_dir()).await {
                Ok(()) => installed = true,
                Err(e) => {
                    tracing::error!("Dependency installation failed: {}", e);
                    notices.push(e);
                }
            }
        }

        let mut ran = false;
        if plan.run && installed {
            match self.run_dev(request.target_dir()).await {
                Ok(()) => ran = true,
                Err(e) => {
                    tracing::error!("{}", e);
                    notices.push(e);
                }
            }
        }

        Ok(ScaffoldResult {
            installed,
            ran,
            version: resolution.version,
            target,
            report,
            notices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::VersionOption;
    use crate::runtime::CommandSpec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Records commands; fails the ones whose display matches `fail`
    #[derive(Default)]
    struct RecordingRunner {
        fail: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl CommandRunner for RecordingRunner {
        async fn run(&self, spec: &CommandSpec, _cwd: &Path) -> Result<()> {
            let command = spec.to_string();
            self.calls.lock().unwrap().push(command.clone());
            if self.fail == Some(command.as_str()) {
                return Err(ScaffoldError::Subprocess {
                    command,
                    code: Some(1),
                    source: None,
                });
            }
            Ok(())
        }
    }

    struct StaticSource(Vec<&'static str>);

    impl VersionSource for StaticSource {
        async fn fetch_versions(&self, _package: &str) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    /// Source that only counts how often it is queried
    #[derive(Default)]
    struct CountingSource(Arc<AtomicUsize>);

    impl VersionSource for CountingSource {
        async fn fetch_versions(&self, _package: &str) -> Result<Vec<String>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(vec!["1.0.0".to_string()])
        }
    }

    fn no_prompt(_: &[VersionOption]) -> Result<Option<String>> {
        panic!("chooser should not be consulted")
    }

    fn template_root() -> TempDir {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("vanilla-js");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("package.json"),
            r#"{"name":"{{name}}","dependencies":{"textmode.js":"^0.1.0"}}"#,
        )
        .unwrap();
        root
    }

    fn request(root: &Path, target: &Path, version: &str, force: bool) -> ScaffoldRequest {
        let template = TemplateDescriptor {
            name: "vanilla-js".to_string(),
            label: "Vanilla JS".to_string(),
            dir: "vanilla-js".to_string(),
        };
        ScaffoldRequest::new("demo", target, template, root, version, force).unwrap()
    }

    #[test]
    fn test_request_rejects_empty_name_and_relative_dir() {
        let template = TemplateDescriptor {
            name: "t".to_string(),
            label: "T".to_string(),
            dir: "t".to_string(),
        };
        assert!(ScaffoldRequest::new("  ", "/tmp/x", template.clone(), "/t", "", false).is_err());
        assert!(ScaffoldRequest::new("x", "relative/x", template, "/t", "", false).is_err());
    }

    #[tokio::test]
    async fn test_execute_full_pipeline() {
        let root = template_root();
        let out = TempDir::new().unwrap();
        let target = out.path().join("demo");
        let orchestrator =
            Orchestrator::new(RecordingRunner::default(), PackageManager::Pnpm, "textmode.js");
        let mut resolver = VersionResolver::new(StaticSource(vec!["0.2.0", "0.1.0"]), "textmode.js");

        let result = orchestrator
            .execute(
                &request(root.path(), &target, "0.1.0", false),
                &mut resolver,
                &mut no_prompt,
                |_| Ok(false),
                RunPlan { install: true, run: true },
            )
            .await
            .unwrap();

        assert!(result.installed);
        assert!(result.ran);
        assert_eq!(result.version, "0.1.0");
        assert_eq!(result.target, TargetState::Missing);
        assert!(result.notices.is_empty());
        assert_eq!(
            *orchestrator.runner.calls.lock().unwrap(),
            vec!["pnpm install".to_string(), "pnpm run dev".to_string()]
        );

        let manifest = std::fs::read_to_string(target.join("package.json")).unwrap();
        assert!(manifest.contains("\"textmode.js\": \"0.1.0\""));
    }

    #[tokio::test]
    async fn test_failed_install_skips_run_and_keeps_tree() {
        let root = template_root();
        let out = TempDir::new().unwrap();
        let target = out.path().join("demo");
        let orchestrator = Orchestrator::new(
            RecordingRunner {
                fail: Some("npm install"),
                ..Default::default()
            },
            PackageManager::Npm,
            "textmode.js",
        );
        let mut resolver = VersionResolver::new(StaticSource(vec!["0.2.0"]), "textmode.js");

        let result = orchestrator
            .execute(
                &request(root.path(), &target, "latest", false),
                &mut resolver,
                &mut no_prompt,
                |_| Ok(false),
                RunPlan { install: true, run: true },
            )
            .await
            .unwrap();

        assert!(!result.installed);
        assert!(!result.ran);
        assert!(matches!(
            result.notices.as_slice(),
            [ScaffoldError::Subprocess { .. }]
        ));
        assert_eq!(orchestrator.runner.calls.lock().unwrap().len(), 1);
        assert!(target.join("package.json").exists());
    }

    #[tokio::test]
    async fn test_declined_overwrite_aborts_without_mutation() {
        let root = template_root();
        let target = TempDir::new().unwrap();
        std::fs::write(target.path().join("keep.txt"), "mine").unwrap();
        let orchestrator =
            Orchestrator::new(RecordingRunner::default(), PackageManager::Npm, "textmode.js");
        let mut resolver = VersionResolver::new(StaticSource(vec![]), "textmode.js");

        let err = orchestrator
            .execute(
                &request(root.path(), target.path(), "", false),
                &mut resolver,
                &mut no_prompt,
                |_| Ok(false),
                RunPlan::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::TargetNotEmpty { .. }));
        assert!(!target.path().join("package.json").exists());
    }

    #[tokio::test]
    async fn test_declined_overwrite_skips_registry_and_chooser() {
        let root = template_root();
        let target = TempDir::new().unwrap();
        std::fs::write(target.path().join("notes.txt"), "keep").unwrap();
        let orchestrator =
            Orchestrator::new(RecordingRunner::default(), PackageManager::Npm, "textmode.js");
        let source = CountingSource::default();
        let fetches = source.0.clone();
        let mut resolver = VersionResolver::new(source, "textmode.js");

        let err = orchestrator
            .prepare(
                &request(root.path(), target.path(), "", false),
                &mut resolver,
                &mut no_prompt,
                |_| Ok(false),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::TargetNotEmpty { .. }));
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prepare_resolves_after_confirmation() {
        let root = template_root();
        let target = TempDir::new().unwrap();
        std::fs::write(target.path().join("notes.txt"), "keep").unwrap();
        let orchestrator =
            Orchestrator::new(RecordingRunner::default(), PackageManager::Npm, "textmode.js");
        let source = CountingSource::default();
        let fetches = source.0.clone();
        let mut resolver = VersionResolver::new(source, "textmode.js");
        let mut chosen = |options: &[VersionOption]| -> Result<Option<String>> {
            Ok(Some(options[0].value.clone()))
        };

        let (state, resolution) = orchestrator
            .prepare(
                &request(root.path(), target.path(), "", false),
                &mut resolver,
                &mut chosen,
                |_| Ok(true),
            )
            .await
            .unwrap();

        assert_eq!(state, TargetState::NonEmptyAccepted);
        assert_eq!(resolution.version, "latest");
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(!target.path().join("package.json").exists());
    }

    #[tokio::test]
    async fn test_unknown_version_and_forced_reuse() {
        let root = template_root();
        let target = TempDir::new().unwrap();
        std::fs::write(target.path().join("keep.txt"), "mine").unwrap();
        let orchestrator =
            Orchestrator::new(RecordingRunner::default(), PackageManager::Npm, "textmode.js");
        let mut resolver = VersionResolver::new(StaticSource(vec!["0.2.0"]), "textmode.js");

        let result = orchestrator
            .execute(
                &request(root.path(), target.path(), "9.9.9", true),
                &mut resolver,
                &mut no_prompt,
                |_| panic!("forced runs never prompt"),
                RunPlan::default(),
            )
            .await
            .unwrap();

        assert_eq!(result.version, "latest");
        assert_eq!(result.target, TargetState::NonEmptyAccepted);
        assert!(matches!(
            result.notices.as_slice(),
            [ScaffoldError::RequestedVersionNotFound { .. }]
        ));
        assert!(orchestrator.runner.calls.lock().unwrap().is_empty());
        assert!(target.path().join("keep.txt").exists());
    }
}
