//! Error taxonomy for the scaffold pipeline
//!
//! Fatal variants (`TargetNotEmpty`, `ScaffoldIo`, `InvalidRequest`, ...) abort
//! the run. Recoverable variants (`Registry`, `RequestedVersionNotFound`,
//! `Subprocess`) are caught where they originate and handed back to the caller
//! as notices so the front-end can render them as warnings.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the core library
pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Target exists with disallowed contents and the caller did not override
    #[error("Directory {} is not empty", .path.display())]
    TargetNotEmpty { path: PathBuf },

    /// Registry fetch failed or returned no stable versions
    #[error("Could not fetch versions of {package}: {reason}")]
    Registry { package: String, reason: String },

    /// Requested version is absent from the stable list
    #[error("Requested {package}@{version} not found; using latest instead")]
    RequestedVersionNotFound { package: String, version: String },

    /// Directory creation or bulk copy failed
    #[error("Failed to {action} {}", .path.display())]
    ScaffoldIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Install or dev-run command failed to spawn or exited non-zero
    #[error("{command} {}", describe_exit(.code))]
    Subprocess {
        command: String,
        code: Option<i32>,
        /// Why the process could not be started or awaited
        #[source]
        source: Option<io::Error>,
    },

    /// Filesystem probe failed with something other than "not found"
    #[error("Failed to inspect {}", .path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid scaffold request: {0}")]
    InvalidRequest(String),

    #[error("Unknown template '{name}'. Available templates: {available}")]
    UnknownTemplate { name: String, available: String },

    #[error("Failed to load template catalog: {0}")]
    Catalog(String),

    /// Terminal prompt failed for a reason other than cancellation
    #[error("Prompt failed")]
    Prompt(#[source] io::Error),

    /// The user backed out of an interactive choice
    #[error("Operation cancelled.")]
    Cancelled,
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {}", code),
        None => "failed to start".to_string(),
    }
}

impl ScaffoldError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ScaffoldIo {
            action,
            path: path.into(),
            source,
        }
    }

    /// Whether this error is downgraded to a warning instead of aborting the run
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Registry { .. } | Self::RequestedVersionNotFound { .. } | Self::Subprocess { .. }
        )
    }
}
