//! Target directory checks run before anything is written

use crate::error::{Result, ScaffoldError};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Entries ignored when deciding whether a directory is empty enough to reuse
pub const IGNORED_DIR_ENTRIES: &[&str] = &[".git", ".gitkeep"];

/// What the Validate stage found at the target path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// Nothing exists yet
    Missing,
    /// Exists but holds only ignored entries
    Empty,
    /// Holds other entries; reuse was forced or confirmed
    NonEmptyAccepted,
}

/// True if the path resolves to any filesystem entry.
///
/// Only `NotFound` maps to `false`; permission errors and the like propagate.
pub async fn exists(path: &Path) -> Result<bool> {
    match fs::metadata(path).await {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(ScaffoldError::Probe {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// True if the directory is missing or contains only [`IGNORED_DIR_ENTRIES`]
pub async fn is_empty_enough(path: &Path) -> Result<bool> {
    let mut entries = match fs::read_dir(path).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
        Err(source) => {
            return Err(ScaffoldError::Probe {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let probe_err = |source| ScaffoldError::Probe {
        path: path.to_path_buf(),
        source,
    };

    while let Some(entry) = entries.next_entry().await.map_err(probe_err)? {
        let name = entry.file_name();
        let ignored = name
            .to_str()
            .is_some_and(|n| IGNORED_DIR_ENTRIES.contains(&n));
        if !ignored {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Validate stage: decide whether the target may be scaffolded into.
///
/// `confirm` is only consulted when the target holds other entries and
/// `force` is off. Declining yields [`ScaffoldError::TargetNotEmpty`] before
/// anything is written.
pub async fn validate_target<F>(path: &Path, force: bool, confirm: F) -> Result<TargetState>
where
    F: FnOnce(&Path) -> Result<bool>,
{
    if !exists(path).await? {
        return Ok(TargetState::Missing);
    }

    if is_empty_enough(path).await? {
        return Ok(TargetState::Empty);
    }

    if force {
        tracing::debug!(path = %path.display(), "reusing non-empty directory (forced)");
        return Ok(TargetState::NonEmptyAccepted);
    }

    if confirm(path)? {
        Ok(TargetState::NonEmptyAccepted)
    } else {
        Err(ScaffoldError::TargetNotEmpty {
            path: path.to_path_buf(),
        })
    }
}
