//! Bulk copy of a template tree into the target directory

use crate::error::{Result, ScaffoldError};
use std::path::Path;
use tokio::fs;
use walkdir::WalkDir;

/// Recursively copy `source` into `target_dir`, overwriting same-named files.
///
/// Entries already in the target that the template does not ship are left
/// alone. Returns the number of files copied. Any failure here is fatal; a
/// failure halfway leaves a partial tree behind.
pub async fn copy_tree(source: &Path, target_dir: &Path) -> Result<usize> {
    // Ensure target directory exists
    fs::create_dir_all(target_dir)
        .await
        .map_err(|e| ScaffoldError::io("create directory", target_dir, e))?;

    let mut copied = 0;

    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ScaffoldError::io("read template", source, e.into()))?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| {
                ScaffoldError::InvalidRequest(format!(
                    "{} is outside the template root",
                    entry.path().display()
                ))
            })?;
        let target_path = target_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path)
                .await
                .map_err(|e| ScaffoldError::io("create directory", &target_path, e))?;
            continue;
        }

        fs::copy(entry.path(), &target_path)
            .await
            .map_err(|e| ScaffoldError::io("copy file to", &target_path, e))?;
        copied += 1;
    }

    tracing::debug!(
        source = %source.display(),
        target = %target_dir.display(),
        copied,
        "template copied"
    );

    Ok(copied)
}
