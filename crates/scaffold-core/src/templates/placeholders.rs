//! Post-copy rewrites: `{{name}}` substitution and dot-file restoration
//!
//! Every file gets its own [`FileOutcome`]; nothing in here aborts the walk.

use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Token replaced with the project name
pub const PLACEHOLDER: &str = "{{name}}";

/// Extensions (case-insensitive) whose files are scanned for [`PLACEHOLDER`]
pub const TEXT_EXTENSIONS: &[&str] = &[
    "json", "js", "jsx", "ts", "tsx", "vue", "md", "html", "txt", "cjs", "mjs",
];

/// Templates ship this instead of `.gitignore`, which packaging tends to drop
pub const GITIGNORE_STAND_IN: &str = "_gitignore";
pub const GITIGNORE: &str = ".gitignore";

/// Why a file was left alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Extension not in [`TEXT_EXTENSIONS`]; never opened
    NotText,
    /// Directory entry could not be listed
    Unlisted(String),
    Unreadable(String),
    WriteFailed(String),
    RenameFailed(String),
}

/// What happened to a single file during the rewrite pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Placeholder found and replaced
    Rewritten,
    /// Text file without the placeholder; not written
    Unchanged,
    /// Stand-in renamed to its dot-file name
    Renamed { to: PathBuf },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Path relative to the project root
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Whether the file name carries one of the text extensions
pub fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            TEXT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Walk `root` depth-first and apply the rewrites to every file
pub async fn rewrite_tree(root: &Path, project_name: &str) -> Vec<FileReport> {
    let mut reports = Vec::new();

    // Collected up front so renames don't disturb the directory iteration
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                reports.push(FileReport {
                    path: relative_to(root, &path),
                    outcome: FileOutcome::Skipped(SkipReason::Unlisted(e.to_string())),
                });
            }
        }
    }

    for path in files {
        let outcome = rewrite_file(&path, project_name).await;
        if let FileOutcome::Skipped(reason) = &outcome {
            if *reason != SkipReason::NotText {
                tracing::warn!(path = %path.display(), ?reason, "skipped file");
            }
        }
        reports.push(FileReport {
            path: relative_to(root, &path),
            outcome,
        });
    }

    reports
}

/// Apply the rewrite rules to one file
pub async fn rewrite_file(path: &Path, project_name: &str) -> FileOutcome {
    if path.file_name().is_some_and(|n| n == GITIGNORE_STAND_IN) {
        let to = path.with_file_name(GITIGNORE);
        return match fs::rename(path, &to).await {
            Ok(()) => FileOutcome::Renamed { to },
            Err(e) => FileOutcome::Skipped(SkipReason::RenameFailed(e.to_string())),
        };
    }

    if !is_text_file(path) {
        return FileOutcome::Skipped(SkipReason::NotText);
    }

    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => return FileOutcome::Skipped(SkipReason::Unreadable(e.to_string())),
    };

    if !content.contains(PLACEHOLDER) {
        return FileOutcome::Unchanged;
    }

    match fs::write(path, content.replace(PLACEHOLDER, project_name)).await {
        Ok(()) => FileOutcome::Rewritten,
        Err(e) => FileOutcome::Skipped(SkipReason::WriteFailed(e.to_string())),
    }
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
