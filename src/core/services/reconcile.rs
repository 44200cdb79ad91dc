//! Version-only change detection
//!
//! The converter rewrites the `version` marker in every generated file, even
//! for activities the new revision did not touch. A modified file whose only
//! difference from HEAD is that marker is reverted so commits only record
//! real schema changes.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::core::ports::VersionControl;
use crate::error::Result;

/// Field rewritten by the converter on every run
pub const VERSION_FIELD: &str = "version";

/// Classification of a modified file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Only the version marker differs; safe to discard
    VersionOnly,
    /// Anything else differs; must be committed
    Substantive,
}

/// Outcome of a reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Files reverted to HEAD
    pub reverted: Vec<String>,
    /// Modified files left for the commit
    pub kept: Vec<String>,
}

/// Compare working-tree and committed JSON content
///
/// Both sides must parse as JSON. Non-object documents are always
/// substantive.
pub fn classify(working: &str, committed: &str) -> serde_json::Result<ChangeKind> {
    let working: Value = serde_json::from_str(working)?;
    let committed: Value = serde_json::from_str(committed)?;

    let (Value::Object(mut working), Value::Object(mut committed)) = (working, committed) else {
        return Ok(ChangeKind::Substantive);
    };

    let working_version = working.remove(VERSION_FIELD);
    let committed_version = committed.remove(VERSION_FIELD);

    if working == committed && working_version != committed_version {
        Ok(ChangeKind::VersionOnly)
    } else {
        Ok(ChangeKind::Substantive)
    }
}

/// Files considered for reconciliation
#[must_use]
pub fn is_candidate(path: &str) -> bool {
    Path::new(path).extension().is_some_and(|ext| ext == "json")
}

/// Revert every modified JSON file whose only change is the version marker
///
/// Files that cannot be read or parsed on either side are logged and left
/// as they are.
pub fn reconcile(vcs: &dyn VersionControl, repo_root: &Path) -> Result<ReconcileSummary> {
    let mut summary = ReconcileSummary::default();

    for path in vcs.modified_files()? {
        if !is_candidate(&path) {
            continue;
        }

        let working = match fs::read_to_string(repo_root.join(&path)) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Cannot read {path}: {e}");
                summary.kept.push(path);
                continue;
            },
        };
        let Some(committed) = vcs.head_content(&path)? else {
            summary.kept.push(path);
            continue;
        };

        match classify(&working, &committed) {
            Ok(ChangeKind::VersionOnly) => {
                log::debug!("Discarding version-only change to {path}");
                vcs.revert_file(&path)?;
                summary.reverted.push(path);
            },
            Ok(ChangeKind::Substantive) => summary.kept.push(path),
            Err(e) => {
                log::warn!("Cannot compare {path}: {e}");
                summary.kept.push(path);
            },
        }
    }

    if !summary.reverted.is_empty() {
        log::info!("Discarded version-only changes in {} file(s)", summary.reverted.len());
    }
    Ok(summary)
}
