//! Baseline detection from tag history
//!
//! Every tag points at a commit whose tree holds
//! `<protocol>/<protocol>_schema`; the `version` field of that file records
//! which REDCap revision the commit was converted from.

use std::path::PathBuf;

use git2::Repository;
use serde_json::Value;

use crate::core::models::{Baseline, Revision};

/// Repository path of a protocol's schema file
#[must_use]
pub fn schema_path(protocol: &str) -> PathBuf {
    PathBuf::from(protocol).join(format!("{protocol}_schema"))
}

/// Revision recorded in schema JSON; a missing `version` means `revid0`
#[must_use]
pub fn parse_schema_version(content: &[u8]) -> Option<Revision> {
    let schema: Value = serde_json::from_slice(content).ok()?;
    match schema.get("version") {
        None => Some(Revision(0)),
        Some(Value::String(marker)) => Revision::from_marker(marker),
        Some(_) => None,
    }
}

/// Read the schema revision at one tag
fn revision_at_tag(repo: &Repository, tag: &str, protocol: &str) -> Result<Revision, String> {
    let commit = repo
        .revparse_single(&format!("refs/tags/{tag}"))
        .and_then(|obj| obj.peel_to_commit())
        .map_err(|e| e.to_string())?;
    let tree = commit.tree().map_err(|e| e.to_string())?;
    let path = schema_path(protocol);
    let entry = tree
        .get_path(&path)
        .map_err(|_| format!("schema file {} not found", path.display()))?;
    let blob = entry
        .to_object(repo)
        .and_then(|obj| obj.peel_to_blob())
        .map_err(|e| e.to_string())?;
    parse_schema_version(blob.content())
        .ok_or_else(|| format!("schema file {} has no valid version", path.display()))
}

/// Highest schema revision over all tags
///
/// Tags whose schema cannot be read are logged and skipped. Ordering is keyed
/// on the recorded revision rather than the tag text, so a tag with an
/// irregular name cannot hide a newer conversion.
pub fn latest_revision(repo: &Repository, protocol: &str) -> Result<Baseline, git2::Error> {
    let names = repo.tag_names(None)?;
    let mut tags: Vec<&str> = names.iter().flatten().collect();
    tags.sort_unstable();

    let mut best = Baseline::empty();
    for tag in tags {
        match revision_at_tag(repo, tag, protocol) {
            Ok(revision) => {
                log::debug!("Tag {tag} records {}", revision.marker());
                if best.tag.is_none() || revision >= best.revision {
                    best = Baseline {
                        revision,
                        tag: Some(tag.to_string()),
                    };
                }
            },
            Err(reason) => log::warn!("Error reading schema file at tag {tag}: {reason}"),
        }
    }
    Ok(best)
}
