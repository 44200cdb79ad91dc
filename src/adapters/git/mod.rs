//! Git integration adapter
//!
//! Implements `VersionControl` on top of `git2` for reads and the `git` CLI
//! for writes.
//!
//! - [`tags`] - Baseline detection from tag history
//! - [`publish`] - Stage, commit, tag and push

pub mod publish;
pub mod tags;

use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{ErrorCode, Repository, Status, StatusOptions};

use crate::core::models::{Baseline, CommitRequest, PushPolicy};
use crate::core::ports::VersionControl;
use crate::error::Result;

pub use tags::{latest_revision, parse_schema_version, schema_path};

/// Git-based version control implementation
#[derive(Debug, Clone)]
pub struct GitVersionControl {
    /// Working directory
    workdir: PathBuf,
}

impl GitVersionControl {
    /// Create a new git version control adapter
    #[must_use]
    pub const fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }

    /// Working directory this adapter operates on
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn open(&self) -> Result<Repository> {
        Ok(Repository::open(&self.workdir)?)
    }
}

impl VersionControl for GitVersionControl {
    fn baseline(&self, protocol: &str) -> Result<Baseline> {
        let repo = self.open()?;
        Ok(latest_revision(&repo, protocol)?)
    }

    fn modified_files(&self) -> Result<Vec<String>> {
        let repo = self.open()?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);

        let statuses = repo.statuses(Some(&mut opts))?;
        Ok(statuses
            .iter()
            .filter(|entry| entry.status().contains(Status::WT_MODIFIED))
            .filter_map(|entry| entry.path().map(String::from))
            .collect())
    }

    fn head_content(&self, path: &str) -> Result<Option<String>> {
        let repo = self.open()?;
        let tree = match repo.head() {
            Ok(head) => head.peel_to_tree()?,
            Err(e) if e.code() == ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let blob = entry.to_object(&repo)?.peel_to_blob()?;
        Ok(Some(String::from_utf8_lossy(blob.content()).into_owned()))
    }

    fn revert_file(&self, path: &str) -> Result<()> {
        let repo = self.open()?;
        let mut checkout = CheckoutBuilder::new();
        checkout.force().path(path);
        repo.checkout_head(Some(&mut checkout))?;
        Ok(())
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        let repo = self.open()?;
        match repo.find_reference(&format!("refs/tags/{tag}")) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn commit_and_tag(&self, request: &CommitRequest) -> Result<()> {
        publish::commit_and_tag(&self.workdir, request)
    }

    fn publish_pending(&self, tag: &str, remote: &str, push: PushPolicy) -> Result<bool> {
        publish::publish_pending(&self.workdir, remote, tag, push)
    }
}
