//! Version control system port
//!
//! Defines the interface for reading tag history and recording conversions.

use crate::core::models::{Baseline, CommitRequest, PushPolicy};
use crate::error::Result;

/// Version control system abstraction
///
/// Implementations handle interactions with git or other VCS systems.
pub trait VersionControl {
    /// Highest revision recorded by any tag, read from the protocol's schema file
    fn baseline(&self, protocol: &str) -> Result<Baseline>;

    /// Tracked files modified in the working tree relative to the index
    fn modified_files(&self) -> Result<Vec<String>>;

    /// Content of a file at HEAD, `None` if it is not tracked there
    fn head_content(&self, path: &str) -> Result<Option<String>>;

    /// Discard working-tree changes to a single file
    fn revert_file(&self, path: &str) -> Result<()>;

    /// Whether a local tag with this name exists
    fn tag_exists(&self, tag: &str) -> Result<bool>;

    /// Stage, commit, tag and push according to the request
    fn commit_and_tag(&self, request: &CommitRequest) -> Result<()>;

    /// Push `tag` and the current branch if `remote` does not have the tag yet
    ///
    /// Returns whether a push happened. Does nothing under `PushPolicy::Skip`.
    fn publish_pending(&self, tag: &str, remote: &str, push: PushPolicy) -> Result<bool>;
}
