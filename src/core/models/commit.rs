//! Commit and tag requests

use serde::Serialize;

use super::{InputFile, PushPolicy, Revision};

/// Folder shared by all protocols that holds activity schemas
pub const ACTIVITIES_DIR: &str = "activities";

/// Baseline read from the repository's tag history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Baseline {
    /// Highest revision already committed and tagged
    pub revision: Revision,
    /// Tag that carries it, if any
    pub tag: Option<String>,
}

impl Baseline {
    /// Baseline of a repository with no readable tags
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            revision: Revision(0),
            tag: None,
        }
    }
}

/// Everything the version-control adapter needs to record one revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    /// Repository-relative directories to stage
    pub paths: Vec<String>,
    /// Commit message
    pub message: String,
    /// Tag name
    pub tag: String,
    /// Annotated tag message
    pub tag_message: String,
    /// Remote to push to
    pub remote: String,
    /// Push behavior
    pub push: PushPolicy,
}

impl CommitRequest {
    /// Build the request for a converted input file
    ///
    /// `label` is an optional study name inserted into the commit message.
    #[must_use]
    pub fn for_file(
        file: &InputFile,
        protocol: &str,
        label: Option<&str>,
        remote: &str,
        push: PushPolicy,
    ) -> Self {
        let date_time = file.date_time();
        let message = label.map_or_else(
            || format!("converted redcap data dictionary {date_time} to reproschema"),
            |l| format!("converted {l} redcap data dictionary {date_time} to reproschema"),
        );
        Self {
            paths: output_folders(protocol),
            message,
            tag: file.tag_name(),
            tag_message: format!("redcap data dictionary {date_time} to reproschema"),
            remote: remote.to_string(),
            push,
        }
    }
}

/// Output folders owned by a protocol: its own folder and the shared activities
#[must_use]
pub fn output_folders(protocol: &str) -> Vec<String> {
    vec![protocol.to_string(), ACTIVITIES_DIR.to_string()]
}
