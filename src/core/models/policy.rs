//! Run policies
//!
//! Selection order for eligible input files and how pushes react to a
//! rejecting remote.

use serde::{Deserialize, Serialize};

/// Order in which eligible input files are processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// Oldest first; every file newer than the baseline is processed
    #[default]
    #[serde(rename = "ascending", alias = "ascending-all")]
    AscendingAll,
    /// Newest first; stops at the first file not newer than the running baseline
    #[serde(rename = "descending", alias = "descending-early-stop")]
    DescendingEarlyStop,
}

impl SelectionPolicy {
    /// Whether processing stops once a file no longer exceeds the running baseline
    #[must_use]
    pub const fn stops_early(self) -> bool {
        matches!(self, Self::DescendingEarlyStop)
    }
}

impl std::fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AscendingAll => write!(f, "ascending"),
            Self::DescendingEarlyStop => write!(f, "descending"),
        }
    }
}

impl std::str::FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ascending" | "ascending-all" | "asc" => Ok(Self::AscendingAll),
            "descending" | "descending-early-stop" | "desc" => Ok(Self::DescendingEarlyStop),
            _ => Err(format!("Invalid policy: {s}. Use: ascending, descending")),
        }
    }
}

/// What to do with the remote after a commit is tagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PushPolicy {
    /// Do not push
    Skip,
    /// Push tag and branch; a rejection is an error
    #[default]
    Normal,
    /// Push tag and branch; on rejection, force-push over the remote history
    ForceOnReject,
}

impl std::fmt::Display for PushPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Normal => write!(f, "normal"),
            Self::ForceOnReject => write!(f, "force-on-reject"),
        }
    }
}

impl std::str::FromStr for PushPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" | "none" => Ok(Self::Skip),
            "normal" => Ok(Self::Normal),
            "force-on-reject" | "force" => Ok(Self::ForceOnReject),
            _ => Err(format!("Invalid push policy: {s}. Use: skip, normal, force-on-reject")),
        }
    }
}
