//! REDCap revision numbers
//!
//! A revision is the integer carried by a `revid<N>` marker. It appears in
//! input filenames, in the protocol config (`redcap_version`) and in the
//! `version` field of generated schema files.

use serde::{Deserialize, Serialize};

/// Prefix of a revision marker
pub const MARKER_PREFIX: &str = "revid";

/// A REDCap revision number, the ordering key for input freshness
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Revision(pub u64);

impl Revision {
    /// Parse a `revid<N>` marker
    ///
    /// Returns `None` if the prefix is missing or the suffix is not an integer.
    #[must_use]
    pub fn from_marker(marker: &str) -> Option<Self> {
        marker.trim().strip_prefix(MARKER_PREFIX)?.parse().ok().map(Self)
    }

    /// Render as a `revid<N>` marker
    #[must_use]
    pub fn marker(self) -> String {
        format!("{MARKER_PREFIX}{}", self.0)
    }

    /// The raw number
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Revision {
    fn from(n: u64) -> Self {
        Self(n)
    }
}
