//! Input data-dictionary files
//!
//! Exports follow the naming convention
//! `<protocol>_<date>_<time>_..._revid<N>_rev<M>.csv`. The date and time
//! segments name the resulting tag; `revid<N>` is the REDCap revision and
//! `rev<M>` a sequential export counter used as a tie-breaker.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::Revision;

/// Minimum number of `_`-delimited segments in a valid filename
const MIN_SEGMENTS: usize = 5;

/// Errors from parsing an input filename
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Filename has no `.csv` extension
    #[error("not a csv file: {0}")]
    NotCsv(String),

    /// Filename has too few `_`-delimited segments
    #[error("expected at least {} '_'-separated segments in {name}, found {found}", MIN_SEGMENTS)]
    TooFewSegments {
        /// The filename
        name: String,
        /// Number of segments found
        found: usize,
    },

    /// The `revid<N>` segment is missing or not an integer
    #[error("invalid revision segment '{segment}' in {name}")]
    BadRevision {
        /// The filename
        name: String,
        /// The offending segment
        segment: String,
    },

    /// The `rev<M>` segment is missing or not an integer
    #[error("invalid sequence segment '{segment}' in {name}")]
    BadSequence {
        /// The filename
        name: String,
        /// The offending segment
        segment: String,
    },
}

/// A data-dictionary export found in the input directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputFile {
    /// File name (no directory)
    pub name: String,
    /// Full path to the file
    pub path: PathBuf,
    /// Leading protocol segment
    pub protocol: String,
    /// Date segment (e.g. `2024-01-01`)
    pub date: String,
    /// Time segment (e.g. `1200`)
    pub time: String,
    /// REDCap revision from `revid<N>`
    pub revision: Revision,
    /// Export counter from `rev<M>`
    pub sequence: u64,
}

impl InputFile {
    /// Parse an input file from its path
    pub fn parse(path: &Path) -> Result<Self, ParseError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let stem = name.strip_suffix(".csv").ok_or_else(|| ParseError::NotCsv(name.clone()))?;
        let parts: Vec<&str> = stem.split('_').collect();
        let found = parts.len();
        if found < MIN_SEGMENTS {
            return Err(ParseError::TooFewSegments { name, found });
        }

        let revid = parts[parts.len() - 2];
        let revision = Revision::from_marker(revid).ok_or_else(|| ParseError::BadRevision {
            name: name.clone(),
            segment: revid.to_string(),
        })?;

        let rev = parts[parts.len() - 1];
        let sequence = rev
            .strip_prefix("rev")
            .and_then(|n| n.parse::<u64>().ok())
            .ok_or_else(|| ParseError::BadSequence {
                name: name.clone(),
                segment: rev.to_string(),
            })?;

        Ok(Self {
            protocol: parts[0].to_string(),
            date: parts[1].to_string(),
            time: parts[2].to_string(),
            revision,
            sequence,
            path: path.to_path_buf(),
            name,
        })
    }

    /// Date and time token, `<date>_<time>`
    #[must_use]
    pub fn date_time(&self) -> String {
        format!("{}_{}", self.date, self.time)
    }

    /// Tag name for this file, with `-` and `_` normalized to `.`
    ///
    /// e.g. `2024-01-01_1200` -> `2024.01.01.1200`
    #[must_use]
    pub fn tag_name(&self) -> String {
        self.date_time().replace(['-', '_'], ".")
    }

    /// Ordering key: revision first, export counter as tie-breaker
    #[must_use]
    pub const fn sort_key(&self) -> (Revision, u64) {
        (self.revision, self.sequence)
    }
}
