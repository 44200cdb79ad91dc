//! Input selection
//!
//! Lists exports in the input directory and picks the ones newer than the
//! baseline, in policy order.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::core::models::{InputFile, Revision, SelectionPolicy};

/// A `.csv` file whose name does not follow the convention
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    /// File name
    pub name: String,
    /// Why it was skipped
    pub reason: String,
}

/// Result of scanning the input directory
#[derive(Debug, Clone, Default)]
pub struct Scan {
    /// Parsed exports, in directory order
    pub files: Vec<InputFile>,
    /// Malformed `.csv` names
    pub skipped: Vec<SkippedFile>,
}

impl Scan {
    /// Number of `.csv` files seen, parsed or not
    #[must_use]
    pub fn csv_count(&self) -> usize {
        self.files.len() + self.skipped.len()
    }
}

/// List `*.csv` files in `dir` (non-recursive)
///
/// Malformed names are collected in [`Scan::skipped`] rather than failing the
/// scan, so one bad export cannot block the valid ones.
pub fn scan_input_dir(dir: &Path) -> std::io::Result<Scan> {
    let mut scan = Scan::default();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.ends_with(".csv") {
            continue;
        }
        match InputFile::parse(&entry.path()) {
            Ok(file) => scan.files.push(file),
            Err(e) => {
                log::warn!("Skipping {name}: {e}");
                scan.skipped.push(SkippedFile {
                    name,
                    reason: e.to_string(),
                });
            },
        }
    }
    Ok(scan)
}

/// Files with a revision above `baseline`, ordered by `policy`
#[must_use]
pub fn select(files: Vec<InputFile>, baseline: Revision, policy: SelectionPolicy) -> Vec<InputFile> {
    let mut selected: Vec<InputFile> = files.into_iter().filter(|f| f.revision > baseline).collect();
    selected.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()).then_with(|| a.name.cmp(&b.name)));
    if policy == SelectionPolicy::DescendingEarlyStop {
        selected.reverse();
    }
    selected
}

/// Files a run will actually process, in order
///
/// Under an early-stop policy the running baseline advances to each processed
/// revision and processing stops at the first file that does not exceed it.
#[must_use]
pub fn plan(selected: Vec<InputFile>, baseline: Revision, policy: SelectionPolicy) -> Vec<InputFile> {
    if !policy.stops_early() {
        return selected;
    }
    let mut current = baseline;
    let mut planned = Vec::new();
    for file in selected {
        if file.revision <= current {
            log::debug!("Stopping before {}: revision {} is not newer", file.name, file.revision);
            break;
        }
        current = file.revision;
        planned.push(file);
    }
    planned
}
