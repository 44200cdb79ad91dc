//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use serde::Serialize;

use crate::core::models::{InputFile, Revision};
use crate::core::services::SkippedFile;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Result of a conversion run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Protocol name from the config artifact
    pub protocol: String,
    /// Revision already committed and tagged before the run
    pub baseline: Revision,
    /// Tag carrying the baseline
    pub baseline_tag: Option<String>,
    /// Whether this was a simulation
    pub dry_run: bool,
    /// Files processed (or that would be, in a dry run), in order
    pub processed: Vec<ProcessedFile>,
    /// Malformed input names that were ignored
    pub skipped: Vec<SkippedFile>,
    /// Baseline tag pushed because an earlier run left it local
    pub republished: Option<String>,
}

/// One processed input file
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedFile {
    /// Input file name
    pub name: String,
    /// Its revision
    pub revision: Revision,
    /// Tag created (or that would be created)
    pub tag: String,
    /// Number of version-only changes discarded
    pub reverted: usize,
    /// Whether a commit was recorded
    pub committed: bool,
}

impl ProcessedFile {
    /// Entry for a file that was only simulated
    #[must_use]
    pub fn simulated(file: &InputFile) -> Self {
        Self {
            name: file.name.clone(),
            revision: file.revision,
            tag: file.tag_name(),
            reverted: 0,
            committed: false,
        }
    }
}

/// Read-only view of what a run would do
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Protocol name from the config artifact
    pub protocol: String,
    /// Revision already committed and tagged
    pub baseline: Revision,
    /// Tag carrying the baseline
    pub baseline_tag: Option<String>,
    /// Revision floor from settings
    pub min_revision: Option<Revision>,
    /// Selection policy in effect
    pub policy: String,
    /// Files a run would consider, in processing order
    pub pending: Vec<PendingFile>,
    /// Malformed input names
    pub skipped: Vec<SkippedFile>,
}

/// A file waiting to be converted
#[derive(Debug, Clone, Serialize)]
pub struct PendingFile {
    /// Input file name
    pub name: String,
    /// Its revision
    pub revision: Revision,
    /// Tag it would receive
    pub tag: String,
}

impl From<&InputFile> for PendingFile {
    fn from(file: &InputFile) -> Self {
        Self {
            name: file.name.clone(),
            revision: file.revision,
            tag: file.tag_name(),
        }
    }
}

impl RunReport {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        for s in &self.skipped {
            println!("Skipped {}: {}", s.name, s.reason);
        }
        if let Some(tag) = &self.republished {
            println!("Pushed previously unpublished tag {tag}");
        }

        if self.processed.is_empty() {
            println!("No newer versions found. Current version is {}.", self.baseline);
            return;
        }

        for p in &self.processed {
            if self.dry_run {
                println!("Would process version {} ({}) and tag {}", p.revision, p.name, p.tag);
            } else {
                println!("Converted version {} ({})", p.revision, p.name);
                if p.reverted > 0 {
                    println!("  Discarded {} version-only change(s)", p.reverted);
                }
                println!("  Git tagged {}", p.tag);
            }
        }

        if self.dry_run {
            println!("\nDry run: nothing was changed.");
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

impl StatusReport {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        println!("Protocol: {}", self.protocol);
        match &self.baseline_tag {
            Some(tag) => println!("Current version: {} (tag {tag})", self.baseline),
            None => println!("Current version: {} (no tags)", self.baseline),
        }
        if let Some(floor) = self.min_revision {
            println!("Minimum revision: {floor}");
        }
        println!("Policy: {}", self.policy);
        println!();

        if self.pending.is_empty() {
            println!("No newer versions found.");
        } else {
            println!("Pending ({}):", self.pending.len());
            for p in &self.pending {
                println!("  revid{}  {}  -> {}", p.revision, p.name, p.tag);
            }
        }

        for s in &self.skipped {
            println!("Skipped {}: {}", s.name, s.reason);
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}
