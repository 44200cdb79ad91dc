//! Conversion workflow
//!
//! Orchestrates one run:
//!
//! ```text
//! Idle -> BaselineRead -> Selecting -> [ProcessingOne]* -> Idle
//!                                            |
//!                                            +-> Aborted (any step fails)
//! ```
//!
//! Each selected file is fully processed (config update, convert, validate,
//! integrate, reconcile, commit, tag, push) before the next one starts. A
//! failure stops the run; files committed earlier in the run stay committed
//! and the next run re-reads the baseline. A baseline tag that never reached
//! the remote is pushed at the start of the next run.

use std::fs;

use crate::core::models::{CommitRequest, InputFile, Revision};
use crate::core::ports::{Converter, Integrator, VersionControl};
use crate::core::services::{plan, reconcile, scan_input_dir, select};
use crate::error::{Error, Result};
use crate::output::{ProcessedFile, RunReport};
use crate::protocol::ProtocolConfig;
use crate::settings::Settings;

/// Workflow states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    /// Not running, or finished normally
    #[default]
    Idle,
    /// Reading the baseline from tag history
    BaselineRead,
    /// Listing and ordering input files
    Selecting,
    /// Converting and recording one file
    ProcessingOne,
    /// Stopped after a failure
    Aborted,
}

/// Baseline after applying the configured revision floor
#[must_use]
pub fn effective_baseline(baseline: Revision, min_revision: Option<Revision>) -> Revision {
    min_revision.map_or(baseline, |floor| baseline.max(floor))
}

/// One conversion run over the input directory
pub struct Workflow<'a> {
    settings: &'a Settings,
    vcs: &'a dyn VersionControl,
    converter: &'a dyn Converter,
    integrator: &'a dyn Integrator,
    state: WorkflowState,
}

impl std::fmt::Debug for Workflow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a> Workflow<'a> {
    /// Create a workflow over the given settings and adapters
    #[must_use]
    pub fn new(
        settings: &'a Settings,
        vcs: &'a dyn VersionControl,
        converter: &'a dyn Converter,
        integrator: &'a dyn Integrator,
    ) -> Self {
        Self {
            settings,
            vcs,
            converter,
            integrator,
            state: WorkflowState::Idle,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> WorkflowState {
        self.state
    }

    /// Run to completion
    ///
    /// Returns the report of processed files, or the error that aborted the run.
    pub fn run(&mut self) -> Result<RunReport> {
        match self.execute() {
            Ok(report) => {
                self.transition(WorkflowState::Idle);
                Ok(report)
            },
            Err(e) => {
                self.transition(WorkflowState::Aborted);
                Err(e)
            },
        }
    }

    fn transition(&mut self, next: WorkflowState) {
        log::debug!("workflow: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn execute(&mut self) -> Result<RunReport> {
        let settings = self.settings;

        if !settings.input_dir.is_dir() {
            return Err(Error::InputDirMissing(settings.input_dir.clone()));
        }
        let mut config = ProtocolConfig::load(&settings.config)?;

        self.transition(WorkflowState::BaselineRead);
        let baseline = self.vcs.baseline(&config.protocol_name)?;
        let floor = effective_baseline(baseline.revision, settings.min_revision);
        match &baseline.tag {
            Some(tag) => log::info!("Current version is {} (tag {tag})", baseline.revision),
            None => log::info!("No tagged version found; current version is {}", baseline.revision),
        }
        if floor > baseline.revision {
            log::info!("Ignoring revisions at or below {floor}");
        }
        let republished = self.publish_baseline(baseline.tag.as_deref())?;

        self.transition(WorkflowState::Selecting);
        let scan = scan_input_dir(&settings.input_dir)?;
        if scan.csv_count() == 0 {
            return Err(Error::NoInputFiles(settings.input_dir.clone()));
        }
        let selected = plan(select(scan.files, floor, settings.policy), floor, settings.policy);

        let mut report = RunReport {
            protocol: config.protocol_name.clone(),
            baseline: baseline.revision,
            baseline_tag: baseline.tag,
            dry_run: settings.dry_run,
            processed: Vec::new(),
            skipped: scan.skipped,
            republished,
        };

        if selected.is_empty() {
            log::info!("No newer versions found. Current version is {}.", baseline.revision);
            return Ok(report);
        }

        for file in selected {
            self.transition(WorkflowState::ProcessingOne);
            let processed = self.process_one(&file, &mut config)?;
            report.processed.push(processed);
        }

        Ok(report)
    }

    /// Push the baseline tag if an earlier run created it but failed to push
    fn publish_baseline(&self, tag: Option<&str>) -> Result<Option<String>> {
        let settings = self.settings;
        let Some(tag) = tag else {
            return Ok(None);
        };
        if settings.dry_run {
            log::info!("Dry-run: would push {tag} to {} if it is missing there", settings.remote);
            return Ok(None);
        }
        let pushed = self.vcs.publish_pending(tag, &settings.remote, settings.push)?;
        Ok(pushed.then(|| tag.to_string()))
    }

    fn process_one(&self, file: &InputFile, config: &mut ProtocolConfig) -> Result<ProcessedFile> {
        let settings = self.settings;
        log::info!("Processing version {} (file: {})...", file.revision, file.name);

        let request = CommitRequest::for_file(
            file,
            &config.protocol_name,
            settings.label.as_deref(),
            &settings.remote,
            settings.push,
        );
        if self.vcs.tag_exists(&request.tag)? {
            return Err(Error::TagExists {
                tag: request.tag,
                file: file.name.clone(),
            });
        }
        let output_root = fs::canonicalize(&settings.input_dir)?;
        let output_folder = output_root.join(&config.protocol_name);

        if settings.dry_run {
            log::info!(
                "Dry-run: would set redcap_version: {} in {}",
                file.revision.marker(),
                settings.config.display()
            );
            log::info!(
                "Dry-run: would convert {} into {}",
                file.path.display(),
                output_root.display()
            );
            log::info!("Dry-run: would validate {}", output_folder.display());
            log::info!(
                "Dry-run: would move {} into {}",
                request.paths.join(", "),
                settings.repo.display()
            );
            log::info!("Dry-run: would commit \"{}\" and tag {}", request.message, request.tag);
            return Ok(ProcessedFile::simulated(file));
        }

        if output_folder.exists() {
            log::info!("Removing stale converter output {}", output_folder.display());
            fs::remove_dir_all(&output_folder)?;
        }

        config.set_revision(file.revision);
        config.save(&settings.config)?;
        log::debug!("Set redcap_version to {}", config.redcap_version);

        self.converter.convert(&file.path, &settings.config, &output_root)?;
        self.converter.validate(&output_folder)?;

        self.integrator.integrate(&output_folder, &request.paths)?;
        let summary = reconcile(self.vcs, &settings.repo)?;

        self.vcs.commit_and_tag(&request)?;
        log::info!("Git tagged {}", request.tag);

        Ok(ProcessedFile {
            name: file.name.clone(),
            revision: file.revision,
            tag: request.tag,
            reverted: summary.reverted.len(),
            committed: true,
        })
    }
}
