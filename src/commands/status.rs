//! Status command - show current version and pending exports

use redcap2rs::adapters::GitVersionControl;
use redcap2rs::core::ports::VersionControl;
use redcap2rs::core::services::{effective_baseline, plan, scan_input_dir, select};
use redcap2rs::output::{OutputMode, PendingFile, StatusReport};
use redcap2rs::protocol::ProtocolConfig;
use redcap2rs::settings::{Overrides, Settings};
use redcap2rs::Error;

/// Show the baseline and the files a run would process
pub fn status(overrides: Overrides, output_mode: OutputMode) -> anyhow::Result<()> {
    let settings = Settings::resolve(overrides)?;
    let config = ProtocolConfig::load(&settings.config)?;

    let vcs = GitVersionControl::new(settings.repo.clone());
    let baseline = vcs.baseline(&config.protocol_name)?;
    let floor = effective_baseline(baseline.revision, settings.min_revision);

    if !settings.input_dir.is_dir() {
        return Err(Error::InputDirMissing(settings.input_dir).into());
    }
    let scan = scan_input_dir(&settings.input_dir)?;
    let pending = plan(select(scan.files, floor, settings.policy), floor, settings.policy);

    let report = StatusReport {
        protocol: config.protocol_name,
        baseline: baseline.revision,
        baseline_tag: baseline.tag,
        min_revision: settings.min_revision,
        policy: settings.policy.to_string(),
        pending: pending.iter().map(PendingFile::from).collect(),
        skipped: scan.skipped,
    };
    report.render(output_mode);
    Ok(())
}
