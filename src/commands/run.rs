//! Run command - convert and tag every new export

use redcap2rs::adapters::{DirectoryIntegrator, GitVersionControl, ReproschemaCli};
use redcap2rs::core::services::Workflow;
use redcap2rs::output::OutputMode;
use redcap2rs::settings::{Overrides, Settings};

/// Convert, commit and tag all exports newer than the current version
pub fn run(overrides: Overrides, output_mode: OutputMode) -> anyhow::Result<()> {
    let settings = Settings::resolve(overrides)?;
    log::debug!("Settings: {settings:?}");
    if settings.dry_run {
        log::info!("Dry-run mode: no files, refs or remotes will be changed");
    }

    let vcs = GitVersionControl::new(settings.repo.clone());
    let converter = ReproschemaCli::new(settings.tool.clone());
    let integrator = DirectoryIntegrator::new(settings.repo.clone());

    let mut workflow = Workflow::new(&settings, &vcs, &converter, &integrator);
    let report = workflow.run()?;
    report.render(output_mode);
    Ok(())
}
