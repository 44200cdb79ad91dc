//! Tests for the conversion workflow against mock ports

use redcap2rs::core::models::{PushPolicy, Revision, SelectionPolicy};
use redcap2rs::core::services::{Workflow, WorkflowState};
use redcap2rs::error::{Error, ToolStep};
use redcap2rs::settings::Overrides;

use super::common::{MockConverter, MockIntegrator, MockVersionControl, Workspace};

const REVID5: &str = "proto_2024-01-01_1200_data_revid5_rev1.csv";
const REVID10: &str = "proto_2024-02-01_1300_data_revid10_rev2.csv";
const REVID7: &str = "proto_2024-01-15_0900_data_revid7_rev2.csv";

fn revisions(report: &redcap2rs::output::RunReport) -> Vec<u64> {
    report.processed.iter().map(|p| p.revision.get()).collect()
}

// =============================================================================
// SELECTION AND ORDER
// =============================================================================

#[test]
fn processes_new_files_oldest_first() {
    let ws = Workspace::new();
    ws.add_export(REVID10).add_export(REVID5);
    let settings = ws.settings(Overrides::default());
    let vcs = MockVersionControl::new();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    let mut workflow = Workflow::new(&settings, &vcs, &converter, &integrator);
    let report = workflow.run().unwrap();

    assert_eq!(revisions(&report), vec![5, 10]);
    assert_eq!(vcs.tags(), vec!["2024.01.01.1200", "2024.02.01.1300"]);
    assert_eq!(workflow.state(), WorkflowState::Idle);
    assert!(report.processed.iter().all(|p| p.committed));
}

#[test]
fn every_file_above_baseline_is_selected() {
    let ws = Workspace::new();
    ws.add_export(REVID5).add_export(REVID7).add_export(REVID10);
    let settings = ws.settings(Overrides::default());
    let vcs = MockVersionControl::with_baseline(6);
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    let report = Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap();

    assert_eq!(revisions(&report), vec![7, 10]);
    assert_eq!(report.baseline, Revision(6));
}

#[test]
fn nothing_newer_than_baseline() {
    let ws = Workspace::new();
    ws.add_export(REVID5).add_export(REVID10);
    let settings = ws.settings(Overrides::default());
    let vcs = MockVersionControl::with_baseline(10);
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    let mut workflow = Workflow::new(&settings, &vcs, &converter, &integrator);
    let report = workflow.run().unwrap();

    assert!(report.processed.is_empty());
    assert_eq!(report.baseline_tag.as_deref(), Some("tag-10"));
    assert!(converter.calls.borrow().is_empty());
    assert!(vcs.commits.borrow().is_empty());
    assert_eq!(workflow.state(), WorkflowState::Idle);
}

#[test]
fn descending_processes_only_the_newest() {
    let ws = Workspace::new();
    ws.add_export(REVID5).add_export(REVID7).add_export(REVID10);
    let settings = ws.settings(Overrides {
        policy: Some(SelectionPolicy::DescendingEarlyStop),
        ..Overrides::default()
    });
    let vcs = MockVersionControl::new();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    let report = Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap();

    assert_eq!(revisions(&report), vec![10]);
    assert_eq!(vcs.tags(), vec!["2024.02.01.1300"]);
}

#[test]
fn min_revision_raises_the_floor() {
    let ws = Workspace::new();
    ws.add_export(REVID5).add_export(REVID7).add_export(REVID10);
    let settings = ws.settings(Overrides {
        min_revision: Some(7),
        ..Overrides::default()
    });
    let vcs = MockVersionControl::new();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    let report = Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap();

    assert_eq!(revisions(&report), vec![10]);
}

#[test]
fn malformed_names_are_skipped() {
    let ws = Workspace::new();
    ws.add_export("broken.csv").add_export(REVID5).add_export("notes.txt");
    let settings = ws.settings(Overrides::default());
    let vcs = MockVersionControl::new();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    let report = Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap();

    assert_eq!(revisions(&report), vec![5]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "broken.csv");
}

// =============================================================================
// PROCESSING STEPS
// =============================================================================

#[test]
fn config_records_last_processed_revision() {
    let ws = Workspace::new();
    ws.add_export(REVID5).add_export(REVID10);
    let settings = ws.settings(Overrides::default());
    let vcs = MockVersionControl::new();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap();

    let config = ws.config_content();
    assert!(config.contains("redcap_version: revid10"));
    assert!(config.contains("user_name: tester"));
}

#[test]
fn convert_then_validate_then_integrate() {
    let ws = Workspace::new();
    ws.add_export(REVID5);
    let settings = ws.settings(Overrides {
        label: Some("hbcd".to_string()),
        no_push: true,
        ..Overrides::default()
    });
    let vcs = MockVersionControl::new();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap();

    let output_root = std::fs::canonicalize(ws.input_dir()).unwrap();
    let calls = converter.calls.borrow();
    assert_eq!(calls[0], format!("convert {REVID5}"));
    assert_eq!(calls[1], format!("validate {}", output_root.join("proto").display()));

    let integrations = integrator.calls.borrow();
    assert_eq!(integrations.len(), 1);
    assert_eq!(integrations[0].0, output_root.join("proto"));
    assert_eq!(integrations[0].1, vec!["proto".to_string(), "activities".to_string()]);

    let commits = vcs.commits.borrow();
    assert_eq!(commits[0].message, "converted hbcd redcap data dictionary 2024-01-01_1200 to reproschema");
    assert_eq!(commits[0].push, PushPolicy::Skip);
    assert_eq!(commits[0].remote, "origin");
}

#[test]
fn version_only_changes_are_reverted_before_commit() {
    let ws = Workspace::new();
    ws.add_export(REVID10);
    ws.write("activities/intro/intro.json", r#"{"@id": "intro", "version": "revid10"}"#);
    ws.write("activities/consent/consent.json", r#"{"@id": "consent", "version": "revid10", "new": 1}"#);
    let settings = ws.settings(Overrides::default());
    let vcs = MockVersionControl::with_baseline(5)
        .with_modified("activities/intro/intro.json", r#"{"@id": "intro", "version": "revid5"}"#)
        .with_modified("activities/consent/consent.json", r#"{"@id": "consent", "version": "revid5"}"#)
        .with_modified("proto/proto_schema", r#"{"version": "revid5"}"#);
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    let report = Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap();

    assert_eq!(*vcs.reverted.borrow(), vec!["activities/intro/intro.json".to_string()]);
    assert_eq!(report.processed[0].reverted, 1);
    assert_eq!(vcs.commits.borrow().len(), 1);
}

#[test]
fn unparseable_json_is_left_modified() {
    let ws = Workspace::new();
    ws.add_export(REVID10);
    ws.write("activities/intro/intro.json", "{ truncated");
    let settings = ws.settings(Overrides::default());
    let vcs = MockVersionControl::with_baseline(5)
        .with_modified("activities/intro/intro.json", r#"{"version": "revid5"}"#);
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap();

    assert!(vcs.reverted.borrow().is_empty());
    assert_eq!(vcs.commits.borrow().len(), 1);
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn validation_failure_aborts_without_commit() {
    let ws = Workspace::new();
    ws.add_export(REVID5).add_export(REVID10);
    let settings = ws.settings(Overrides::default());
    let vcs = MockVersionControl::new();
    let converter = MockConverter::failing(ToolStep::Validate);
    let integrator = MockIntegrator::new();

    let mut workflow = Workflow::new(&settings, &vcs, &converter, &integrator);
    let err = workflow.run().unwrap_err();

    assert!(matches!(err, Error::Tool { step: ToolStep::Validate, .. }));
    assert_eq!(workflow.state(), WorkflowState::Aborted);
    assert!(integrator.calls.borrow().is_empty());
    assert!(vcs.commits.borrow().is_empty());
    // the second file is never attempted
    assert_eq!(converter.calls.borrow().len(), 2);
}

#[test]
fn failure_on_later_file_keeps_earlier_commits() {
    let ws = Workspace::new();
    ws.add_export(REVID5).add_export(REVID10);
    let settings = ws.settings(Overrides::default());
    let vcs = MockVersionControl::new();
    let converter = MockConverter::failing_on(ToolStep::Convert, REVID10);
    let integrator = MockIntegrator::new();

    let err = Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap_err();

    assert!(matches!(err, Error::Tool { step: ToolStep::Convert, .. }));
    assert_eq!(vcs.tags(), vec!["2024.01.01.1200"]);
}

#[test]
fn missing_input_dir_is_an_error() {
    let ws = Workspace::new();
    let settings = ws.settings(Overrides {
        input_dir: Some(ws.root().join("nope")),
        ..Overrides::default()
    });
    let vcs = MockVersionControl::new();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    let mut workflow = Workflow::new(&settings, &vcs, &converter, &integrator);
    assert!(matches!(workflow.run(), Err(Error::InputDirMissing(_))));
    assert_eq!(workflow.state(), WorkflowState::Aborted);
}

#[test]
fn empty_input_dir_is_an_error() {
    let ws = Workspace::new();
    ws.write("input/readme.txt", "not an export");
    let settings = ws.settings(Overrides::default());
    let vcs = MockVersionControl::new();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    let result = Workflow::new(&settings, &vcs, &converter, &integrator).run();
    assert!(matches!(result, Err(Error::NoInputFiles(_))));
}

#[test]
fn missing_config_is_an_error() {
    let ws = Workspace::new();
    ws.add_export(REVID5);
    let settings = ws.settings(Overrides {
        config: Some(ws.root().join("absent.yaml")),
        ..Overrides::default()
    });
    let vcs = MockVersionControl::new();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    let result = Workflow::new(&settings, &vcs, &converter, &integrator).run();
    assert!(matches!(result, Err(Error::ReadConfig { .. })));
}

// =============================================================================
// DRY RUN
// =============================================================================

#[test]
fn dry_run_changes_nothing() {
    let ws = Workspace::new();
    ws.add_export(REVID5).add_export(REVID10);
    let config_before = ws.config_content();
    let settings = ws.settings(Overrides {
        dry_run: true,
        ..Overrides::default()
    });
    let vcs = MockVersionControl::new();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    let report = Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap();

    assert!(report.dry_run);
    assert_eq!(revisions(&report), vec![5, 10]);
    assert!(report.processed.iter().all(|p| !p.committed));
    assert_eq!(report.processed[1].tag, "2024.02.01.1300");
    assert!(converter.calls.borrow().is_empty());
    assert!(integrator.calls.borrow().is_empty());
    assert!(vcs.commits.borrow().is_empty());
    assert!(vcs.reverted.borrow().is_empty());
    assert_eq!(ws.config_content(), config_before);
}

// =============================================================================
// RECOVERY FROM EARLIER RUNS
// =============================================================================

#[test]
fn stale_converter_output_is_cleared_before_conversion() {
    let ws = Workspace::new();
    ws.add_export(REVID10);
    ws.write("input/proto/activities/left_over/left_over.json", r#"{"version": "revid5"}"#);
    let settings = ws.settings(Overrides::default());
    let vcs = MockVersionControl::new();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap();

    assert!(!ws.input_dir().join("proto/activities/left_over").exists());
    assert_eq!(vcs.commits.borrow().len(), 1);
}

#[test]
fn dry_run_keeps_stale_converter_output() {
    let ws = Workspace::new();
    ws.add_export(REVID10);
    ws.write("input/proto/activities/left_over/left_over.json", "{}");
    let settings = ws.settings(Overrides {
        dry_run: true,
        ..Overrides::default()
    });
    let vcs = MockVersionControl::new();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap();

    assert!(ws.input_dir().join("proto/activities/left_over/left_over.json").exists());
}

#[test]
fn clashing_tag_stops_before_any_change() {
    let ws = Workspace::new();
    ws.add_export(REVID5).add_export("proto_2024-01-01_1200_data_revid6_rev2.csv");
    let settings = ws.settings(Overrides::default());
    let vcs = MockVersionControl::new();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    let err = Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap_err();

    assert!(matches!(err, Error::TagExists { ref tag, .. } if tag == "2024.01.01.1200"));
    assert_eq!(vcs.commits.borrow().len(), 1);
    assert_eq!(converter.calls.borrow().len(), 2);
    assert!(ws.config_content().contains("redcap_version: revid5"));
}

#[test]
fn unpushed_baseline_tag_is_pushed() {
    let ws = Workspace::new();
    ws.add_export(REVID5).add_export(REVID10);
    let settings = ws.settings(Overrides::default());
    let vcs = MockVersionControl::with_baseline(10).with_baseline_unpushed();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    let report = Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap();

    assert!(report.processed.is_empty());
    assert_eq!(report.republished.as_deref(), Some("tag-10"));
    assert_eq!(*vcs.published.borrow(), vec!["tag-10".to_string()]);
}

#[test]
fn unpushed_baseline_tag_stays_local_without_push() {
    let ws = Workspace::new();
    ws.add_export(REVID10);
    let vcs = MockVersionControl::with_baseline(10).with_baseline_unpushed();
    let converter = MockConverter::new();
    let integrator = MockIntegrator::new();

    for overrides in [
        Overrides {
            no_push: true,
            ..Overrides::default()
        },
        Overrides {
            dry_run: true,
            ..Overrides::default()
        },
    ] {
        let settings = ws.settings(overrides);
        let report = Workflow::new(&settings, &vcs, &converter, &integrator).run().unwrap();
        assert!(report.republished.is_none());
    }
    assert!(vcs.published.borrow().is_empty());
}
