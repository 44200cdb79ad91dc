//! Tests for the Output module
//!
//! Reports are rendered either as human-readable text or JSON; these tests
//! pin the JSON shape scripts rely on.

use std::path::Path;

use redcap2rs::core::models::{InputFile, Revision};
use redcap2rs::core::services::SkippedFile;
use redcap2rs::output::{OutputMode, PendingFile, ProcessedFile, RunReport, StatusReport};

fn input(name: &str) -> InputFile {
    InputFile::parse(Path::new(name)).unwrap()
}

#[test]
fn output_mode_default() {
    assert_eq!(OutputMode::default(), OutputMode::Human);
}

#[test]
fn simulated_file_is_not_committed() {
    let file = input("hbcd_2024-02-01_1300_data_revid10_rev2.csv");
    let processed = ProcessedFile::simulated(&file);

    assert_eq!(processed.revision, Revision(10));
    assert_eq!(processed.tag, "2024.02.01.1300");
    assert_eq!(processed.reverted, 0);
    assert!(!processed.committed);
}

#[test]
fn run_report_serialization() {
    let report = RunReport {
        protocol: "hbcd".to_string(),
        baseline: Revision(5),
        baseline_tag: Some("2024.01.01.1200".to_string()),
        dry_run: false,
        processed: vec![ProcessedFile {
            name: "hbcd_2024-02-01_1300_data_revid10_rev2.csv".to_string(),
            revision: Revision(10),
            tag: "2024.02.01.1300".to_string(),
            reverted: 3,
            committed: true,
        }],
        skipped: vec![],
        republished: None,
    };

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["protocol"], "hbcd");
    assert_eq!(json["baseline"], 5);
    assert_eq!(json["baseline_tag"], "2024.01.01.1200");
    assert_eq!(json["processed"][0]["revision"], 10);
    assert_eq!(json["processed"][0]["reverted"], 3);
    assert_eq!(json["processed"][0]["committed"], true);
}

#[test]
fn run_report_without_baseline_tag() {
    let report = RunReport {
        protocol: "hbcd".to_string(),
        baseline: Revision(0),
        baseline_tag: None,
        dry_run: true,
        processed: vec![],
        skipped: vec![SkippedFile {
            name: "notes.csv".to_string(),
            reason: "too few segments".to_string(),
        }],
        republished: Some("2024.01.01.1200".to_string()),
    };

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert!(json["baseline_tag"].is_null());
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["skipped"][0]["name"], "notes.csv");
    assert_eq!(json["republished"], "2024.01.01.1200");
}

#[test]
fn status_report_lists_pending_files() {
    let file = input("hbcd_2024-01-01_1200_data_revid5_rev1.csv");
    let report = StatusReport {
        protocol: "hbcd".to_string(),
        baseline: Revision(0),
        baseline_tag: None,
        min_revision: Some(Revision(3)),
        policy: "ascending".to_string(),
        pending: vec![PendingFile::from(&file)],
        skipped: vec![],
    };

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["min_revision"], 3);
    assert_eq!(json["pending"][0]["tag"], "2024.01.01.1200");
    assert_eq!(json["pending"][0]["revision"], 5);
}
