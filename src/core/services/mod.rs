//! Workflow services
//!
//! - [`selection`] - list and order input files
//! - [`reconcile`] - discard version-only changes
//! - [`workflow`] - run the conversion state machine

pub mod reconcile;
pub mod selection;
pub mod workflow;

pub use reconcile::{ChangeKind, ReconcileSummary, classify, reconcile};
pub use selection::{Scan, SkippedFile, plan, scan_input_dir, select};
pub use workflow::{Workflow, WorkflowState, effective_baseline};
