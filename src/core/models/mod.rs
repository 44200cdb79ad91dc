//! Domain models
//!
//! - [`Revision`] - `revid<N>` revision numbers
//! - [`InputFile`] - parsed data-dictionary export names
//! - [`SelectionPolicy`] / [`PushPolicy`] - run policies
//! - [`Baseline`] / [`CommitRequest`] - repository state and writes

mod commit;
mod input_file;
mod policy;
mod revision;

pub use commit::{ACTIVITIES_DIR, Baseline, CommitRequest, output_folders};
pub use input_file::{InputFile, ParseError};
pub use policy::{PushPolicy, SelectionPolicy};
pub use revision::{MARKER_PREFIX, Revision};
