//! redcap2rs - Convert versioned REDCap data dictionaries to ReproSchema
//!
//! This library finds data-dictionary exports newer than the last tagged
//! conversion, runs the `reproschema` converter on each, moves the output
//! into the repository, discards version-only churn, and records every
//! revision as a tagged commit.

// Deny all clippy warnings in this crate
#![deny(clippy::all, clippy::pedantic, clippy::nursery, missing_docs, unsafe_code)]
#![warn(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod core;
pub mod error;
pub mod output;
pub mod protocol;
pub mod settings;

pub use error::{Error, Result};
