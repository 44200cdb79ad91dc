//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `git/` - Tag history, working-tree status, commit/tag/push
//! - `fs/` - Directory replacement in the working tree
//! - `reproschema/` - The external converter

pub mod fs;
pub mod git;
pub mod reproschema;

pub use fs::DirectoryIntegrator;
pub use git::GitVersionControl;
pub use reproschema::ReproschemaCli;
