//! Core domain logic for redcap2rs
//!
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Revision, InputFile, policies, commit requests)
//! - `services/` - Selection, reconciliation and the workflow state machine
//! - `ports/` - Trait definitions for git, the converter and the filesystem

pub mod models;
pub mod ports;
pub mod services;
