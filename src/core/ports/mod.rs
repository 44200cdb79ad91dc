//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the workflow and external
//! systems (git, the `reproschema` tool, the filesystem).
//!
//! Implementations live in the `adapters` module.

mod converter;
mod integrator;
mod vcs;

pub use converter::Converter;
pub use integrator::Integrator;
pub use vcs::VersionControl;
