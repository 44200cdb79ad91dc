//! Common test utilities shared across test types
//!
//! - `fixtures.rs` - Exports, configs and the stub `reproschema` tool
//! - `git_repo.rs` - Temporary git repository helper
