//! Output integration port

use std::path::Path;

use crate::error::Result;

/// Moves converter output into the repository working tree
pub trait Integrator {
    /// Replace each `folder` in the repository with `source_root/folder`
    ///
    /// Existing destinations are replaced, never merged.
    fn integrate(&self, source_root: &Path, folders: &[String]) -> Result<()>;
}
