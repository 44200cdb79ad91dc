//! Conversion tool port

use std::path::Path;

use crate::error::Result;

/// External REDCap to ReproSchema converter
///
/// Both steps must succeed before anything in the repository is touched.
pub trait Converter {
    /// Convert `csv` using the protocol config at `config`, writing under `output_dir`
    fn convert(&self, csv: &Path, config: &Path, output_dir: &Path) -> Result<()>;

    /// Validate a generated schema directory
    fn validate(&self, dir: &Path) -> Result<()>;
}
