//! `reproschema` command-line adapter
//!
//! Runs `reproschema redcap2reproschema <csv> <yaml> --output-path <dir>`
//! followed by `reproschema validate <dir>`. Tool output is passed straight
//! through to the terminal.

use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::core::ports::Converter;
use crate::error::{Error, Result, ToolStep};

/// Converter backed by the `reproschema` executable
#[derive(Debug, Clone)]
pub struct ReproschemaCli {
    program: String,
}

impl ReproschemaCli {
    /// Use `program` (name on `PATH` or full path) as the executable
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn status(&self, command: &mut Command) -> Result<ExitStatus> {
        log::debug!("Running {command:?}");
        command.status().map_err(|source| Error::Spawn {
            program: self.program.clone(),
            source,
        })
    }
}

impl Converter for ReproschemaCli {
    fn convert(&self, csv: &Path, config: &Path, output_dir: &Path) -> Result<()> {
        let mut command = Command::new(&self.program);
        command
            .arg("redcap2reproschema")
            .arg(csv)
            .arg(config)
            .arg("--output-path")
            .arg(output_dir);

        let status = self.status(&mut command)?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::Tool {
                step: ToolStep::Convert,
                target: csv.to_path_buf(),
                code: status.code(),
            })
        }
    }

    fn validate(&self, dir: &Path) -> Result<()> {
        let mut command = Command::new(&self.program);
        command.arg("validate").arg(dir);

        let status = self.status(&mut command)?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::Tool {
                step: ToolStep::Validate,
                target: dir.to_path_buf(),
                code: status.code(),
            })
        }
    }
}
