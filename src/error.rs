//! Error types for the conversion workflow

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// External tool step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStep {
    /// `redcap2reproschema` conversion
    Convert,
    /// `validate` of the generated schema
    Validate,
}

impl std::fmt::Display for ToolStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Convert => write!(f, "conversion"),
            Self::Validate => write!(f, "validation"),
        }
    }
}

/// Errors that can abort a run
#[derive(Debug, Error)]
pub enum Error {
    /// The input directory does not exist
    #[error("Input directory not found: {}", .0.display())]
    InputDirMissing(PathBuf),

    /// The input directory contains no CSV files
    #[error("No CSV files found in input directory {}", .0.display())]
    NoInputFiles(PathBuf),

    /// The protocol config artifact could not be read
    #[error("failed to read config {}: {source}", .path.display())]
    ReadConfig {
        /// Config path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The protocol config artifact is not valid YAML or lacks required keys
    #[error("failed to parse config {}: {source}", .path.display())]
    ParseConfig {
        /// Config path
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// The settings file is not valid TOML
    #[error("failed to parse settings {}: {source}", .path.display())]
    ParseSettings {
        /// Settings path
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// The tag for an input file already exists
    #[error("tag {tag} already exists; cannot record {file}")]
    TagExists {
        /// Tag name derived from the file's date and time
        tag: String,
        /// Input file that maps to the tag
        file: String,
    },

    /// The external tool could not be started
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        /// Program name
        program: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The external tool exited with a non-zero status
    #[error("reproschema {step} failed for {} (exit code {})", .target.display(), .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    Tool {
        /// Which step failed
        step: ToolStep,
        /// File or directory the step ran on
        target: PathBuf,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
    },

    /// The converter did not produce an expected output folder
    #[error("converter output missing: {}", .0.display())]
    MissingOutput(PathBuf),

    /// A git CLI write operation failed
    #[error("git {command} failed: {stderr}")]
    GitCommand {
        /// The git subcommand line
        command: String,
        /// Captured standard error
        stderr: String,
    },

    /// The remote rejected a push and forced push is not enabled
    #[error("push to {remote} rejected (use --force-push to overwrite): {stderr}")]
    PushRejected {
        /// Remote name
        remote: String,
        /// Captured standard error
        stderr: String,
    },

    /// libgit2 error
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// YAML serialization error
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
