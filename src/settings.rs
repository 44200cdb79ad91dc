//! Run settings
//!
//! Settings are assembled once at startup from an optional TOML file
//! (`redcap2rs.toml` in the repository root, or `--settings FILE`) and the
//! command-line flags, which take precedence. The resulting [`Settings`] is
//! immutable for the rest of the run.
//!
//! ```toml
//! input_dir = "../postprod_datadictionaries"
//! config = "hbcd_redcap2rs.yaml"
//! remote = "origin"
//! policy = "ascending"
//! push = "normal"
//! min_revision = 101
//! tool = "reproschema"
//! label = "hbcd"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::models::{PushPolicy, Revision, SelectionPolicy};
use crate::error::{Error, Result};

/// Default settings filename, looked up in the repository root
pub const SETTINGS_FILE: &str = "redcap2rs.toml";

/// Default protocol config filename, relative to the repository root
pub const DEFAULT_CONFIG: &str = "redcap2rs.yaml";

/// Default input directory, relative to the repository root
pub const DEFAULT_INPUT_DIR: &str = "input_dir";

/// Default converter executable
pub const DEFAULT_TOOL: &str = "reproschema";

/// Default remote name
pub const DEFAULT_REMOTE: &str = "origin";

/// Settings as written in the TOML file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    /// Directory scanned for exports
    #[serde(default)]
    pub input_dir: Option<PathBuf>,
    /// Protocol config artifact
    #[serde(default)]
    pub config: Option<PathBuf>,
    /// Remote to push to
    #[serde(default)]
    pub remote: Option<String>,
    /// Selection order
    #[serde(default)]
    pub policy: Option<SelectionPolicy>,
    /// Push behavior
    #[serde(default)]
    pub push: Option<PushPolicy>,
    /// Revisions at or below this are never processed
    #[serde(default)]
    pub min_revision: Option<u64>,
    /// Converter executable
    #[serde(default)]
    pub tool: Option<String>,
    /// Study label used in commit messages
    #[serde(default)]
    pub label: Option<String>,
}

impl SettingsFile {
    /// Load from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ParseSettings {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Make relative paths relative to `base` (the settings file's directory)
    #[must_use]
    pub fn rebased(mut self, base: &Path) -> Self {
        self.input_dir = self.input_dir.map(|p| base.join(p));
        self.config = self.config.map(|p| base.join(p));
        self
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Repository root
    pub repo: Option<PathBuf>,
    /// Explicit settings file
    pub settings: Option<PathBuf>,
    /// Directory scanned for exports
    pub input_dir: Option<PathBuf>,
    /// Protocol config artifact
    pub config: Option<PathBuf>,
    /// Remote to push to
    pub remote: Option<String>,
    /// Selection order
    pub policy: Option<SelectionPolicy>,
    /// Disable pushing
    pub no_push: bool,
    /// Force-push when the remote rejects
    pub force_push: bool,
    /// Revision floor
    pub min_revision: Option<u64>,
    /// Converter executable
    pub tool: Option<String>,
    /// Study label
    pub label: Option<String>,
    /// Simulation mode
    pub dry_run: bool,
}

/// Resolved, immutable run settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Repository root (working tree)
    pub repo: PathBuf,
    /// Directory scanned for exports
    pub input_dir: PathBuf,
    /// Protocol config artifact
    pub config: PathBuf,
    /// Remote to push to
    pub remote: String,
    /// Selection order
    pub policy: SelectionPolicy,
    /// Push behavior
    pub push: PushPolicy,
    /// Revisions at or below this are never processed
    pub min_revision: Option<Revision>,
    /// Converter executable
    pub tool: String,
    /// Study label used in commit messages
    pub label: Option<String>,
    /// Log intended actions without mutating anything
    pub dry_run: bool,
}

impl Settings {
    /// Build settings from command-line overrides and the settings file
    ///
    /// The settings file is `--settings` if given, otherwise
    /// `<repo>/redcap2rs.toml` when it exists.
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        let repo = overrides.repo.clone().unwrap_or_else(|| PathBuf::from("."));

        let file = match &overrides.settings {
            Some(path) => Some(path.clone()),
            None => Some(repo.join(SETTINGS_FILE)).filter(|p| p.is_file()),
        };

        let file = match file {
            Some(path) => {
                log::debug!("Loading settings from {}", path.display());
                let base = path.parent().map_or_else(|| repo.clone(), Path::to_path_buf);
                SettingsFile::load(&path)?.rebased(&base)
            },
            None => SettingsFile::default(),
        };

        Ok(Self::merge(repo, file, overrides))
    }

    /// Combine file values and overrides; overrides win
    #[must_use]
    pub fn merge(repo: PathBuf, file: SettingsFile, overrides: Overrides) -> Self {
        let push = if overrides.no_push {
            PushPolicy::Skip
        } else if overrides.force_push {
            PushPolicy::ForceOnReject
        } else {
            file.push.unwrap_or_default()
        };

        Self {
            input_dir: overrides
                .input_dir
                .or(file.input_dir)
                .unwrap_or_else(|| repo.join(DEFAULT_INPUT_DIR)),
            config: overrides.config.or(file.config).unwrap_or_else(|| repo.join(DEFAULT_CONFIG)),
            remote: overrides.remote.or(file.remote).unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            policy: overrides.policy.or(file.policy).unwrap_or_default(),
            push,
            min_revision: overrides.min_revision.or(file.min_revision).map(Revision),
            tool: overrides.tool.or(file.tool).unwrap_or_else(|| DEFAULT_TOOL.to_string()),
            label: overrides.label.or(file.label),
            dry_run: overrides.dry_run,
            repo,
        }
    }
}
