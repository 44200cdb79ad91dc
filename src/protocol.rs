//! Protocol config artifact
//!
//! The YAML file handed to `reproschema redcap2reproschema`. Only
//! `protocol_name` and `redcap_version` are interpreted here; every other key
//! is carried through rewrites untouched.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::models::Revision;
use crate::error::{Error, Result};

/// Protocol configuration read by the converter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Protocol name; also the output folder and schema file prefix
    pub protocol_name: String,
    /// Revision marker, `revid<N>`
    #[serde(default = "default_version")]
    pub redcap_version: String,
    /// Remaining conversion parameters
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

fn default_version() -> String {
    Revision::default().marker()
}

impl ProtocolConfig {
    /// Load from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| Error::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write back to a YAML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Revision currently recorded in `redcap_version`
    #[must_use]
    pub fn revision(&self) -> Option<Revision> {
        Revision::from_marker(&self.redcap_version)
    }

    /// Set `redcap_version` to `revid<N>`
    pub fn set_revision(&mut self, revision: Revision) {
        self.redcap_version = revision.marker();
    }
}
