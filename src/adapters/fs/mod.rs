//! Output integration on the local filesystem
//!
//! Each destination is replaced through a hidden staging directory created
//! next to it:
//!
//! 1. the converter output is renamed (or copied, across filesystems) into
//!    the staging directory
//! 2. the existing destination is renamed aside into the same staging directory
//! 3. the new content is renamed into place
//!
//! The destination is only absent between steps 2 and 3, and a failure in
//! step 3 renames the previous content back. The staging directory, holding
//! the previous content, is removed when it goes out of scope.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::ports::Integrator;
use crate::error::{Error, Result};

const STAGING_PREFIX: &str = ".redcap2rs-";

/// Replaces repository folders with converter output
#[derive(Debug, Clone)]
pub struct DirectoryIntegrator {
    root: PathBuf,
}

impl DirectoryIntegrator {
    /// Integrator writing into the repository rooted at `root`
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl Integrator for DirectoryIntegrator {
    fn integrate(&self, source_root: &Path, folders: &[String]) -> Result<()> {
        for folder in folders {
            let src = source_root.join(folder);
            let dest = self.root.join(folder);
            replace_dir(&src, &dest)?;
            log::info!("Moved {} to {}", src.display(), dest.display());
        }
        Ok(())
    }
}

/// Replace `dest` with `src`, consuming `src`
pub fn replace_dir(src: &Path, dest: &Path) -> Result<()> {
    if !src.is_dir() {
        return Err(Error::MissingOutput(src.to_path_buf()));
    }
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let staging = tempfile::Builder::new().prefix(STAGING_PREFIX).tempdir_in(parent)?;
    let incoming = staging.path().join("incoming");
    let previous = staging.path().join("previous");

    move_dir(src, &incoming)?;

    let had_previous = dest.exists();
    if had_previous {
        fs::rename(dest, &previous)?;
        log::debug!("Removed existing folder {}", dest.display());
    }

    if let Err(e) = fs::rename(&incoming, dest) {
        if had_previous && let Err(restore) = fs::rename(&previous, dest) {
            log::warn!("Could not restore {}: {restore}", dest.display());
        }
        return Err(e.into());
    }
    Ok(())
}

/// Rename `src` to `dest`, copying when they are on different filesystems
fn move_dir(src: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!("{} is on another filesystem; copying", src.display());
            copy_tree(src, dest)?;
            fs::remove_dir_all(src)
        },
        Err(e) => Err(e),
    }
}

/// Recursively copy a directory tree
fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src).map_err(io::Error::other)?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
