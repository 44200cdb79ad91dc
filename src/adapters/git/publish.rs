//! Commit, tag and push
//!
//! Writes go through the `git` CLI so hooks, signing configuration and
//! credential helpers behave exactly as they do for a developer.

use std::path::Path;
use std::process::{Command, Output};

use crate::core::models::{CommitRequest, PushPolicy};
use crate::error::{Error, Result};

/// Run a git command in `workdir`, failing on non-zero exit
fn git(workdir: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new("git").args(args).current_dir(workdir).output()?;
    if output.status.success() {
        Ok(output)
    } else {
        Err(Error::GitCommand {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Current branch name, `None` on a detached HEAD
pub fn current_branch(workdir: &Path) -> Result<Option<String>> {
    let output = git(workdir, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if branch.is_empty() || branch == "HEAD" {
        Ok(None)
    } else {
        Ok(Some(branch))
    }
}

/// Stage the requested directories
///
/// Directories that do not exist are skipped. `-A` stages deletions inside
/// them too.
pub fn stage(workdir: &Path, paths: &[String]) -> Result<()> {
    for path in paths {
        if workdir.join(path).exists() {
            git(workdir, &["add", "-A", "--", path.as_str()])?;
        } else {
            log::warn!("Not staging {path}: directory does not exist");
        }
    }
    Ok(())
}

/// Commit the index; a revision with no surviving changes still gets a commit
pub fn commit(workdir: &Path, message: &str) -> Result<()> {
    git(workdir, &["commit", "--allow-empty", "-m", message])?;
    Ok(())
}

/// Create an annotated tag at HEAD
pub fn tag(workdir: &Path, name: &str, message: &str) -> Result<()> {
    git(workdir, &["tag", "-a", name, "-m", message])?;
    Ok(())
}

/// Push the tag and the current branch according to `policy`
pub fn push(workdir: &Path, remote: &str, tag: &str, policy: PushPolicy) -> Result<()> {
    if policy == PushPolicy::Skip {
        log::debug!("Push disabled; leaving {tag} local");
        return Ok(());
    }

    let branch = current_branch(workdir)?.ok_or_else(|| Error::GitCommand {
        command: "push".to_string(),
        stderr: "HEAD is detached; cannot push branch".to_string(),
    })?;
    let tag_ref = format!("refs/tags/{tag}");
    let branch_ref = format!("HEAD:refs/heads/{branch}");

    let pushed = git(workdir, &["push", remote, tag_ref.as_str()])
        .and_then(|_| git(workdir, &["push", remote, branch_ref.as_str()]));

    match pushed {
        Ok(_) => {
            log::info!("Pushed {tag} and {branch} to {remote}");
            Ok(())
        },
        Err(Error::GitCommand { stderr, .. }) if policy == PushPolicy::ForceOnReject => {
            log::warn!("Push to {remote} rejected; force-pushing over remote history: {stderr}");
            git(workdir, &["push", "--force", remote, tag_ref.as_str(), branch_ref.as_str()])?;
            log::info!("Force-pushed {tag} and {branch} to {remote}");
            Ok(())
        },
        Err(Error::GitCommand { stderr, .. }) => Err(Error::PushRejected {
            remote: remote.to_string(),
            stderr,
        }),
        Err(e) => Err(e),
    }
}

/// Whether `remote` already has `refs/tags/<tag>`
pub fn remote_has_tag(workdir: &Path, remote: &str, tag: &str) -> Result<bool> {
    let tag_ref = format!("refs/tags/{tag}");
    let output = git(workdir, &["ls-remote", "--tags", remote, tag_ref.as_str()])?;
    Ok(!output.stdout.is_empty())
}

/// Push a tag left behind by an earlier run whose push failed
pub fn publish_pending(workdir: &Path, remote: &str, tag: &str, policy: PushPolicy) -> Result<bool> {
    if policy == PushPolicy::Skip || remote_has_tag(workdir, remote, tag)? {
        return Ok(false);
    }
    log::warn!("Tag {tag} is not on {remote}; pushing it now");
    push(workdir, remote, tag, policy)?;
    Ok(true)
}

/// Full commit sequence for one converted revision
pub fn commit_and_tag(workdir: &Path, request: &CommitRequest) -> Result<()> {
    stage(workdir, &request.paths)?;
    commit(workdir, &request.message)?;
    tag(workdir, &request.tag, &request.tag_message)?;
    push(workdir, &request.remote, &request.tag, request.push)
}
