//! Source-control checkouts
//!
//! Each supported [`RepoType`] maps to its command-line client. A target that
//! already holds a checkout of the same flavour is updated in place, following
//! the configured URL; anything else is replaced by a fresh clone.

use std::fs;
use std::path::{Path, PathBuf};

use git2::Repository;

use crate::common::fs::replace_dir_keeping;
use crate::config::RepoType;
use crate::error::{self, Result};
use crate::system::{CommandSpec, System};

/// Metadata directory that marks a checkout of the given flavour
fn checkout_marker(repo_type: RepoType) -> &'static str {
    match repo_type {
        RepoType::Git => ".git",
        RepoType::Mercurial => ".hg",
        RepoType::Subversion => ".svn",
    }
}

/// Whether `target` already holds a checkout of this flavour
pub fn is_checkout(repo_type: RepoType, target: &Path) -> bool {
    target.join(checkout_marker(repo_type)).is_dir()
}

/// Commands that bring `target` to `revision` of `url`
pub fn pull_commands(
    repo_type: RepoType,
    url: &str,
    revision: &str,
    target: &Path,
) -> Vec<CommandSpec> {
    let dir = target.display().to_string();
    let client = repo_type.client();
    let existing = is_checkout(repo_type, target);

    match (repo_type, existing) {
        (RepoType::Git, false) => vec![
            CommandSpec::new(client).args(["clone", url, dir.as_str()]),
            CommandSpec::new(client).args(["-C", dir.as_str(), "checkout", revision]),
        ],
        (RepoType::Git, true) => vec![
            CommandSpec::new(client).args(["-C", dir.as_str(), "remote", "set-url", "origin", url]),
            CommandSpec::new(client).args(["-C", dir.as_str(), "fetch", "--tags", "origin"]),
            CommandSpec::new(client).args(["-C", dir.as_str(), "checkout", revision]),
        ],
        (RepoType::Mercurial, false) => {
            vec![CommandSpec::new(client).args(["clone", "--updaterev", revision, url, dir.as_str()])]
        }
        (RepoType::Mercurial, true) => vec![
            CommandSpec::new(client).args(["--cwd", dir.as_str(), "pull", url]),
            CommandSpec::new(client).args(["--cwd", dir.as_str(), "update", "--rev", revision]),
        ],
        (RepoType::Subversion, false) => {
            vec![CommandSpec::new(client).args(["checkout", "--revision", revision, url, dir.as_str()])]
        }
        (RepoType::Subversion, true) => {
            vec![CommandSpec::new(client).args(["switch", "--revision", revision, url, dir.as_str()])]
        }
    }
}

/// Check out `revision` of `url` into `target` with the matching client.
///
/// A `target` that is not a checkout of this flavour is replaced, except for
/// the `keep` paths inside it, which survive the fresh clone.
pub fn pull(
    sys: &mut dyn System,
    repo_type: RepoType,
    url: &str,
    revision: &str,
    target: &Path,
    keep: &[PathBuf],
) -> Result<()> {
    let client = repo_type.client();
    if !sys.has_command(client) {
        return Err(error::command::tool_missing(client));
    }

    if target.exists() && !is_checkout(repo_type, target) {
        tracing::warn!(
            path = %target.display(),
            repo_type = %repo_type,
            "working directory is not a checkout, replacing it"
        );
        replace_dir_keeping(target, keep, || run_pull(sys, repo_type, url, revision, target))?;
    } else {
        run_pull(sys, repo_type, url, revision, target)?;
    }

    tracing::info!(repo = url, revision, repo_type = %repo_type, "checked out source");
    Ok(())
}

fn run_pull(
    sys: &mut dyn System,
    repo_type: RepoType,
    url: &str,
    revision: &str,
    target: &Path,
) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| error::fs::write_failed(parent, e))?;
    }
    for command in pull_commands(repo_type, url, revision, target) {
        sys.run(&command)?;
    }
    Ok(())
}

/// Commit id HEAD of a git checkout points at
pub fn git_head(target: &Path) -> Result<String> {
    let repo = Repository::open(target)?;
    let commit = repo.head()?.peel_to_commit()?;
    Ok(commit.id().to_string())
}
