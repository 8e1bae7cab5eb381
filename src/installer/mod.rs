//! Installation of the npm-offline-registry application tree
//!
//! Three strategies, tried in order:
//! - a vendored payload shipped next to the charm (offline installs)
//! - a source-control checkout when `repo` is configured
//! - `npm install` of the published package

pub mod scm;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::fs::{CopyOptions, copy_dir_recursive, replace_dir_keeping};
use crate::config::{Layout, RepoType, ServiceConfig};
use crate::error::{self, Result};
use crate::system::{CommandSpec, System};

/// Package published to the npm registry
pub const PACKAGE_NAME: &str = "npm-offline-registry";

/// How the application tree gets onto the unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Copy a payload shipped alongside the charm
    Vendored { source: PathBuf, version: String },

    /// Check out a revision from a source repository
    SourceControl {
        repo_type: RepoType,
        url: String,
        revision: String,
    },

    /// Install the published package with npm
    Package { version: String },
}

impl InstallStrategy {
    /// Pick the strategy for this configuration.
    ///
    /// An unrecognized `repo_type` is rejected here, before anything is touched.
    pub fn resolve(config: &ServiceConfig, layout: &Layout) -> Result<Self> {
        let version = config.version().to_string();
        if version.is_empty() {
            return Err(error::config::invalid("version must be set to install"));
        }

        let vendored = layout.vendored_source();
        if vendored.is_dir() {
            return Ok(InstallStrategy::Vendored {
                source: vendored,
                version,
            });
        }

        if config.has_repo() {
            return Ok(InstallStrategy::SourceControl {
                repo_type: config.repo_type()?,
                url: config.repo.trim().to_string(),
                revision: version,
            });
        }

        Ok(InstallStrategy::Package { version })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InstallStrategy::Vendored { .. } => "vendored",
            InstallStrategy::SourceControl { .. } => "source-control",
            InstallStrategy::Package { .. } => "package",
        }
    }
}

impl fmt::Display for InstallStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallStrategy::Vendored { source, version } => {
                write!(f, "vendored {} ({version})", source.display())
            }
            InstallStrategy::SourceControl {
                repo_type,
                url,
                revision,
            } => write!(f, "{repo_type} {url}@{revision}"),
            InstallStrategy::Package { version } => write!(f, "npm {PACKAGE_NAME}@{version}"),
        }
    }
}

/// What ended up installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Package version, or the revision the checkout resolved to
    pub revision: String,
}

/// Produce an installed application tree in the working directory.
///
/// Strategies that rebuild the tree from scratch carry the `keep` paths inside
/// it, such as the registry cache, over to the new tree.
pub fn install(
    sys: &mut dyn System,
    layout: &Layout,
    strategy: &InstallStrategy,
    keep: &[PathBuf],
) -> Result<InstallOutcome> {
    let working_dir = layout.working_dir();

    let revision = match strategy {
        InstallStrategy::Vendored { source, version } => {
            let copied = replace_dir_keeping(&working_dir, keep, || {
                copy_dir_recursive(source, &working_dir, &CopyOptions::exclude_vcs())
            })?;
            tracing::info!(files = copied, from = %source.display(), "copied vendored payload");
            install_dependencies(sys, &working_dir)?;
            version.clone()
        }
        InstallStrategy::SourceControl {
            repo_type,
            url,
            revision,
        } => {
            scm::pull(sys, *repo_type, url, revision, &working_dir, keep)?;
            install_dependencies(sys, &working_dir)?;
            checked_out_revision(*repo_type, &working_dir, revision)
        }
        InstallStrategy::Package { version } => {
            fs::create_dir_all(&working_dir)
                .map_err(|e| error::fs::write_failed(&working_dir, e))?;
            let package = format!("{PACKAGE_NAME}@{version}");
            sys.run(
                &CommandSpec::new("npm")
                    .args(["install", package.as_str()])
                    .current_dir(&working_dir),
            )?;
            version.clone()
        }
    };

    tracing::info!(strategy = strategy.kind(), revision = %revision, "installed {PACKAGE_NAME}");
    Ok(InstallOutcome { revision })
}

/// Install the tree's own dependencies unless they are already present
fn install_dependencies(sys: &mut dyn System, working_dir: &Path) -> Result<()> {
    if working_dir.join("node_modules").is_dir() {
        tracing::debug!("node_modules present, skipping dependency install");
        return Ok(());
    }
    sys.run(
        &CommandSpec::new("npm")
            .args(["install", "--production"])
            .current_dir(working_dir),
    )
}

/// Resolved commit for git checkouts, the requested revision otherwise
fn checked_out_revision(repo_type: RepoType, working_dir: &Path, requested: &str) -> String {
    if repo_type != RepoType::Git || !scm::is_checkout(repo_type, working_dir) {
        return requested.to_string();
    }
    match scm::git_head(working_dir) {
        Ok(sha) => sha,
        Err(e) => {
            tracing::warn!(error = %e, "could not read checked out revision");
            requested.to_string()
        }
    }
}
