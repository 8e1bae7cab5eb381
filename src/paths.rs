//! Cache directory and executable resolution

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::layout::SERVICE_USER;
use crate::config::{Layout, ServiceConfig};
use crate::error::{self, Result};
use crate::system::System;

/// Web-server entrypoint of a vendored or checked-out application tree
const SERVER_ENTRYPOINT: &str = "server.js";

/// Executable linked by `npm install npm-offline-registry`
const LOCAL_BINARY: &str = "node_modules/.bin/npm-offline-registry";

/// Where the cache lives, without touching the filesystem
///
/// The `cache_dir` option is a system path and is resolved against the unit root.
pub fn cache_dir_path(layout: &Layout, config: &ServiceConfig) -> PathBuf {
    let configured = config.cache_dir.trim();
    if configured.is_empty() {
        layout.working_dir().join("cache")
    } else {
        layout.rooted(configured.trim_start_matches('/'))
    }
}

/// Resolve the cache directory, creating it owned by the service user if absent
pub fn resolve_cache_dir(
    sys: &mut dyn System,
    layout: &Layout,
    config: &ServiceConfig,
) -> Result<PathBuf> {
    let path = cache_dir_path(layout, config);
    if !path.is_dir() {
        fs::create_dir_all(&path).map_err(|e| error::fs::write_failed(&path, e))?;
        sys.chown(&path, SERVICE_USER, false)?;
        tracing::info!(path = %path.display(), "created cache directory");
    }
    Ok(path)
}

/// Resolve the executable to supervise, preferring the web-server entrypoint
pub fn resolve_binary(working_dir: &Path) -> PathBuf {
    let candidates = [working_dir.join(SERVER_ENTRYPOINT), working_dir.join(LOCAL_BINARY)];
    candidates
        .iter()
        .find(|candidate| candidate.exists())
        .cloned()
        .unwrap_or_else(|| working_dir.join(LOCAL_BINARY))
}
