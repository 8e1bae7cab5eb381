//! Filesystem layout of a deployed unit
//!
//! Every system path is resolved against a root prefix so that a whole unit
//! can be laid out inside a scratch directory.

use std::path::{Path, PathBuf};

/// Name of the managed service (init unit, vhost, package)
pub const SERVICE_NAME: &str = "npm-offline-registry";

/// Unprivileged account the service runs as
pub const SERVICE_USER: &str = "npm-registry";

/// Directory the application tree is installed into
const WORKING_DIR: &str = "srv/npm-offline-registry";

/// Persisted charm state
const STATE_FILE: &str = "var/lib/npm-registry-charm/state.json";

/// Paths of everything the charm reads or writes on a unit
#[derive(Debug, Clone)]
pub struct Layout {
    /// Root prefix for system paths (`/` on a real unit)
    pub root: PathBuf,

    /// Directory the charm itself was deployed to
    pub charm_dir: PathBuf,

    /// Unit name, e.g. `npm-offline-registry/0`
    pub unit_name: String,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>, charm_dir: impl Into<PathBuf>, unit_name: &str) -> Self {
        Self {
            root: root.into(),
            charm_dir: charm_dir.into(),
            unit_name: unit_name.to_string(),
        }
    }

    /// Resolve a system path (given without leading slash) against the root
    pub fn rooted(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    pub fn working_dir(&self) -> PathBuf {
        self.rooted(WORKING_DIR)
    }

    pub fn state_file(&self) -> PathBuf {
        self.rooted(STATE_FILE)
    }

    /// Vendored application payload shipped alongside the charm
    pub fn vendored_source(&self) -> PathBuf {
        self.charm_dir.join(SERVICE_NAME)
    }

    pub fn systemd_unit(&self) -> PathBuf {
        self.rooted(format!("etc/systemd/system/{SERVICE_NAME}.service"))
    }

    pub fn upstart_job(&self) -> PathBuf {
        self.rooted(format!("etc/init/{SERVICE_NAME}.conf"))
    }

    pub fn vhost(&self) -> PathBuf {
        self.rooted(format!("etc/nginx/sites-enabled/{SERVICE_NAME}"))
    }

    pub fn nrpe_check(&self) -> PathBuf {
        self.rooted("etc/nagios/nrpe.d/check_npm_offline_registry.cfg")
    }

    /// Name of the process running as PID 1
    pub fn pid1_comm(&self) -> PathBuf {
        self.rooted("proc/1/comm")
    }

    /// Unit name with the `/` replaced, for use in file and check names
    pub fn unit_slug(&self) -> String {
        self.unit_name.replace('/', "-")
    }
}
