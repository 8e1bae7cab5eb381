//! Persisted charm state
//!
//! The lifecycle is an explicit state machine:
//!
//! ```text
//! uninstalled ──install──▶ installed ──configure──▶ available
//!                              ▲                        │
//!                              └──────reinstall─────────┘
//! ```
//!
//! The state file is written only after a hook completes, so a failed hook
//! leaves the previous state in place and the next hook retries.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::fs::write_atomic;
use crate::config::ServiceConfig;
use crate::error::{self, Result};

/// Install/configure lifecycle of the managed service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    #[default]
    Uninstalled,
    Installed,
    Available,
}

impl Lifecycle {
    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::Uninstalled => "uninstalled",
            Lifecycle::Installed => "installed",
            Lifecycle::Available => "available",
        }
    }

    pub fn is_installed(self) -> bool {
        matches!(self, Lifecycle::Installed | Lifecycle::Available)
    }

    pub fn is_available(self) -> bool {
        self == Lifecycle::Available
    }

    /// An install from any state leaves the service installed but unconfigured
    #[must_use]
    pub fn mark_installed(self) -> Self {
        Lifecycle::Installed
    }

    /// Only an installed service can become available
    pub fn mark_available(self) -> Result<Self> {
        if self.is_installed() {
            Ok(Lifecycle::Available)
        } else {
            Err(error::state::invalid_transition(
                self.as_str(),
                Lifecycle::Available.as_str(),
            ))
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relations the charm reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    Website,
    LocalMonitors,
    NrpeExternalMaster,
}

impl Relation {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "website" => Some(Relation::Website),
            "local-monitors" => Some(Relation::LocalMonitors),
            "nrpe-external-master" => Some(Relation::NrpeExternalMaster),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Relation::Website => "website",
            Relation::LocalMonitors => "local-monitors",
            Relation::NrpeExternalMaster => "nrpe-external-master",
        }
    }
}

/// Everything carried from one hook run to the next
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharmState {
    #[serde(default)]
    pub lifecycle: Lifecycle,

    /// Relations currently joined
    #[serde(default)]
    pub relations: BTreeSet<Relation>,

    /// Configuration applied by the last successful hook
    #[serde(default)]
    pub applied_config: Option<ServiceConfig>,

    /// Version or revision that was last installed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_revision: Option<String>,
}

impl CharmState {
    /// Load state, starting fresh when no state file exists yet
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no state file, starting fresh");
                return Ok(Self::default());
            }
            Err(e) => return Err(error::fs::read_failed(path, e)),
        };

        serde_json::from_str(&content)
            .map_err(|e| error::state::corrupt(path.display().to_string(), e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| error::state::corrupt(path.display().to_string(), e.to_string()))?;
        write_atomic(path, json.as_bytes())
    }

    pub fn has_relation(&self, relation: Relation) -> bool {
        self.relations.contains(&relation)
    }

    pub fn join(&mut self, relation: Relation) {
        if self.relations.insert(relation) {
            tracing::info!(relation = relation.name(), "relation joined");
        }
    }

    pub fn depart(&mut self, relation: Relation) {
        if self.relations.remove(&relation) {
            tracing::info!(relation = relation.name(), "relation departed");
        }
    }

    /// Whether any option differs from what was last applied
    pub fn config_changed(&self, current: &ServiceConfig) -> bool {
        self.applied_config.as_ref() != Some(current)
    }

    /// Whether the version option differs from what was last applied
    pub fn version_changed(&self, current: &ServiceConfig) -> bool {
        self.applied_config
            .as_ref()
            .is_none_or(|applied| applied.version() != current.version())
    }
}
