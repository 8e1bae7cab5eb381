//! Charm configuration handling
//!
//! This module contains:
//! - [`ServiceConfig`] - the typed set of recognized charm options
//! - [`RepoType`] - the source-control flavours the installer can pull from
//! - [`layout`] - where every file the charm touches lives on the unit
//!
//! Options are layered in increasing precedence: built-in defaults, the
//! `options:` defaults declared in the charm's `config.yaml`, then a flat
//! YAML file of operator-set values.

pub mod layout;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{self, CharmError, Result};

pub use layout::Layout;

/// Name of the charm's option declaration file inside the charm directory
pub const CHARM_CONFIG_FILE: &str = "config.yaml";

/// Option names understood by [`ServiceConfig`]
const KNOWN_OPTIONS: &[&str] = &[
    "version",
    "repo",
    "repo_type",
    "cache_dir",
    "local_cache",
    "host",
    "port",
    "enable_failover",
    "nagios_context",
];

/// Charm options consumed by the handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// npm package version, or the revision to check out when `repo` is set
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,

    /// Source repository URL (empty installs from npm)
    pub repo: String,

    /// Source repository flavour: git, hg or svn
    pub repo_type: String,

    /// Cache directory override (empty uses `<working_dir>/cache`)
    pub cache_dir: String,

    /// Public URL or host of the local cache, used as the vhost name
    pub local_cache: String,

    /// Host the registry advertises
    pub host: String,

    /// Port the registry listens on
    pub port: u16,

    /// Serve from cache when the upstream registry is unreachable
    pub enable_failover: bool,

    /// Context prefix for monitoring check descriptions
    pub nagios_context: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: String::new(),
            repo: String::new(),
            repo_type: "git".to_string(),
            cache_dir: String::new(),
            local_cache: String::new(),
            host: "localhost".to_string(),
            port: 8080,
            enable_failover: false,
            nagios_context: "juju".to_string(),
        }
    }
}

/// Option declaration in the charm's `config.yaml`
#[derive(Debug, Deserialize)]
struct OptionDecl {
    #[serde(default)]
    default: Option<Value>,
}

/// Top level of the charm's `config.yaml`
#[derive(Debug, Deserialize)]
struct CharmOptions {
    #[serde(default)]
    options: std::collections::BTreeMap<String, OptionDecl>,
}

impl ServiceConfig {
    /// Load configuration from the charm directory and an optional override file
    pub fn load(charm_dir: &Path, overrides: Option<&Path>) -> Result<Self> {
        let mut merged = Self::default_mapping()?;

        let declarations = charm_dir.join(CHARM_CONFIG_FILE);
        if declarations.is_file() {
            let content = read_config_file(&declarations)?;
            overlay(&mut merged, Self::declared_defaults(&content, &declarations)?);
        }

        if let Some(path) = overrides {
            let content = read_config_file(path)?;
            overlay(&mut merged, Self::parse_values(&content, path)?);
        }

        let config: Self = serde_yaml::from_value(Value::Mapping(merged))
            .map_err(|e| error::config::parse_failed("merged options", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a flat mapping of option values
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut merged = Self::default_mapping()?;
        overlay(&mut merged, Self::parse_values(yaml, Path::new("<inline>"))?);
        let config: Self = serde_yaml::from_value(Value::Mapping(merged))?;
        config.validate()?;
        Ok(config)
    }

    fn default_mapping() -> Result<Mapping> {
        match serde_yaml::to_value(Self::default())? {
            Value::Mapping(map) => Ok(map),
            _ => Ok(Mapping::new()),
        }
    }

    fn declared_defaults(content: &str, path: &Path) -> Result<Mapping> {
        let decls: CharmOptions = serde_yaml::from_str(content)
            .map_err(|e| error::config::parse_failed(path.display().to_string(), e.to_string()))?;

        let mut defaults = Mapping::new();
        for (name, decl) in decls.options {
            if let Some(value) = decl.default {
                defaults.insert(Value::String(name), value);
            }
        }
        Ok(defaults)
    }

    fn parse_values(content: &str, path: &Path) -> Result<Mapping> {
        if content.trim().is_empty() {
            return Ok(Mapping::new());
        }
        match serde_yaml::from_str(content) {
            Ok(Value::Mapping(map)) => Ok(map),
            Ok(Value::Null) => Ok(Mapping::new()),
            Ok(_) => Err(error::config::parse_failed(
                path.display().to_string(),
                "expected a mapping of option names to values",
            )),
            Err(e) => Err(error::config::parse_failed(
                path.display().to_string(),
                e.to_string(),
            )),
        }
    }

    /// Reject values no handler can work with
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(error::config::invalid("port must be between 1 and 65535"));
        }
        if self.host.trim().is_empty() {
            return Err(error::config::invalid("host must not be empty"));
        }
        Ok(())
    }

    /// Target version with surrounding whitespace removed
    pub fn version(&self) -> &str {
        self.version.trim()
    }

    /// Whether a source repository has been configured
    pub fn has_repo(&self) -> bool {
        !self.repo.trim().is_empty()
    }

    /// Copy of these options with the ones that select what gets installed
    /// taken from `installed`
    #[must_use]
    pub fn with_install_options(&self, installed: &ServiceConfig) -> Self {
        Self {
            version: installed.version.clone(),
            repo: installed.repo.clone(),
            repo_type: installed.repo_type.clone(),
            ..self.clone()
        }
    }

    /// Parse the configured repo type
    pub fn repo_type(&self) -> Result<RepoType> {
        self.repo_type.parse()
    }

    /// URI the registry is reachable at
    pub fn registry_uri(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Server name for the reverse-proxy vhost
    ///
    /// The host part of `local_cache` wins over `host`, so `local_cache` may be
    /// given either as a bare host or as a full URL.
    pub fn proxy_server_name(&self) -> String {
        let local = self.local_cache.trim();
        if local.is_empty() {
            return self.host.clone();
        }
        let without_scheme = local.split_once("://").map_or(local, |(_, rest)| rest);
        let authority = without_scheme.split('/').next().unwrap_or(without_scheme);
        let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
        let host = match host.strip_prefix('[') {
            // IPv6 literal keeps its brackets
            Some(rest) => rest.find(']').map_or(host, |end| &host[..end + 2]),
            None => host.split(':').next().unwrap_or(host),
        };
        if host.is_empty() {
            self.host.clone()
        } else {
            host.to_string()
        }
    }
}

fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| error::config::read_failed(path.display().to_string(), e.to_string()))
}

/// Accept numbers for string options, so `version: 1.0` is not a type error
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("expected a scalar, got {other:?}"))),
    }
}

/// Copy non-null values from `layer` onto `base`
fn overlay(base: &mut Mapping, layer: Mapping) {
    for (key, value) in layer {
        if value.is_null() {
            continue;
        }
        if let Some(name) = key.as_str() {
            if !KNOWN_OPTIONS.contains(&name) {
                tracing::debug!(option = name, "ignoring unrecognized option");
                continue;
            }
        }
        base.insert(key, value);
    }
}

/// Source-control flavour for repo installs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoType {
    Git,
    Mercurial,
    Subversion,
}

impl RepoType {
    /// Name of the client binary that must be present on the unit
    pub fn client(self) -> &'static str {
        match self {
            RepoType::Git => "git",
            RepoType::Mercurial => "hg",
            RepoType::Subversion => "svn",
        }
    }
}

impl FromStr for RepoType {
    type Err = CharmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "git" => Ok(RepoType::Git),
            "hg" | "mercurial" => Ok(RepoType::Mercurial),
            "svn" | "subversion" => Ok(RepoType::Subversion),
            _ => Err(error::config::unknown_repo_type(s)),
        }
    }
}

impl fmt::Display for RepoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.client())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.repo_type, "git");
        assert_eq!(config.port, 8080);
        assert!(!config.has_repo());
        assert_eq!(config.version(), "");
    }

    #[test]
    fn test_from_yaml_overrides_defaults() {
        let config = ServiceConfig::from_yaml("version: 1.2.0\nport: 9000\n").unwrap();
        assert_eq!(config.version(), "1.2.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "localhost");
    }

    #[test]
    fn test_numeric_version() {
        let config = ServiceConfig::from_yaml("version: 2").unwrap();
        assert_eq!(config.version(), "2");
    }

    #[test]
    fn test_from_yaml_empty() {
        let config = ServiceConfig::from_yaml("").unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_from_yaml_rejects_zero_port() {
        let result = ServiceConfig::from_yaml("port: 0");
        assert!(matches!(result, Err(CharmError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_from_yaml_rejects_non_mapping() {
        let result = ServiceConfig::from_yaml("- a\n- b\n");
        assert!(matches!(result, Err(CharmError::ConfigParseFailed { .. })));
    }

    #[test]
    fn test_unknown_options_are_ignored() {
        let config = ServiceConfig::from_yaml("version: 2.0.0\nsomething_else: 1\n").unwrap();
        assert_eq!(config.version(), "2.0.0");
    }

    #[test]
    fn test_load_layers_charm_defaults_and_overrides() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CHARM_CONFIG_FILE),
            "options:\n  version:\n    type: string\n    default: 1.0.0\n  port:\n    type: int\n    default: 8234\n",
        )
        .unwrap();
        let overrides = temp.path().join("overrides.yaml");
        std::fs::write(&overrides, "version: 1.2.0\n").unwrap();

        let config = ServiceConfig::load(temp.path(), Some(&overrides)).unwrap();
        assert_eq!(config.version(), "1.2.0");
        assert_eq!(config.port, 8234);
    }

    #[test]
    fn test_load_missing_override_file() {
        let temp = TempDir::new().unwrap();
        let result = ServiceConfig::load(temp.path(), Some(&temp.path().join("missing.yaml")));
        assert!(matches!(result, Err(CharmError::ConfigReadFailed { .. })));
    }

    #[test]
    fn test_repo_type_parsing() {
        assert_eq!("git".parse::<RepoType>().unwrap(), RepoType::Git);
        assert_eq!("hg".parse::<RepoType>().unwrap(), RepoType::Mercurial);
        assert_eq!("Mercurial".parse::<RepoType>().unwrap(), RepoType::Mercurial);
        assert_eq!("svn".parse::<RepoType>().unwrap(), RepoType::Subversion);
        assert_eq!("subversion".parse::<RepoType>().unwrap(), RepoType::Subversion);
    }

    #[test]
    fn test_repo_type_clients() {
        assert_eq!(RepoType::Git.client(), "git");
        assert_eq!(RepoType::Mercurial.client(), "hg");
        assert_eq!(RepoType::Subversion.client(), "svn");
    }

    #[test]
    fn test_unknown_repo_type() {
        let err = "bzr".parse::<RepoType>().unwrap_err();
        assert!(matches!(err, CharmError::UnknownRepoType { .. }));
    }

    #[test]
    fn test_registry_uri() {
        let config = ServiceConfig::from_yaml("host: registry.internal\nport: 4873").unwrap();
        assert_eq!(config.registry_uri(), "http://registry.internal:4873");
    }

    #[test]
    fn test_proxy_server_name() {
        let mut config = ServiceConfig::default();
        assert_eq!(config.proxy_server_name(), "localhost");

        config.local_cache = "cache.example.com".to_string();
        assert_eq!(config.proxy_server_name(), "cache.example.com");

        config.local_cache = "https://user@mirror.example.com:8443/npm".to_string();
        assert_eq!(config.proxy_server_name(), "mirror.example.com");

        config.local_cache = "http://[::1]:8080/".to_string();
        assert_eq!(config.proxy_server_name(), "[::1]");

        config.local_cache = "[2001:db8::7]".to_string();
        assert_eq!(config.proxy_server_name(), "[2001:db8::7]");
    }

    #[test]
    fn test_with_install_options() {
        let installed = ServiceConfig::from_yaml("version: 1.2.0\nrepo: https://example/a.git").unwrap();
        let current = ServiceConfig::from_yaml("version: 1.3.0\nport: 9000").unwrap();

        let merged = current.with_install_options(&installed);
        assert_eq!(merged.version(), "1.2.0");
        assert_eq!(merged.repo, "https://example/a.git");
        assert_eq!(merged.port, 9000);
    }
}
