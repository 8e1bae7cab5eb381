//! Init system detection and unit rendering
//!
//! The unit is only rewritten, and the service only restarted, when the
//! rendered bytes differ from what is on disk.

mod templates;

use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::common::fs::write_if_changed;
use crate::config::layout::{SERVICE_NAME, SERVICE_USER};
use crate::config::{Layout, ServiceConfig};
use crate::error::Result;
use crate::system::{CommandSpec, System};

/// Service supervisor running on the unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitSystem {
    Systemd,
    Upstart,
}

impl InitSystem {
    /// Classify by the name of the PID 1 process
    pub fn from_pid1_name(name: &str) -> Self {
        if name.trim() == "systemd" {
            InitSystem::Systemd
        } else {
            InitSystem::Upstart
        }
    }

    /// Inspect PID 1 on the unit. An unreadable process name counts as upstart.
    pub fn detect(layout: &Layout) -> Self {
        let comm = layout.pid1_comm();
        match fs::read_to_string(&comm) {
            Ok(name) => Self::from_pid1_name(&name),
            Err(e) => {
                tracing::warn!(path = %comm.display(), error = %e, "cannot read PID 1 name, assuming upstart");
                InitSystem::Upstart
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InitSystem::Systemd => "systemd",
            InitSystem::Upstart => "upstart",
        }
    }

    /// Where the unit for the managed service lives
    pub fn unit_path(self, layout: &Layout) -> PathBuf {
        match self {
            InitSystem::Systemd => layout.systemd_unit(),
            InitSystem::Upstart => layout.upstart_job(),
        }
    }

    pub fn render(self, ctx: &RenderContext) -> String {
        match self {
            InitSystem::Systemd => templates::systemd_unit(ctx),
            InitSystem::Upstart => templates::upstart_job(ctx),
        }
    }

    pub fn restart_command(self, service: &str) -> CommandSpec {
        match self {
            InitSystem::Systemd => CommandSpec::new("systemctl").args(["restart", service]),
            InitSystem::Upstart => CommandSpec::new("service").args([service, "restart"]),
        }
    }

    pub fn reload_command(self, service: &str) -> CommandSpec {
        match self {
            InitSystem::Systemd => CommandSpec::new("systemctl").args(["reload", service]),
            InitSystem::Upstart => CommandSpec::new("service").args([service, "reload"]),
        }
    }

    /// Command that makes the supervisor pick up changed unit files, if any
    pub fn reload_units_command(self) -> Option<CommandSpec> {
        match self {
            InitSystem::Systemd => Some(CommandSpec::new("systemctl").arg("daemon-reload")),
            InitSystem::Upstart => None,
        }
    }
}

impl fmt::Display for InitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values substituted into the unit templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub service: String,
    pub user: String,
    pub group: String,
    pub working_dir: PathBuf,
    pub binary: PathBuf,
    pub cache_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub registry_uri: String,
    pub enable_failover: bool,
}

impl RenderContext {
    pub fn new(config: &ServiceConfig, layout: &Layout, binary: PathBuf, cache_dir: PathBuf) -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
            user: SERVICE_USER.to_string(),
            group: SERVICE_USER.to_string(),
            working_dir: layout.working_dir(),
            binary,
            cache_dir,
            host: config.host.clone(),
            port: config.port,
            registry_uri: config.registry_uri(),
            enable_failover: config.enable_failover,
        }
    }

    /// Command line that starts the service; script entrypoints run under node
    pub fn exec_command(&self) -> String {
        if self.binary.extension().is_some_and(|ext| ext == "js") {
            format!("/usr/bin/env node {}", self.binary.display())
        } else {
            self.binary.display().to_string()
        }
    }
}

/// Result of a render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub init: InitSystem,
    pub path: PathBuf,
    pub changed: bool,
}

/// Render the unit for the detected init system, restarting on change
pub fn render_unit(
    sys: &mut dyn System,
    layout: &Layout,
    ctx: &RenderContext,
) -> Result<RenderOutcome> {
    let init = InitSystem::detect(layout);
    let path = init.unit_path(layout);
    let changed = write_if_changed(&path, &init.render(ctx))?;

    if changed {
        tracing::info!(init = %init, path = %path.display(), "unit changed, restarting");
        if let Some(reload) = init.reload_units_command() {
            sys.run(&reload)?;
        }
        sys.run(&init.restart_command(&ctx.service))?;
    } else {
        tracing::debug!(path = %path.display(), "unit unchanged");
    }

    Ok(RenderOutcome {
        init,
        path,
        changed,
    })
}

/// Restart the managed service if a unit for it has been rendered.
///
/// Returns `false` when there is nothing to restart yet.
pub fn restart_service(sys: &mut dyn System, layout: &Layout) -> Result<bool> {
    let init = InitSystem::detect(layout);
    if !init.unit_path(layout).is_file() {
        tracing::debug!(init = %init, "no unit rendered yet, skipping restart");
        return Ok(false);
    }
    sys.run(&init.restart_command(SERVICE_NAME))?;
    Ok(true)
}
