//! NRPE process check for the supervised registry

use std::path::Path;

use crate::common::fs::write_if_changed;
use crate::config::{Layout, ServiceConfig};
use crate::error::Result;
use crate::render::InitSystem;
use crate::system::System;

/// Name the check is registered under
pub const CHECK_NAME: &str = "check_npm_offline_registry";

const CHECK_PROCS: &str = "/usr/lib/nagios/plugins/check_procs";
const NRPE_SERVICE: &str = "nagios-nrpe-server";

/// A single process-count check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCheck {
    pub shortname: String,
    pub description: String,
    pub command: String,
}

impl ProcessCheck {
    /// Alert unless at least one process runs `binary`
    pub fn new(config: &ServiceConfig, layout: &Layout, binary: &Path) -> Self {
        Self {
            shortname: CHECK_NAME.to_string(),
            description: format!(
                "npm offline registry process {}-{}",
                config.nagios_context,
                layout.unit_slug()
            ),
            command: format!("{CHECK_PROCS} -c 1: -a {}", binary.display()),
        }
    }

    pub fn to_nrpe_config(&self) -> String {
        format!(
            "# {}\ncommand[{}]={}\n",
            self.description, self.shortname, self.command
        )
    }
}

/// Write the check definition and restart NRPE when it changed
pub fn register(sys: &mut dyn System, layout: &Layout, check: &ProcessCheck) -> Result<bool> {
    let path = layout.nrpe_check();
    let changed = write_if_changed(&path, &check.to_nrpe_config())?;
    if changed {
        let init = InitSystem::detect(layout);
        sys.run(&init.restart_command(NRPE_SERVICE))?;
        tracing::info!(check = %check.shortname, path = %path.display(), "registered check");
    }
    Ok(changed)
}
