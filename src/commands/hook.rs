//! Hook command implementation
//!
//! Loads options and persisted state, applies what the hook name implies,
//! dispatches handlers, and persists state only if every handler succeeded.

use std::path::Path;

use crate::charm::{Charm, HookEvent};
use crate::cli::HookArgs;
use crate::config::{Layout, ServiceConfig};
use crate::error::Result;
use crate::reactive::{Flag, FlagSource};
use crate::state::CharmState;
use crate::system::HostSystem;

/// Run a single hook
pub fn run(layout: Layout, overrides: Option<&Path>, dry_run: bool, args: HookArgs) -> Result<()> {
    let span = tracing::info_span!("hook", name = %args.name, unit = %layout.unit_name);
    let _enter = span.enter();

    let event = HookEvent::parse(&args.name);
    let config = ServiceConfig::load(&layout.charm_dir, overrides)?;
    let state_file = layout.state_file();
    let state = CharmState::load(&state_file)?;

    let mut charm = Charm::new(config, layout, state, HostSystem::new(dry_run));
    if !charm.is_set(Flag::NodejsAvailable) {
        tracing::warn!("node or npm not found on PATH");
    }
    charm.apply_event(&event);

    let fired = charm.run()?;
    charm.state().save(&state_file)?;

    tracing::info!(
        handlers = ?fired,
        lifecycle = %charm.state().lifecycle,
        "hook complete"
    );
    Ok(())
}
