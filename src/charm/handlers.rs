//! Handlers wired into the charm's dispatcher

use crate::config::layout::SERVICE_USER;
use crate::error::Result;
use crate::installer::{self, InstallStrategy};
use crate::monitoring::{self, ProcessCheck};
use crate::paths;
use crate::proxy;
use crate::render::{self, RenderContext};
use crate::system::System;
use crate::user::ensure_service_user;

use super::Charm;

/// Install the configured version of the registry
pub(super) fn install<S: System>(charm: &mut Charm<S>) -> Result<()> {
    if charm.config.version().is_empty() {
        tracing::warn!("version is not set, skipping install");
        return Ok(());
    }

    // Resolved up front so a bad repo_type fails before anything changes
    let strategy = InstallStrategy::resolve(&charm.config, &charm.layout)?;
    tracing::info!(strategy = %strategy, "installing");

    let working_dir = charm.layout.working_dir();
    ensure_service_user(&mut charm.sys, SERVICE_USER, &working_dir)?;
    let cache_dir = paths::cache_dir_path(&charm.layout, &charm.config);
    let outcome = installer::install(&mut charm.sys, &charm.layout, &strategy, &[cache_dir])?;
    charm.sys.chown(&working_dir, SERVICE_USER, true)?;
    render::restart_service(&mut charm.sys, &charm.layout)?;

    charm.state.lifecycle = charm.state.lifecycle.mark_installed();
    charm.state.installed_revision = Some(outcome.revision);
    Ok(())
}

/// Render the init unit and bring the service up
pub(super) fn configure<S: System>(charm: &mut Charm<S>) -> Result<()> {
    let working_dir = charm.layout.working_dir();
    ensure_service_user(&mut charm.sys, SERVICE_USER, &working_dir)?;

    let cache_dir = paths::resolve_cache_dir(&mut charm.sys, &charm.layout, &charm.config)?;
    let binary = paths::resolve_binary(&working_dir);
    let ctx = RenderContext::new(&charm.config, &charm.layout, binary, cache_dir);
    let outcome = render::render_unit(&mut charm.sys, &charm.layout, &ctx)?;

    charm.state.lifecycle = charm.state.lifecycle.mark_available()?;
    tracing::info!(
        init = %outcome.init,
        unit = %outcome.path.display(),
        changed = outcome.changed,
        "service configured"
    );
    Ok(())
}

pub(super) fn configure_proxy<S: System>(charm: &mut Charm<S>) -> Result<()> {
    let cache_dir = paths::resolve_cache_dir(&mut charm.sys, &charm.layout, &charm.config)?;
    proxy::configure(&mut charm.sys, &charm.layout, &charm.config, &cache_dir)?;
    Ok(())
}

pub(super) fn register_checks<S: System>(charm: &mut Charm<S>) -> Result<()> {
    let binary = paths::resolve_binary(&charm.layout.working_dir());
    let check = ProcessCheck::new(&charm.config, &charm.layout, &binary);
    monitoring::register(&mut charm.sys, &charm.layout, &check)?;
    Ok(())
}
