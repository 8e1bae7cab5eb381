//! The charm: configuration, persisted state and the host, wired to handlers
//!
//! Flags are derived from the loaded configuration, the persisted state and
//! the host rather than stored, so a hook that fails part-way leaves nothing
//! half-set behind.

mod handlers;
pub mod hook;

pub use hook::HookEvent;

use crate::config::{Layout, ServiceConfig};
use crate::error::Result;
use crate::reactive::{Dispatcher, Flag, FlagSource, Handler};
use crate::state::{CharmState, Relation};
use crate::system::System;

pub struct Charm<S: System> {
    config: ServiceConfig,
    layout: Layout,
    state: CharmState,
    sys: S,
    nodejs: bool,
}

impl<S: System> Charm<S> {
    pub fn new(config: ServiceConfig, layout: Layout, state: CharmState, sys: S) -> Self {
        let nodejs = sys.has_command("node") && sys.has_command("npm");
        Self {
            config,
            layout,
            state,
            sys,
            nodejs,
        }
    }

    /// Handlers in registration order
    pub fn dispatcher() -> Dispatcher<Self> {
        Dispatcher::new()
            .register(Handler::new(
                "install",
                &[Flag::NodejsAvailable, Flag::ConfigChangedVersion],
                handlers::install,
            ))
            .register(Handler::new(
                "configure",
                &[Flag::Installed, Flag::ConfigChanged],
                handlers::configure,
            ))
            .register(Handler::new(
                "configure_proxy",
                &[Flag::Available, Flag::WebsiteAvailable],
                handlers::configure_proxy,
            ))
            .register(Handler::new(
                "register_checks",
                &[
                    Flag::LocalMonitorsAvailable,
                    Flag::NrpeExternalMasterAvailable,
                    Flag::Available,
                ],
                handlers::register_checks,
            ))
    }

    /// Record what the hook itself says about relations and upgrades
    pub fn apply_event(&mut self, event: &HookEvent) {
        match event {
            HookEvent::RelationJoined(relation) => self.state.join(*relation),
            HookEvent::RelationDeparted(relation) => self.state.depart(*relation),
            HookEvent::UpgradeCharm => {
                tracing::info!("charm upgraded, re-applying configuration");
                self.state.applied_config = None;
            }
            HookEvent::Other(_) => {}
        }
    }

    /// Dispatch handlers and snapshot the applied configuration.
    ///
    /// When `install` did not run, the snapshot keeps the previously installed
    /// version and source so a pending reinstall is still seen next hook.
    /// On error the state is left as the failing handler found it and must
    /// not be persisted.
    pub fn run(&mut self) -> Result<Vec<&'static str>> {
        let fired = Self::dispatcher().dispatch(self)?;
        let installed = fired.contains(&"install");
        self.state.applied_config = match self.state.applied_config.take() {
            _ if installed => Some(self.config.clone()),
            Some(previous) => Some(self.config.with_install_options(&previous)),
            None => None,
        };
        Ok(fired)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn state(&self) -> &CharmState {
        &self.state
    }
}

impl<S: System> FlagSource for Charm<S> {
    fn is_set(&self, flag: Flag) -> bool {
        let lifecycle = self.state.lifecycle;
        match flag {
            Flag::NodejsAvailable => self.nodejs,
            Flag::ConfigChanged => {
                self.state.config_changed(&self.config) || !lifecycle.is_available()
            }
            Flag::ConfigChangedVersion => {
                self.state.version_changed(&self.config) || !lifecycle.is_installed()
            }
            Flag::Installed => lifecycle.is_installed(),
            Flag::Available => lifecycle.is_available(),
            Flag::WebsiteAvailable => self.state.has_relation(Relation::Website),
            Flag::LocalMonitorsAvailable => self.state.has_relation(Relation::LocalMonitors),
            Flag::NrpeExternalMasterAvailable => {
                self.state.has_relation(Relation::NrpeExternalMaster)
            }
        }
    }
}
