//! Flag-driven handler dispatch
//!
//! Handlers declare the set of [`Flag`]s they need. A dispatch walks the
//! registered handlers in order and runs every handler whose flags all hold,
//! repeating the walk until nothing new fires. A handler that sets a flag
//! therefore unlocks later handlers within the same hook run, while each
//! handler still runs at most once per dispatch.

use std::fmt;

use crate::error::Result;

/// Named conditions handlers can be gated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flag {
    NodejsAvailable,
    ConfigChanged,
    ConfigChangedVersion,
    Installed,
    Available,
    WebsiteAvailable,
    LocalMonitorsAvailable,
    NrpeExternalMasterAvailable,
}

impl Flag {
    pub const ALL: [Flag; 8] = [
        Flag::NodejsAvailable,
        Flag::ConfigChanged,
        Flag::ConfigChangedVersion,
        Flag::Installed,
        Flag::Available,
        Flag::WebsiteAvailable,
        Flag::LocalMonitorsAvailable,
        Flag::NrpeExternalMasterAvailable,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Flag::NodejsAvailable => "nodejs.available",
            Flag::ConfigChanged => "config.changed",
            Flag::ConfigChangedVersion => "config.changed.version",
            Flag::Installed => "npm-offline-registry.installed",
            Flag::Available => "npm-offline-registry.available",
            Flag::WebsiteAvailable => "website.available",
            Flag::LocalMonitorsAvailable => "local-monitors.available",
            Flag::NrpeExternalMasterAvailable => "nrpe-external-master.available",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything that can answer whether a flag currently holds
pub trait FlagSource {
    fn is_set(&self, flag: Flag) -> bool;

    /// All flags that currently hold
    fn active_flags(&self) -> Vec<Flag> {
        Flag::ALL.into_iter().filter(|f| self.is_set(*f)).collect()
    }
}

/// A unit of logic run when all of its `when` flags hold
pub struct Handler<C> {
    pub name: &'static str,
    when: Vec<Flag>,
    run: fn(&mut C) -> Result<()>,
}

impl<C: FlagSource> Handler<C> {
    pub fn new(name: &'static str, when: &[Flag], run: fn(&mut C) -> Result<()>) -> Self {
        Self {
            name,
            when: when.to_vec(),
            run,
        }
    }

    pub fn is_ready(&self, ctx: &C) -> bool {
        self.when.iter().all(|flag| ctx.is_set(*flag))
    }

    pub fn when(&self) -> &[Flag] {
        &self.when
    }
}

/// Ordered set of handlers
pub struct Dispatcher<C> {
    handlers: Vec<Handler<C>>,
}

impl<C: FlagSource> Default for Dispatcher<C> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<C: FlagSource> Dispatcher<C> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn register(mut self, handler: Handler<C>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn handlers(&self) -> &[Handler<C>] {
        &self.handlers
    }

    /// Run every ready handler until a fixpoint is reached.
    ///
    /// Returns the names of the handlers that ran, in order. The first handler
    /// error aborts the dispatch.
    pub fn dispatch(&self, ctx: &mut C) -> Result<Vec<&'static str>> {
        let mut fired = vec![false; self.handlers.len()];
        let mut order = Vec::new();

        loop {
            let mut progressed = false;
            for (idx, handler) in self.handlers.iter().enumerate() {
                if fired[idx] || !handler.is_ready(ctx) {
                    continue;
                }
                tracing::debug!(handler = handler.name, "invoking handler");
                fired[idx] = true;
                if let Err(e) = (handler.run)(ctx) {
                    tracing::error!(handler = handler.name, error = %e, "handler failed");
                    return Err(e);
                }
                order.push(handler.name);
                progressed = true;
            }
            if !progressed {
                break;
            }
        }

        Ok(order)
    }
}
