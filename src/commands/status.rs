//! Status command implementation
//!
//! Shows what the next hook would see: lifecycle, derived flags, joined
//! relations, handler readiness and the resolved paths.

use console::Style;
use serde_json::json;

use std::path::Path;

use crate::charm::Charm;
use crate::cli::StatusArgs;
use crate::config::{Layout, ServiceConfig};
use crate::error::{self, Result};
use crate::paths;
use crate::reactive::FlagSource;
use crate::render::InitSystem;
use crate::state::{CharmState, Lifecycle};
use crate::system::{HostSystem, System};

/// Run status command
pub fn run(layout: Layout, overrides: Option<&Path>, dry_run: bool, args: StatusArgs) -> Result<()> {
    let config = ServiceConfig::load(&layout.charm_dir, overrides)?;
    let state = CharmState::load(&layout.state_file())?;
    let charm = Charm::new(config, layout, state, HostSystem::new(dry_run));

    if args.json {
        print_json(&charm)
    } else {
        print_status(&charm);
        Ok(())
    }
}

fn print_json<S: System>(charm: &Charm<S>) -> Result<()> {
    let state = charm.state();
    let flags: Vec<&str> = charm.active_flags().iter().map(|f| f.name()).collect();
    let relations: Vec<&str> = state.relations.iter().map(|r| r.name()).collect();
    let value = json!({
        "unit": charm.layout().unit_name,
        "lifecycle": state.lifecycle.as_str(),
        "installed_revision": state.installed_revision,
        "relations": relations,
        "flags": flags,
    });
    let rendered = serde_json::to_string_pretty(&value).map_err(|e| error::CharmError::IoError {
        message: e.to_string(),
    })?;
    println!("{rendered}");
    Ok(())
}

fn lifecycle_style(lifecycle: Lifecycle) -> Style {
    match lifecycle {
        Lifecycle::Uninstalled => Style::new().red(),
        Lifecycle::Installed => Style::new().yellow(),
        Lifecycle::Available => Style::new().green(),
    }
}

fn print_status<S: System>(charm: &Charm<S>) {
    let bold = Style::new().bold();
    let dim = Style::new().dim();
    let layout = charm.layout();
    let state = charm.state();

    println!("{}", Style::new().bold().yellow().apply_to(&layout.unit_name));
    println!(
        "  {} {}",
        bold.apply_to("Lifecycle:"),
        lifecycle_style(state.lifecycle).apply_to(state.lifecycle)
    );
    if let Some(revision) = &state.installed_revision {
        println!("  {} {}", bold.apply_to("Installed:"), revision);
    }

    let relations: Vec<&str> = state.relations.iter().map(|r| r.name()).collect();
    if relations.is_empty() {
        println!("  {} {}", bold.apply_to("Relations:"), dim.apply_to("none"));
    } else {
        println!("  {} {}", bold.apply_to("Relations:"), relations.join(", "));
    }

    println!("  {}", bold.apply_to("Flags:"));
    let active = charm.active_flags();
    if active.is_empty() {
        println!("    {}", dim.apply_to("none"));
    }
    for flag in active {
        println!("    {}", Style::new().cyan().apply_to(flag));
    }

    println!("  {}", bold.apply_to("Handlers:"));
    for handler in Charm::<S>::dispatcher().handlers() {
        if handler.is_ready(charm) {
            println!("    {:<16} {}", handler.name, Style::new().green().apply_to("ready"));
        } else {
            let missing: Vec<&str> = handler
                .when()
                .iter()
                .filter(|flag| !charm.is_set(**flag))
                .map(|flag| flag.name())
                .collect();
            println!(
                "    {:<16} {}",
                handler.name,
                dim.apply_to(format!("waiting on {}", missing.join(", ")))
            );
        }
    }

    let working_dir = layout.working_dir();
    let init = InitSystem::detect(layout);
    println!("  {}", bold.apply_to("Paths:"));
    println!("    {:<12} {}", "working dir", working_dir.display());
    println!(
        "    {:<12} {}",
        "cache dir",
        paths::cache_dir_path(layout, charm.config()).display()
    );
    println!("    {:<12} {}", "binary", paths::resolve_binary(&working_dir).display());
    println!(
        "    {:<12} {} {}",
        "unit",
        init.unit_path(layout).display(),
        dim.apply_to(format!("({init})"))
    );
    println!("    {:<12} {}", "state", layout.state_file().display());
}
