//! npm-registry-charm - installs, configures and supervises npm-offline-registry
//!
//! Runs once per hook. Handlers fire according to flags derived from the
//! charm options, the persisted state and the host.

use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod charm;
mod cli;
mod commands;
mod common;
mod config;
mod error;
mod installer;
mod monitoring;
mod paths;
mod proxy;
mod reactive;
mod render;
mod state;
mod system;
mod user;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

/// Log to stderr, filtered by `RUST_LOG` with a level picked by `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    // Only fails if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let layout = cli.layout();
    let overrides = cli.config.as_deref();

    let result = match cli.command {
        Commands::Hook(args) => commands::hook::run(layout, overrides, cli.dry_run, args),
        Commands::Status(args) => commands::status::run(layout, overrides, cli.dry_run, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
