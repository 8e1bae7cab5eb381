//! CLI definitions using clap derive API
//!
//! Each subcommand's arguments live in their own submodule:
//! - hook: Hook command arguments
//! - status: Status command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Layout;

pub mod completions;
pub mod hook;
pub mod status;

pub use completions::CompletionsArgs;
pub use hook::HookArgs;
pub use status::StatusArgs;

/// Unit name used when the agent does not provide one
pub const DEFAULT_UNIT: &str = "npm-offline-registry/0";

/// npm-registry-charm - installs and supervises npm-offline-registry
///
/// Invoked by the agent once per hook with the hook name.
#[derive(Parser, Debug)]
#[command(
    name = "npm-registry-charm",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install, configure and supervise an npm offline registry",
    long_about = "Runs the charm's hooks: installs npm-offline-registry from a vendored payload, \
                  a source repository or npm, renders its systemd or upstart unit, and wires up \
                  the reverse proxy and NRPE check when the matching relations are joined.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  npm-registry-charm hook install                   \x1b[90m# Run the install hook\x1b[0m\n   \
                  npm-registry-charm hook website-relation-joined   \x1b[90m# Record the website relation\x1b[0m\n   \
                  npm-registry-charm --root /tmp/unit --dry-run hook config-changed\n   \
                  npm-registry-charm status                         \x1b[90m# Show lifecycle and flags\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Prefix for every system path the charm touches
    #[arg(long, global = true, env = "CHARM_ROOT", default_value = "/")]
    pub root: PathBuf,

    /// Directory the charm is deployed to
    #[arg(long, global = true, env = "CHARM_DIR", default_value = ".")]
    pub charm_dir: PathBuf,

    /// Name of the unit this hook runs for
    #[arg(long, global = true, env = "JUJU_UNIT_NAME", default_value = DEFAULT_UNIT)]
    pub unit: String,

    /// YAML file with option values, overriding the charm defaults
    #[arg(long, short = 'c', global = true, env = "CHARM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log external commands instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn layout(&self) -> Layout {
        Layout::new(&self.root, &self.charm_dir, &self.unit)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a hook
    Hook(HookArgs),

    /// Show lifecycle, flags and resolved paths
    Status(StatusArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_hook() {
        let cli = Cli::try_parse_from(["npm-registry-charm", "hook", "install"]).unwrap();
        match cli.command {
            Commands::Hook(args) => assert_eq!(args.name, "install"),
            _ => panic!("Expected Hook command"),
        }
    }

    #[test]
    fn test_cli_hook_requires_name() {
        assert!(Cli::try_parse_from(["npm-registry-charm", "hook"]).is_err());
    }

    #[test]
    fn test_cli_parsing_status() {
        let cli = Cli::try_parse_from(["npm-registry-charm", "status", "--json"]).unwrap();
        match cli.command {
            Commands::Status(args) => assert!(args.json),
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["npm-registry-charm", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "npm-registry-charm",
            "hook",
            "config-changed",
            "--root",
            "/tmp/unit",
            "--charm-dir",
            "/tmp/charm",
            "--unit",
            "npm-offline-registry/3",
            "-c",
            "/tmp/options.yaml",
            "--dry-run",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.root, PathBuf::from("/tmp/unit"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/options.yaml")));
        assert!(cli.dry_run);
        assert!(cli.verbose);

        let layout = cli.layout();
        assert_eq!(layout.charm_dir, PathBuf::from("/tmp/charm"));
        assert_eq!(layout.unit_slug(), "npm-offline-registry-3");
        assert_eq!(
            layout.working_dir(),
            PathBuf::from("/tmp/unit/srv/npm-offline-registry")
        );
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["npm-registry-charm", "completions", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, "zsh"),
            _ => panic!("Expected Completions command"),
        }
    }
}
