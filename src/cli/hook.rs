use clap::Parser;

/// Arguments for the hook command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Run the install hook:\n    npm-registry-charm hook install\n\n\
                  Apply changed options:\n    npm-registry-charm hook config-changed\n\n\
                  Record a joined relation:\n    npm-registry-charm hook website-relation-joined\n\n\
                  Preview against a scratch root:\n    npm-registry-charm --root /tmp/unit --dry-run hook install")]
pub struct HookArgs {
    /// Hook name (install, config-changed, upgrade-charm, <relation>-relation-joined, ...)
    pub name: String,
}
