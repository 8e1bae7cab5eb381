use clap::Parser;

/// Arguments for the status command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show charm status:\n    npm-registry-charm status\n\n\
                  Print the persisted state as JSON:\n    npm-registry-charm status --json")]
pub struct StatusArgs {
    /// Print the persisted state as JSON
    #[arg(long)]
    pub json: bool,
}
