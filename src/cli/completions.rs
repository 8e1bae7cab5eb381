use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    npm-registry-charm completions bash > ~/.bash_completion.d/npm-registry-charm\n\n\
                  Generate zsh completions:\n    npm-registry-charm completions zsh > ~/.zfunc/_npm-registry-charm\n\n\
                  Generate fish completions:\n    npm-registry-charm completions fish > ~/.config/fish/completions/npm-registry-charm.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
