use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Bash, loaded on next login:\n    assetboot completions bash > ~/.bash_completion.d/assetboot\n\n\
                  Zsh:\n    assetboot completions zsh > ~/.zfunc/_assetboot\n\n\
                  Fish:\n    assetboot completions fish > ~/.config/fish/completions/assetboot.fish")]
pub struct CompletionsArgs {
    /// Shell to generate the completion script for
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
