use clap::Parser;

/// Arguments for the status command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show revisions:\n    assetboot status --store ./package.apk\n\n\
                  Machine-readable output:\n    assetboot status --json")]
pub struct StatusArgs {
    /// Print the status as JSON
    #[arg(long)]
    pub json: bool,
}
