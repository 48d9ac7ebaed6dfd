use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install from a zip package:\n    assetboot install --store ./package.apk\n\n\
                   Install from a bundle directory:\n    assetboot install --store ./bundle --install-dir ./data\n\n\
                   Reinstall the current revision:\n    assetboot install --force\n\n\
                   Preview without writing:\n    assetboot install --dry-run")]
pub struct InstallArgs {
    /// Install even when the installed revision matches the bundle
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Show what would be installed without actually installing
    #[arg(long)]
    pub dry_run: bool,

    /// Do not show a progress spinner
    #[arg(long)]
    pub no_progress: bool,
}
