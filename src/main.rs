//! Assetboot - versioned bundle installer
//!
//! Installs a bundled payload (native library links, archives, plain assets)
//! from a read-only package store into a writable install directory, and skips
//! the work entirely when the installed revision already matches the bundle.

use clap::Parser;

mod bootstrap;
mod bundle;
mod cli;
mod commands;
mod config;
mod error;
mod installer;
mod logging;
mod progress;
mod store;
mod version;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};
use commands::helpers::TargetArgs;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let target = TargetArgs {
        store: cli.store,
        install_dir: cli.install_dir,
        native_dir: cli.native_dir,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(target, args),
        Commands::Status(args) => commands::status::run(target, args),
        Commands::Version => commands::version::run(target.config.as_deref()),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
