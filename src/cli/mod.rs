//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - status: Status command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod install;
pub mod status;

pub use completions::CompletionsArgs;
pub use install::InstallArgs;
pub use status::StatusArgs;

/// Assetboot - versioned bundle installer
///
/// Install a bundled payload from a read-only package store into a writable
/// directory, once per bundle revision.
#[derive(Parser, Debug)]
#[command(
    name = "assetboot",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Versioned, idempotent bundle installer",
    long_about = "Assetboot installs a bundled payload (native library links, archives, \
                  plain assets) from a package store into an install directory. \
                  Nothing is written when the installed revision already matches the bundle.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  assetboot install --store ./package.apk          \x1b[90m# Install if the bundle changed\x1b[0m\n   \
                  assetboot install --store ./bundle --force       \x1b[90m# Reinstall the current revision\x1b[0m\n   \
                  assetboot install --store ./bundle --dry-run     \x1b[90m# Show what would be installed\x1b[0m\n   \
                  assetboot status --store ./package.apk --json    \x1b[90m# Compare installed and bundled revisions\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Package store: a bundle directory or a zip package
    #[arg(long, short = 's', global = true, env = "ASSETBOOT_STORE")]
    pub store: Option<PathBuf>,

    /// Writable install directory (defaults to the local data directory)
    #[arg(long, short = 'd', global = true, env = "ASSETBOOT_INSTALL_DIR")]
    pub install_dir: Option<PathBuf>,

    /// Directory holding the native libraries that symlinks point into
    /// (defaults to the directory of this executable)
    #[arg(long, global = true, env = "ASSETBOOT_NATIVE_DIR")]
    pub native_dir: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(long, short = 'c', global = true, env = "ASSETBOOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the bundle if its revision differs from the installed one
    Install(InstallArgs),

    /// Show installed and bundled revisions
    Status(StatusArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
