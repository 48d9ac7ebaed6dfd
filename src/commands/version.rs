//! Version command implementation
//!
//! Prints the build and the bundle layout the installer would use, so a
//! packaging mistake in the config file shows up before the first install.

use std::fmt::Write as _;
use std::path::Path;

use crate::config::BootConfig;
use crate::error::Result;

/// Run version command
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = BootConfig::load(config_path)?;
    let source = config_path.map_or_else(
        || "built-in defaults".to_string(),
        |p| p.display().to_string(),
    );
    print!("{}", render(&config, &source));
    Ok(())
}

fn render(config: &BootConfig, source: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "assetboot {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out);
    let _ = writeln!(out, "Bundle layout ({source}):");
    let _ = writeln!(out, "  Version entry: {}", config.version_path());
    let _ = writeln!(out, "  Symlink map: {}", config.entry_path(&config.map_entry));
    let _ = writeln!(out, "  Marker file: {}", config.marker_file);
    let _ = writeln!(out, "  Symlinks: {}", config.symlinks.as_str());
    for rule in &config.archives {
        let decoder = rule.program.as_deref().unwrap_or(rule.decoder.as_str());
        let _ = writeln!(out, "  Archive {}: {decoder}", rule.suffix);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Build info:");
    let _ = writeln!(out, "  Minimum Rust: {}", env!("CARGO_PKG_RUST_VERSION"));
    let _ = writeln!(out, "  Profile: {}", build_profile());
    out
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
