//! Status command implementation
//!
//! Reports the installed and bundled revisions without installing anything.

use console::Style;
use serde::Serialize;

use crate::cli::StatusArgs;
use crate::commands::helpers::{Target, TargetArgs};
use crate::error::Result;
use crate::version;

/// Snapshot of the version gate inputs
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub store: String,
    pub install_dir: String,
    pub installed: Option<String>,
    pub bundled: Option<String>,
    pub needs_install: bool,
}

impl StatusReport {
    pub fn collect(target: &Target) -> Self {
        let state = version::inspect(&target.install_dir, &*target.store, &target.config);
        Self {
            store: target.store.describe(),
            install_dir: target.install_dir.display().to_string(),
            needs_install: state.needs_install(),
            installed: state.installed.map(|v| v.as_str().to_string()),
            bundled: state.bundled.map(|v| v.as_str().to_string()),
        }
    }
}

/// Run status command
pub fn run(target: TargetArgs, args: StatusArgs) -> Result<()> {
    let report = StatusReport::collect(&target.open()?);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let bold = Style::new().bold();
    let none = || Style::new().dim().apply_to("none").to_string();
    println!("{} {}", bold.apply_to("Store:"), report.store);
    println!("{} {}", bold.apply_to("Install dir:"), report.install_dir);
    println!(
        "{} {}",
        bold.apply_to("Installed:"),
        report.installed.clone().unwrap_or_else(none)
    );
    println!(
        "{} {}",
        bold.apply_to("Bundled:"),
        report.bundled.clone().unwrap_or_else(none)
    );
    if report.needs_install {
        println!("{}", Style::new().yellow().apply_to("Install needed"));
    } else {
        println!("{}", Style::new().green().apply_to("Up to date"));
    }

    Ok(())
}
