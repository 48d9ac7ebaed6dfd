//! Install command implementation
//!
//! Runs the bootstrap against the resolved store and directories:
//! 1. Check the installed revision against the bundled one
//! 2. Install every bundle entry when they differ (or with `--force`)
//! 3. Record the bundled revision
//!
//! `--dry-run` stops after listing what step 2 would do.

use std::path::Path;

use console::Style;

use crate::bootstrap::{Bootstrap, InstallationOutcome, Plan};
use crate::cli::InstallArgs;
use crate::commands::helpers::TargetArgs;
use crate::error::{BootError, Result};
use crate::progress::{ProgressReporter, SilentProgress, SpinnerProgress};

/// Run install command
pub fn run(target: TargetArgs, args: InstallArgs) -> Result<()> {
    let target = target.open()?;
    let bootstrap = Bootstrap::new(
        &*target.store,
        &target.config,
        &target.install_dir,
        &target.native_dir,
    )
    .force(args.force);

    if args.dry_run {
        print_plan(&bootstrap.plan()?, bootstrap.install_dir());
        return Ok(());
    }

    let progress: Box<dyn ProgressReporter> =
        if args.no_progress || !console::Term::stderr().is_term() {
            Box::new(SilentProgress)
        } else {
            Box::new(SpinnerProgress::new())
        };

    let outcome = bootstrap.run(&*progress);
    print_summary(&outcome, bootstrap.install_dir());

    match outcome.failure {
        Some(e) => Err(e),
        None if outcome.success => Ok(()),
        None => Err(BootError::BootstrapFailed),
    }
}

fn print_plan(plan: &Plan, install_dir: &Path) {
    let bold = Style::new().bold();
    if !plan.needed {
        println!("{} is up to date, nothing to install.", install_dir.display());
        return;
    }

    println!(
        "{} {}",
        bold.apply_to("Would install into"),
        install_dir.display()
    );
    if plan.entries.is_empty() {
        println!("  (bundle has no entries)");
    }
    for entry in &plan.entries {
        println!(
            "  {:<12} {}",
            Style::new().cyan().apply_to(entry.kind),
            entry.name
        );
    }
}

fn print_summary(outcome: &InstallationOutcome, install_dir: &Path) {
    if !outcome.installed {
        println!("Already up to date.");
        return;
    }

    if outcome.success {
        let revision = outcome
            .version
            .as_ref()
            .map_or_else(|| "unrecorded revision".to_string(), |v| format!("revision {v}"));
        println!(
            "{} {} into {} in {} ms",
            Style::new().bold().green().apply_to("Installed"),
            revision,
            install_dir.display(),
            outcome.elapsed.as_millis()
        );
    } else {
        println!(
            "{} installed revision kept, the next run retries",
            Style::new().bold().red().apply_to("Installation aborted:")
        );
    }

    for warning in &outcome.warnings {
        println!("  {} {}", Style::new().yellow().apply_to("warning:"), warning);
    }
}
