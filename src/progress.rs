//! Progress reporting for installation passes
//!
//! The orchestrator only announces the start and the end of a pass. Reporters
//! are fire-and-forget: nothing they do feeds back into the installation.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::bootstrap::InstallationOutcome;

/// Spinner currently drawn on stderr, if a pass is running
static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn set_active(bar: Option<ProgressBar>) {
    *ACTIVE_BAR.lock().unwrap_or_else(PoisonError::into_inner) = bar;
}

fn active() -> Option<ProgressBar> {
    ACTIVE_BAR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Run `f` with the active spinner cleared from the terminal.
///
/// Anything `f` prints to stderr lands above the spinner, which is redrawn
/// afterwards. Without an active spinner `f` simply runs.
pub fn suspend<R>(f: impl FnOnce() -> R) -> R {
    match active() {
        Some(bar) => bar.suspend(f),
        None => f(),
    }
}

/// Receives the start and end of an installation pass
pub trait ProgressReporter {
    fn on_start(&self);
    fn on_finish(&self, outcome: &InstallationOutcome);
}

/// Reporter that shows nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn on_start(&self) {}
    fn on_finish(&self, _outcome: &InstallationOutcome) {}
}

/// Terminal spinner shown while a pass runs
///
/// The spinner ticks on indicatif's own thread, so a stalled entry still
/// shows activity.
pub struct SpinnerProgress {
    spinner: ProgressBar,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        Self { spinner }
    }

    #[cfg(test)]
    fn hidden() -> Self {
        Self {
            spinner: ProgressBar::hidden(),
        }
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for SpinnerProgress {
    fn on_start(&self) {
        self.spinner.set_message("Installing bundle...");
        self.spinner.enable_steady_tick(Duration::from_millis(100));
        set_active(Some(self.spinner.clone()));
    }

    fn on_finish(&self, outcome: &InstallationOutcome) {
        set_active(None);
        if outcome.success {
            self.spinner.finish_and_clear();
        } else {
            self.spinner.abandon_with_message("Installation failed");
        }
    }
}
