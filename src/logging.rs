//! Log output setup
//!
//! Logs go to stderr so that `status --json` and `completions` keep a clean
//! stdout. `RUST_LOG` overrides the level chosen by the flags. While the
//! install spinner runs, each log line is written with the spinner suspended.

use std::io::{self, Write};

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::progress;

/// Log sink that clears the install spinner before writing
pub struct SpinnerSafeWriter<W> {
    inner: W,
}

impl<W> SpinnerSafeWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl SpinnerSafeWriter<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> Write for SpinnerSafeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        progress::suspend(|| inner.write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let inner = &mut self.inner;
        progress::suspend(|| inner.write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Level implied by `--verbose` / `--quiet`
pub fn level_for(verbose: bool, quiet: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    }
}

/// Install the global subscriber; later calls are ignored
pub fn init(verbose: bool, quiet: bool) {
    let level = level_for(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(SpinnerSafeWriter::stderr)
        .try_init();
}
