//! Version gate
//!
//! Decides whether an installation pass must run by comparing the revision
//! recorded in the install directory with the revision shipped in the bundle.
//! Any doubt resolves toward reinstalling.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::config::BootConfig;
use crate::error::Result;
use crate::error::fs::write_failed;
use crate::store::PackageStore;

/// Opaque bundle revision, compared for exact equality only
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token from the first line of `text`; a blank first line yields none
    pub fn from_first_line(text: &str) -> Option<Self> {
        text.lines()
            .next()
            .filter(|line| !line.trim().is_empty())
            .map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of an existence probe
#[derive(Debug)]
pub enum Presence {
    Exists,
    Absent,
    /// The probe itself failed (e.g. permission denied on a parent)
    Unknown(io::Error),
}

impl Presence {
    /// Probe `path`, following symlinks
    pub fn of(path: &Path) -> Self {
        Self::from_metadata(fs::metadata(path))
    }

    /// Probe `path` itself; a dangling symlink counts as existing
    pub fn of_link(path: &Path) -> Self {
        Self::from_metadata(fs::symlink_metadata(path))
    }

    fn from_metadata(metadata: io::Result<fs::Metadata>) -> Self {
        match metadata {
            Ok(_) => Presence::Exists,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Presence::Absent,
            Err(e) => Presence::Unknown(e),
        }
    }

    pub fn exists(&self) -> bool {
        matches!(self, Presence::Exists)
    }
}

/// Installed and bundled revisions, each read independently
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionState {
    pub installed: Option<VersionToken>,
    pub bundled: Option<VersionToken>,
}

impl VersionState {
    /// Whether an installation pass is required for this state
    pub fn needs_install(&self) -> bool {
        match (&self.installed, &self.bundled) {
            (Some(installed), Some(bundled)) => installed != bundled,
            _ => true,
        }
    }
}

/// Path of the marker file inside the install directory
pub fn marker_path(install_dir: &Path, config: &BootConfig) -> std::path::PathBuf {
    install_dir.join(&config.marker_file)
}

/// Read the bundled revision from the package store
pub fn read_bundled(store: &dyn PackageStore, config: &BootConfig) -> io::Result<VersionToken> {
    let content = store.read_to_string(&config.version_path())?;
    VersionToken::from_first_line(&content)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "version entry is empty"))
}

/// Read the installed revision from the marker file
pub fn read_installed(install_dir: &Path, config: &BootConfig) -> io::Result<VersionToken> {
    let path = marker_path(install_dir, config);
    let content = fs::read_to_string(&path)?;
    VersionToken::from_first_line(&content)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "marker file is empty"))
}

/// Read both revisions; read failures become `None`
pub fn inspect(install_dir: &Path, store: &dyn PackageStore, config: &BootConfig) -> VersionState {
    let installed = read_installed(install_dir, config)
        .inspect_err(|e| tracing::debug!("Installed version unavailable: {e}"))
        .ok();
    let bundled = read_bundled(store, config)
        .inspect_err(|e| tracing::debug!("Bundled version unavailable: {e}"))
        .ok();
    VersionState { installed, bundled }
}

/// Whether the bundle must be (re)installed into `install_dir`.
///
/// Never fails: a missing or unreadable marker, or an unreadable bundled
/// version, is treated as a first install.
pub fn needs_install(install_dir: &Path, store: &dyn PackageStore, config: &BootConfig) -> bool {
    match Presence::of(&marker_path(install_dir, config)) {
        Presence::Exists => {}
        Presence::Absent => {
            tracing::info!("New install");
            return true;
        }
        Presence::Unknown(e) => {
            tracing::debug!("Cannot probe version marker: {e}");
            tracing::info!("New install");
            return true;
        }
    }

    let state = inspect(install_dir, store, config);
    match (&state.installed, &state.bundled) {
        (Some(installed), Some(bundled)) if installed == bundled => {
            tracing::info!("Skip installation for revision {bundled}");
            false
        }
        (Some(_), Some(bundled)) => {
            tracing::info!("Found new package revision {bundled}");
            true
        }
        _ => {
            tracing::info!("New install");
            true
        }
    }
}

/// Atomically replace the marker file with `token`
pub fn write_marker(install_dir: &Path, config: &BootConfig, token: &VersionToken) -> Result<()> {
    let path = marker_path(install_dir, config);
    let write_error = |e: &io::Error| write_failed(&path, e);

    let mut temp = NamedTempFile::new_in(install_dir).map_err(|e| write_error(&e))?;
    temp.write_all(token.as_str().as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| write_error(&e))?;
    temp.persist(&path).map_err(|e| write_error(&e.error))?;

    tracing::debug!("Recorded revision {token} in {}", path.display());
    Ok(())
}
