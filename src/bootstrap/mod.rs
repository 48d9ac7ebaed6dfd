//! Bootstrap orchestrator
//!
//! Runs once per process at startup:
//! 1. Ask the version gate whether the bundle must be installed
//! 2. List the bundle entries
//! 3. Dispatch each entry to its installer (map, archive, or plain asset)
//! 4. Record the bundled revision in the marker file
//!
//! An archive failure aborts the pass and leaves the marker untouched, so the
//! next run retries. Map and asset problems are collected as warnings and the
//! pass carries on.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::bundle::{self, BundleEntry, EntryKind};
use crate::config::BootConfig;
use crate::error::{BootError, Result};
use crate::installer::{
    self, DecoderRegistry, InstallWarning, SymlinkProvider, symlink::provider_for,
};
use crate::progress::ProgressReporter;
use crate::store::PackageStore;
use crate::version::{self, VersionToken};

/// Result of one bootstrap invocation
#[derive(Debug)]
pub struct InstallationOutcome {
    /// Overall result; `false` only when the pass was aborted
    pub success: bool,
    /// Whether an installation pass ran at all
    pub installed: bool,
    /// Revision recorded by this pass
    pub version: Option<VersionToken>,
    pub elapsed: Duration,
    /// Non-fatal problems met during the pass
    pub warnings: Vec<InstallWarning>,
    /// Fatal error that aborted the pass
    pub failure: Option<BootError>,
}

impl InstallationOutcome {
    fn up_to_date(elapsed: Duration) -> Self {
        Self {
            success: true,
            installed: false,
            version: None,
            elapsed,
            warnings: Vec::new(),
            failure: None,
        }
    }
}

/// What an installation pass would do, without doing it
#[derive(Debug)]
pub struct Plan {
    pub needed: bool,
    pub entries: Vec<BundleEntry>,
}

/// Installs a bundle from a package store into an install directory
pub struct Bootstrap<'a> {
    store: &'a dyn PackageStore,
    config: &'a BootConfig,
    install_dir: PathBuf,
    native_dir: PathBuf,
    decoders: DecoderRegistry,
    symlinks: Option<Box<dyn SymlinkProvider>>,
    force: bool,
}

impl<'a> Bootstrap<'a> {
    pub fn new(
        store: &'a dyn PackageStore,
        config: &'a BootConfig,
        install_dir: impl Into<PathBuf>,
        native_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            config,
            install_dir: install_dir.into(),
            native_dir: native_dir.into(),
            decoders: DecoderRegistry::from_config(config),
            symlinks: None,
            force: false,
        }
    }

    /// Replace the decoders built from the configuration
    #[must_use]
    pub fn with_decoders(mut self, decoders: DecoderRegistry) -> Self {
        self.decoders = decoders;
        self
    }

    /// Use `provider` instead of the one chosen by the configured mode
    #[must_use]
    pub fn with_symlink_provider(mut self, provider: Box<dyn SymlinkProvider>) -> Self {
        self.symlinks = Some(provider);
        self
    }

    /// Install even when the installed revision matches the bundle
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    fn needs_install(&self) -> bool {
        self.force || version::needs_install(&self.install_dir, self.store, self.config)
    }

    /// Gate decision and classified entries, without touching the install directory
    pub fn plan(&self) -> Result<Plan> {
        Ok(Plan {
            needed: self.needs_install(),
            entries: bundle::list_bundle_entries(self.store, self.config)?,
        })
    }

    /// Run the bootstrap: gate check, then an installation pass if required
    pub fn run(&self, progress: &dyn ProgressReporter) -> InstallationOutcome {
        let started = Instant::now();

        if !self.needs_install() {
            let elapsed = started.elapsed();
            tracing::debug!("Version check took {} milliseconds", elapsed.as_millis());
            return InstallationOutcome::up_to_date(elapsed);
        }

        progress.on_start();

        let mut warnings = Vec::new();
        let result = self.install(&mut warnings);
        let elapsed = started.elapsed();
        tracing::info!("update installed in {} milliseconds", elapsed.as_millis());

        let outcome = match result {
            Ok(version) => InstallationOutcome {
                success: true,
                installed: true,
                version,
                elapsed,
                warnings,
                failure: None,
            },
            Err(e) => {
                tracing::error!("Installation aborted: {e}");
                InstallationOutcome {
                    success: false,
                    installed: true,
                    version: None,
                    elapsed,
                    warnings,
                    failure: Some(e),
                }
            }
        };

        progress.on_finish(&outcome);
        outcome
    }

    fn install(&self, warnings: &mut Vec<InstallWarning>) -> Result<Option<VersionToken>> {
        fs::create_dir_all(&self.install_dir).map_err(|e| BootError::InstallDirFailed {
            path: self.install_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let entries = bundle::list_bundle_entries(self.store, self.config)?;
        tracing::debug!("Found {} bundle entries in {}", entries.len(), self.store.describe());

        for entry in &entries {
            self.dispatch(entry, warnings)?;
        }

        self.finalize()
    }

    fn dispatch(&self, entry: &BundleEntry, warnings: &mut Vec<InstallWarning>) -> Result<()> {
        let path = entry.store_path(self.config);
        tracing::debug!("Asset found: {} ({})", entry.name, entry.kind);

        match entry.kind {
            // Written from the bundled revision at finalize
            EntryKind::VersionMarker => {}
            EntryKind::SymlinkMap => warnings.extend(self.apply_map(&path)),
            EntryKind::Archive => {
                installer::install_archive(self.store, &path, &self.install_dir, &self.decoders)?;
            }
            EntryKind::PlainAsset => {
                if let Err(e) = installer::copy_asset(self.store, &path, &self.install_dir) {
                    let warning = match e {
                        BootError::AssetCopyFailed { entry, reason } => {
                            InstallWarning::AssetCopyFailed { entry, reason }
                        }
                        other => InstallWarning::AssetCopyFailed {
                            entry: path,
                            reason: other.to_string(),
                        },
                    };
                    tracing::warn!("{warning}");
                    warnings.push(warning);
                }
            }
        }
        Ok(())
    }

    fn apply_map(&self, path: &str) -> Vec<InstallWarning> {
        let text = match self.store.read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                let warning = InstallWarning::MapUnreadable {
                    entry: path.to_string(),
                    reason: e.to_string(),
                };
                tracing::warn!("{warning}");
                return vec![warning];
            }
        };

        tracing::debug!("Reading symlinks from {path}");
        let detected;
        let provider: &dyn SymlinkProvider = match &self.symlinks {
            Some(provider) => &**provider,
            None => {
                detected = provider_for(self.config.symlinks, &self.install_dir);
                &*detected
            }
        };

        installer::apply_mappings(&text, &self.install_dir, &self.native_dir, provider)
    }

    /// Record the bundled revision; without one the pass still succeeds but
    /// nothing is recorded, so the next run installs again
    fn finalize(&self) -> Result<Option<VersionToken>> {
        let token = match version::read_bundled(self.store, self.config) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(
                    "No bundled revision in {} ({e}); installation will repeat on next run",
                    self.config.version_path()
                );
                return Ok(None);
            }
        };

        version::write_marker(&self.install_dir, self.config, &token)?;
        tracing::info!("Installed revision {token}");
        Ok(Some(token))
    }
}
