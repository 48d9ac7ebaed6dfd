//! Command helper utilities

use std::path::PathBuf;

use crate::config::BootConfig;
use crate::error::{BootError, Result};
use crate::store::{self, PackageStore};

/// Path arguments shared by every command that touches a bundle
#[derive(Debug, Clone, Default)]
pub struct TargetArgs {
    pub store: Option<PathBuf>,
    pub install_dir: Option<PathBuf>,
    pub native_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Opened package store plus the resolved directories and configuration
pub struct Target {
    pub store: Box<dyn PackageStore>,
    pub config: BootConfig,
    pub install_dir: PathBuf,
    pub native_dir: PathBuf,
}

impl TargetArgs {
    /// Load the configuration, open the store, and fill in default directories
    pub fn open(self) -> Result<Target> {
        let config = BootConfig::load(self.config.as_deref())?;
        let store_path = self.store.ok_or(BootError::StoreNotSpecified)?;
        let store = store::open_store(&store_path)?;

        Ok(Target {
            store,
            config,
            install_dir: resolve_install_dir(self.install_dir)?,
            native_dir: resolve_native_dir(self.native_dir)?,
        })
    }
}

/// Resolve install directory from optional argument
///
/// Defaults to `assetboot` under the platform's local data directory.
pub fn resolve_install_dir(install_dir: Option<PathBuf>) -> Result<PathBuf> {
    match install_dir {
        Some(path) => Ok(path),
        None => dirs::data_local_dir()
            .map(|dir| dir.join("assetboot"))
            .ok_or_else(|| BootError::IoError {
                message: "Failed to determine local data directory".to_string(),
            }),
    }
}

/// Resolve native resource directory from optional argument
///
/// Defaults to the directory holding the running executable.
pub fn resolve_native_dir(native_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = native_dir {
        return Ok(path);
    }

    let exe = std::env::current_exe().map_err(|e| BootError::IoError {
        message: format!("Failed to locate executable: {}", e),
    })?;
    exe.parent()
        .map(std::path::Path::to_path_buf)
        .ok_or_else(|| BootError::IoError {
            message: format!("Executable has no parent directory: {}", exe.display()),
        })
}
