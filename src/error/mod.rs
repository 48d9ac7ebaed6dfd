//! Error types and handling for assetboot
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Only fatal conditions live here. Per-entry problems that must not abort an
//! installation pass are reported as [`crate::installer::InstallWarning`]s.
//!
//! Sub-modules:
//! - [`fs`]: constructors for file system errors

pub mod fs;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for assetboot operations
#[derive(Error, Diagnostic, Debug)]
pub enum BootError {
    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(assetboot::config::not_found),
        help("Pass an existing file with --config or unset ASSETBOOT_CONFIG")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(assetboot::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(assetboot::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(assetboot::config::invalid))]
    ConfigInvalid { message: String },

    // Package store errors
    #[error("Package store not found: {path}")]
    #[diagnostic(
        code(assetboot::store::not_found),
        help("Point --store at a bundle directory or a zip package")
    )]
    StoreNotFound { path: String },

    #[error("Failed to open package store '{path}': {reason}")]
    #[diagnostic(code(assetboot::store::open_failed))]
    StoreOpenFailed { path: String, reason: String },

    #[error("Failed to list '{prefix}' in package store: {reason}")]
    #[diagnostic(code(assetboot::store::list_failed))]
    StoreListFailed { prefix: String, reason: String },

    #[error("No package store given")]
    #[diagnostic(
        code(assetboot::store::not_specified),
        help("Pass --store or set ASSETBOOT_STORE")
    )]
    StoreNotSpecified,

    // Installation errors
    #[error("Archive '{entry}' failed to decode (status {status})")]
    #[diagnostic(
        code(assetboot::install::archive_decode_failed),
        help("The installed version was kept; the next run retries the installation")
    )]
    ArchiveDecodeFailed { entry: String, status: i32 },

    #[error("Failed to open archive '{entry}': {reason}")]
    #[diagnostic(code(assetboot::install::archive_open_failed))]
    ArchiveOpenFailed { entry: String, reason: String },

    #[error("Failed to copy asset '{entry}': {reason}")]
    #[diagnostic(code(assetboot::install::asset_copy_failed))]
    AssetCopyFailed { entry: String, reason: String },

    #[error("Failed to create install directory: {path}")]
    #[diagnostic(code(assetboot::install::dir_failed))]
    InstallDirFailed { path: String, reason: String },

    #[error("Bootstrap failed")]
    #[diagnostic(
        code(assetboot::install::failed),
        help("Run with --verbose for details; the next run retries the installation")
    )]
    BootstrapFailed,

    // File system errors
    #[error("Failed to write file: {path}")]
    #[diagnostic(code(assetboot::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(assetboot::io))]
    IoError { message: String },
}

impl From<std::io::Error> for BootError {
    fn from(err: std::io::Error) -> Self {
        BootError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for BootError {
    fn from(err: serde_yaml::Error) -> Self {
        BootError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BootError {
    fn from(err: serde_json::Error) -> Self {
        BootError::IoError {
            message: format!("JSON output failed: {err}"),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BootError>;
