//! Per-entry installation strategies
//!
//! This module handles:
//! - Applying the symlink map into the native resource directory
//! - Extracting archive entries through a decoder
//! - Copying plain assets byte for byte
//!
//! Archive failures are fatal for a pass and surface as errors. Everything
//! else is best-effort and reported as [`InstallWarning`]s.

use thiserror::Error;

pub mod archive;
pub mod asset;
pub mod mapping;
pub mod symlink;

pub use archive::{ArchiveDecoder, DecoderRegistry, install_archive};
pub use asset::copy_asset;
pub use mapping::apply_mappings;
pub use symlink::SymlinkProvider;

/// Non-fatal problem met during an installation pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallWarning {
    #[error("map line {line}: expected 'link target', got '{content}'")]
    MalformedMapping { line: usize, content: String },

    #[error("map line {line}: '{name}' leaves its base directory")]
    EscapingMapping { line: usize, name: String },

    #[error("symlink target {target} does not exist, skipping {link}")]
    MissingTarget { link: String, target: String },

    #[error("failed to link {link} -> {target}: {reason}")]
    SymlinkFailed {
        link: String,
        target: String,
        reason: String,
    },

    #[error("cannot read symlink map {entry}: {reason}")]
    MapUnreadable { entry: String, reason: String },

    #[error("failed to copy asset {entry}: {reason}")]
    AssetCopyFailed { entry: String, reason: String },
}
