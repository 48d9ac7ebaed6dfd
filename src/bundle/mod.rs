//! Bundle manifest
//!
//! Lists the entries under the bundle root of a package store and classifies
//! each one by name so the orchestrator can pick an installation strategy.

use std::fmt;
use std::io;

use crate::config::BootConfig;
use crate::error::{BootError, Result};
use crate::store::PackageStore;

/// How a bundle entry is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Revision of the bundle; written by the orchestrator itself
    VersionMarker,
    /// Line-oriented `link target` mapping
    SymlinkMap,
    /// Compressed container handed to a decoder
    Archive,
    /// Anything else, copied byte for byte
    PlainAsset,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::VersionMarker => "version",
            EntryKind::SymlinkMap => "symlink map",
            EntryKind::Archive => "archive",
            EntryKind::PlainAsset => "asset",
        };
        f.pad(label)
    }
}

/// One named item under the bundle root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    /// Name relative to the bundle root (e.g. `payload.7z`)
    pub name: String,
    pub kind: EntryKind,
}

impl BundleEntry {
    /// Full name of the entry inside the package store
    pub fn store_path(&self, config: &BootConfig) -> String {
        config.entry_path(&self.name)
    }
}

/// Classify an entry name against the configured layout
pub fn classify(name: &str, config: &BootConfig) -> EntryKind {
    if name == config.version_entry {
        EntryKind::VersionMarker
    } else if name == config.map_entry {
        EntryKind::SymlinkMap
    } else if config.archive_rule_for(name).is_some() {
        EntryKind::Archive
    } else {
        EntryKind::PlainAsset
    }
}

/// List and classify the entries under the bundle root.
///
/// A missing or empty bundle root yields an empty list.
pub fn list_bundle_entries(
    store: &dyn PackageStore,
    config: &BootConfig,
) -> Result<Vec<BundleEntry>> {
    let names = match store.list(&config.bundle_root) {
        Ok(names) => names,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(
                "No bundle root '{}' in {}",
                config.bundle_root,
                store.describe()
            );
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(BootError::StoreListFailed {
                prefix: config.bundle_root.clone(),
                reason: e.to_string(),
            });
        }
    };

    Ok(names
        .into_iter()
        .map(|name| {
            let kind = classify(&name, config);
            BundleEntry { name, kind }
        })
        .collect())
}
