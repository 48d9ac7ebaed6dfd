//! Bootstrap configuration (`assetboot.yaml`)
//!
//! Describes the bundle layout inside the package store and how archive
//! entries are decoded. Every field has a default, so the file is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BootError, Result};

/// Default directory of the bundle inside the package store
pub const DEFAULT_BUNDLE_ROOT: &str = "module";

/// Default name of the bundled version entry
pub const DEFAULT_VERSION_ENTRY: &str = "version.txt";

/// Default name of the bundled symlink map entry
pub const DEFAULT_MAP_ENTRY: &str = "map.txt";

/// Default name of the marker file inside the install directory
pub const DEFAULT_MARKER_FILE: &str = "INSTALLED_VERSION";

/// How symlinks from the map entry are materialized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymlinkMode {
    /// Probe the install directory once and pick the best provider
    #[default]
    Auto,
    /// Always create OS symlinks
    Native,
    /// Copy the target instead of linking
    Copy,
}

impl SymlinkMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Native => "native",
            Self::Copy => "copy",
        }
    }
}

/// Decoder used for an archive suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderKind {
    SevenZip,
    Zip,
    Command,
}

impl DecoderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SevenZip => "sevenzip",
            Self::Zip => "zip",
            Self::Command => "command",
        }
    }
}

/// Maps an entry suffix to the decoder that extracts it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRule {
    pub suffix: String,
    pub decoder: DecoderKind,
    /// Program to run for [`DecoderKind::Command`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

impl ArchiveRule {
    pub fn new(suffix: impl Into<String>, decoder: DecoderKind) -> Self {
        Self {
            suffix: suffix.into(),
            decoder,
            program: None,
        }
    }
}

/// Bootstrap configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootConfig {
    pub bundle_root: String,
    pub version_entry: String,
    pub map_entry: String,
    pub marker_file: String,
    pub symlinks: SymlinkMode,
    pub archives: Vec<ArchiveRule>,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            bundle_root: DEFAULT_BUNDLE_ROOT.to_string(),
            version_entry: DEFAULT_VERSION_ENTRY.to_string(),
            map_entry: DEFAULT_MAP_ENTRY.to_string(),
            marker_file: DEFAULT_MARKER_FILE.to_string(),
            symlinks: SymlinkMode::Auto,
            archives: vec![ArchiveRule::new(".7z", DecoderKind::SevenZip)],
        }
    }
}

impl BootConfig {
    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        if !path.is_file() {
            return Err(BootError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| BootError::ConfigReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            BootError::ConfigParseFailed { reason, .. } => BootError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let root = self.bundle_root.trim_matches('/');
        if root.is_empty() {
            return Err(invalid("bundle_root must not be empty"));
        }

        for (field, value) in [
            ("version_entry", &self.version_entry),
            ("map_entry", &self.map_entry),
            ("marker_file", &self.marker_file),
        ] {
            if value.is_empty() || value.contains(['/', '\\']) {
                return Err(invalid(format!(
                    "{field} must be a plain file name, got '{value}'"
                )));
            }
        }

        if self.archives.is_empty() {
            return Err(invalid("at least one archive rule is required"));
        }

        for rule in &self.archives {
            if rule.suffix.is_empty() {
                return Err(invalid("archive suffix must not be empty"));
            }
            if rule.decoder == DecoderKind::Command
                && rule.program.as_deref().is_none_or(str::is_empty)
            {
                return Err(invalid(format!(
                    "archive rule '{}' uses the command decoder but names no program",
                    rule.suffix
                )));
            }
        }

        Ok(())
    }

    /// Store path of a named entry inside the bundle root
    pub fn entry_path(&self, name: &str) -> String {
        format!("{}/{}", self.bundle_root.trim_matches('/'), name)
    }

    /// Store path of the bundled version entry
    pub fn version_path(&self) -> String {
        self.entry_path(&self.version_entry)
    }

    /// Archive rule matching `name`; the longest matching suffix wins
    pub fn archive_rule_for(&self, name: &str) -> Option<&ArchiveRule> {
        self.archives
            .iter()
            .filter(|rule| name.ends_with(rule.suffix.as_str()))
            .max_by_key(|rule| rule.suffix.len())
    }
}

fn invalid(message: impl Into<String>) -> BootError {
    BootError::ConfigInvalid {
        message: message.into(),
    }
}
