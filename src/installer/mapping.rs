//! Symlink map applier
//!
//! The map entry is plain UTF-8 text with one `link-name target-name` pair per
//! line. Each line is applied on its own: a bad line never stops the rest.

use std::fs;
use std::io;
use std::path::{Component, Path};

use super::InstallWarning;
use super::symlink::SymlinkProvider;
use crate::version::Presence;

/// One parsed line of the map entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkMapping {
    /// Resolved against the install directory
    pub link_name: String,
    /// Resolved against the native resource directory
    pub target_name: String,
}

/// Parse a map line; `None` unless it holds exactly two tokens
pub fn parse_mapping_line(line: &str) -> Option<SymlinkMapping> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(link), Some(target), None) => Some(SymlinkMapping {
            link_name: link.to_string(),
            target_name: target.to_string(),
        }),
        _ => None,
    }
}

/// Apply every mapping in `text`, returning the problems met on the way
pub fn apply_mappings(
    text: &str,
    install_dir: &Path,
    native_dir: &Path,
    provider: &dyn SymlinkProvider,
) -> Vec<InstallWarning> {
    let mut warnings = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let Some(mapping) = parse_mapping_line(line) else {
            warnings.push(InstallWarning::MalformedMapping {
                line: index + 1,
                content: line.to_string(),
            });
            continue;
        };

        let escaping = [&mapping.link_name, &mapping.target_name]
            .into_iter()
            .find(|name| !is_relative_inside(name));
        if let Some(name) = escaping {
            warnings.push(InstallWarning::EscapingMapping {
                line: index + 1,
                name: name.clone(),
            });
            continue;
        }

        if let Err(warning) = apply_mapping(&mapping, install_dir, native_dir, provider) {
            warnings.push(warning);
        }
    }

    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    warnings
}

/// Whether `name` is a plain relative path that stays below its base directory
fn is_relative_inside(name: &str) -> bool {
    let path = Path::new(name);
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

fn apply_mapping(
    mapping: &SymlinkMapping,
    install_dir: &Path,
    native_dir: &Path,
    provider: &dyn SymlinkProvider,
) -> Result<(), InstallWarning> {
    let target = native_dir.join(&mapping.target_name);
    let link = install_dir.join(&mapping.link_name);

    if !Presence::of(&target).exists() {
        return Err(InstallWarning::MissingTarget {
            link: link.display().to_string(),
            target: target.display().to_string(),
        });
    }

    let failed = |e: io::Error| InstallWarning::SymlinkFailed {
        link: link.display().to_string(),
        target: target.display().to_string(),
        reason: e.to_string(),
    };

    remove_existing(&link).map_err(failed)?;
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent).map_err(failed)?;
    }

    tracing::debug!("Symlink {} -> {}", link.display(), target.display());
    provider.link(&target, &link).map_err(failed)
}

/// Remove whatever occupies `path`: file, directory, or (dangling) symlink
fn remove_existing(path: &Path) -> io::Result<()> {
    match Presence::of_link(path) {
        Presence::Absent => Ok(()),
        Presence::Unknown(e) => Err(e),
        Presence::Exists => {
            tracing::debug!("Removing existing {}", path.display());
            let file_type = fs::symlink_metadata(path)?.file_type();
            if file_type.is_dir() {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path).or_else(|e| {
                    // Directory symlinks on Windows are removed as directories
                    if cfg!(windows) {
                        fs::remove_dir(path)
                    } else {
                        Err(e)
                    }
                })
            }
        }
    }
}
