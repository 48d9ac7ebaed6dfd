//! Symlink providers
//!
//! The map entry asks for links from the install directory into the native
//! resource directory. Hosts whose install filesystem cannot hold symlinks get
//! a copying provider instead; the choice is made once per run.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::SymlinkMode;

/// Creates `link` so that it resolves to `target`
pub trait SymlinkProvider {
    fn name(&self) -> &'static str;

    /// `link` must not exist when this is called
    fn link(&self, target: &Path, link: &Path) -> io::Result<()>;
}

/// OS symlinks
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeSymlink;

impl SymlinkProvider for NativeSymlink {
    fn name(&self) -> &'static str {
        "native"
    }

    #[cfg(unix)]
    fn link(&self, target: &Path, link: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    fn link(&self, target: &Path, link: &Path) -> io::Result<()> {
        if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }

    #[cfg(not(any(unix, windows)))]
    fn link(&self, _target: &Path, _link: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symlinks are not supported on this platform",
        ))
    }
}

/// Copies the target in place of a link
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyFallback;

impl SymlinkProvider for CopyFallback {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn link(&self, target: &Path, link: &Path) -> io::Result<()> {
        if !target.is_dir() {
            return fs::copy(target, link).map(|_| ());
        }

        for entry in WalkDir::new(target).follow_links(true) {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(target)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let dest = link.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest)?;
            } else {
                fs::copy(entry.path(), &dest)?;
            }
        }
        Ok(())
    }
}

/// Provider for the configured mode, probing `install_dir` in auto mode
pub fn provider_for(mode: SymlinkMode, install_dir: &Path) -> Box<dyn SymlinkProvider> {
    match mode {
        SymlinkMode::Native => Box::new(NativeSymlink),
        SymlinkMode::Copy => Box::new(CopyFallback),
        SymlinkMode::Auto => detect_provider(install_dir),
    }
}

/// Pick native symlinks when a probe link can be created in `probe_dir`
pub fn detect_provider(probe_dir: &Path) -> Box<dyn SymlinkProvider> {
    let probe = match tempfile::Builder::new()
        .prefix(".symlink-probe")
        .tempdir_in(probe_dir)
    {
        Ok(probe) => probe,
        Err(e) => {
            tracing::debug!(
                "Cannot probe symlink support in {}: {e}",
                probe_dir.display()
            );
            return Box::new(NativeSymlink);
        }
    };

    let target = probe.path().join("target");
    let supported = fs::write(&target, b"")
        .and_then(|()| NativeSymlink.link(&target, &probe.path().join("link")))
        .is_ok();

    if supported {
        tracing::debug!("Using native symlinks");
        Box::new(NativeSymlink)
    } else {
        tracing::warn!(
            "Symlinks unsupported in {}, copying link targets instead",
            probe_dir.display()
        );
        Box::new(CopyFallback)
    }
}
