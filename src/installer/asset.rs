//! Raw asset copier

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{BootError, Result};
use crate::store::PackageStore;

/// Copy the entry `entry_path` byte for byte into `dest_dir`.
///
/// The destination file takes the base name of the entry. Returns the number
/// of bytes written.
pub fn copy_asset(store: &dyn PackageStore, entry_path: &str, dest_dir: &Path) -> Result<u64> {
    let copy_failed = |e: io::Error| BootError::AssetCopyFailed {
        entry: entry_path.to_string(),
        reason: e.to_string(),
    };

    let file_name = entry_path
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .ok_or_else(|| {
            copy_failed(io::Error::new(
                io::ErrorKind::InvalidInput,
                "entry has no file name",
            ))
        })?;
    let dest = dest_dir.join(file_name);

    tracing::debug!("Extracting {entry_path} to {}", dest.display());
    let mut source = store.open(entry_path).map_err(copy_failed)?;
    let mut target = BufWriter::new(File::create(&dest).map_err(copy_failed)?);

    let bytes = io::copy(&mut source, &mut target).map_err(copy_failed)?;
    target
        .into_inner()
        .map_err(|e| copy_failed(e.into_error()))?
        .sync_all()
        .map_err(copy_failed)?;
    Ok(bytes)
}
