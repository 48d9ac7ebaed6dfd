//! Read-only package stores
//!
//! A package store is the hierarchical byte-stream source the bundle is read
//! from. Entries are addressed by `/`-separated names such as
//! `module/version.txt`.
//!
//! Two backends exist:
//! - [`DirStore`]: an unpacked directory tree
//! - [`ZipStore`]: a zip container (e.g. an application package)

use std::io::{self, Read};
use std::path::Path;

use crate::error::{BootError, Result};

mod dir;
mod zipped;

pub use dir::DirStore;
pub use zipped::ZipStore;

/// Byte stream of a single store entry
pub type EntryReader<'a> = Box<dyn Read + 'a>;

/// Read-only source of bundle entries
pub trait PackageStore {
    /// Names of the entries directly under `prefix`, sorted by name.
    ///
    /// Fails with [`io::ErrorKind::NotFound`] when `prefix` does not exist.
    fn list(&self, prefix: &str) -> io::Result<Vec<String>>;

    /// Open the entry `name` as a byte stream
    fn open(&self, name: &str) -> io::Result<EntryReader<'_>>;

    /// Human readable location of the store, for logs
    fn describe(&self) -> String;

    /// Read the whole entry as UTF-8 text
    fn read_to_string(&self, name: &str) -> io::Result<String> {
        let mut reader = self.open(name)?;
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Ok(content)
    }
}

/// Open the package store at `path`: a directory or a zip file
pub fn open_store(path: &Path) -> Result<Box<dyn PackageStore>> {
    if path.is_dir() {
        return Ok(Box::new(DirStore::new(path)));
    }

    if path.is_file() {
        let store = ZipStore::open(path).map_err(|e| BootError::StoreOpenFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        return Ok(Box::new(store));
    }

    Err(BootError::StoreNotFound {
        path: path.display().to_string(),
    })
}

/// Split an entry name into its non-empty `/`-separated segments
fn segments(name: &str) -> impl Iterator<Item = &str> {
    name.split('/').filter(|s| !s.is_empty() && *s != ".")
}
