//! Zip-backed package store

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::result::ZipError;

use super::{EntryReader, PackageStore, segments};

/// Package store backed by a zip container
///
/// Entries are inflated into memory on open; the archive handle is shared
/// between calls, so the store is not `Sync`.
pub struct ZipStore {
    path: PathBuf,
    archive: RefCell<ZipArchive<File>>,
}

impl ZipStore {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let archive = ZipArchive::new(file).map_err(zip_to_io)?;
        Ok(Self {
            path: path.to_path_buf(),
            archive: RefCell::new(archive),
        })
    }
}

impl PackageStore for ZipStore {
    fn list(&self, prefix: &str) -> io::Result<Vec<String>> {
        let prefix: Vec<&str> = segments(prefix).collect();
        let archive = self.archive.borrow();

        let mut found_prefix = prefix.is_empty();
        let mut children = BTreeSet::new();
        for name in archive.file_names() {
            let parts: Vec<&str> = segments(name).collect();
            if parts.len() < prefix.len() || parts[..prefix.len()] != prefix[..] {
                continue;
            }
            found_prefix = true;
            if let Some(child) = parts.get(prefix.len()) {
                children.insert((*child).to_string());
            }
        }

        if !found_prefix {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found in {}", prefix.join("/"), self.path.display()),
            ));
        }
        Ok(children.into_iter().collect())
    }

    fn open(&self, name: &str) -> io::Result<EntryReader<'_>> {
        let name = segments(name).collect::<Vec<_>>().join("/");
        let mut archive = self.archive.borrow_mut();
        let mut file = archive.by_name(&name).map_err(zip_to_io)?;
        if file.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{name} is a directory"),
            ));
        }

        let mut buffer = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut buffer)?;
        Ok(Box::new(Cursor::new(buffer)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn zip_to_io(err: ZipError) -> io::Error {
    match err {
        ZipError::Io(e) => e,
        ZipError::FileNotFound => io::Error::new(io::ErrorKind::NotFound, "entry not found"),
        other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
    }
}
