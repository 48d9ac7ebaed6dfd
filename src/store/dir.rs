//! Directory-backed package store

use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use super::{EntryReader, PackageStore, segments};

/// Package store backed by an unpacked directory tree
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve an entry name below the store root, refusing names that escape it
    fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        let mut path = self.root.clone();
        for segment in segments(name) {
            let escapes = Path::new(segment)
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
            if escapes {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("entry name escapes the store: {name}"),
                ));
            }
            path.push(segment);
        }
        Ok(path)
    }
}

impl PackageStore for DirStore {
    fn list(&self, prefix: &str) -> io::Result<Vec<String>> {
        let dir = self.resolve(prefix)?;
        if !dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", dir.display()),
            ));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => tracing::warn!(
                    "Skipping entry with non UTF-8 name: {}",
                    entry.path().display()
                ),
            }
        }
        Ok(names)
    }

    fn open(&self, name: &str) -> io::Result<EntryReader<'_>> {
        let path = self.resolve(name)?;
        if path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{name} is a directory"),
            ));
        }
        Ok(Box::new(File::open(path)?))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
