//! Test fixtures and utilities for reducing test setup duplication.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::BundleFixture;
//!
//! #[test]
//! fn my_test() {
//!     let bundle = BundleFixture::new();
//!     bundle.add_entry("version.txt", "rev1");
//!     bundle.add_native("libfoo.so", "elf");
//!     let store = bundle.store();
//! }
//! ```

#![allow(clippy::expect_used)]

use std::cell::RefCell;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::bootstrap::InstallationOutcome;
use crate::installer::ArchiveDecoder;
use crate::progress::ProgressReporter;
use crate::store::DirStore;

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// A package store, install directory and native directory under one temp dir.
///
/// Layout:
/// - `store/module/` bundle root
/// - `install/` writable install directory (created)
/// - `native/` native resource directory (created)
pub struct BundleFixture {
    temp: TempDir,
}

impl BundleFixture {
    /// # Panics
    ///
    /// Panics if any directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let temp = create_temp_dir();
        for dir in ["store/module", "install", "native"] {
            std::fs::create_dir_all(temp.path().join(dir)).expect("Failed to create fixture dir");
        }
        Self { temp }
    }

    /// Root of the directory store (holds `module/`)
    pub fn store_path(&self) -> PathBuf {
        self.temp.path().join("store")
    }

    pub fn store(&self) -> DirStore {
        DirStore::new(self.store_path())
    }

    pub fn install_dir(&self) -> PathBuf {
        self.temp.path().join("install")
    }

    pub fn native_dir(&self) -> PathBuf {
        self.temp.path().join("native")
    }

    /// Write a text entry under the bundle root
    pub fn add_entry(&self, name: &str, content: &str) {
        self.add_bytes(name, content.as_bytes());
    }

    /// Write a binary entry under the bundle root
    pub fn add_bytes(&self, name: &str, content: &[u8]) {
        let path = self.temp.path().join("store/module").join(name);
        std::fs::write(path, content).expect("Failed to write bundle entry");
    }

    /// Write a file into the native resource directory
    pub fn add_native(&self, name: &str, content: &str) {
        std::fs::write(self.native_dir().join(name), content).expect("Failed to write native file");
    }

    /// Record `token` as the installed revision
    pub fn write_marker(&self, token: &str) {
        std::fs::write(self.install_dir().join("INSTALLED_VERSION"), token)
            .expect("Failed to write marker");
    }

    /// Installed revision, if the marker exists
    pub fn read_marker(&self) -> Option<String> {
        std::fs::read_to_string(self.install_dir().join("INSTALLED_VERSION")).ok()
    }
}

impl Default for BundleFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an in-memory zip archive from `(name, content)` pairs
///
/// # Panics
///
/// Panics if the archive cannot be written.
#[must_use]
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, zip::write::FileOptions::default())
            .expect("Failed to start zip entry");
        writer.write_all(content).expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish zip").into_inner()
}

/// Write a zip archive to `path`
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    std::fs::write(path, zip_bytes(entries)).expect("Failed to write zip file");
}

/// Build an in-memory 7z archive from `(name, content)` pairs.
///
/// Names may contain `/` to place files in subdirectories.
///
/// # Panics
///
/// Panics if the source tree or the archive cannot be written.
#[must_use]
pub fn sevenz_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let source = create_temp_dir();
    for (name, content) in entries {
        let path = source.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create 7z source dir");
        }
        std::fs::write(path, content).expect("Failed to write 7z source file");
    }
    sevenz_rust::compress(source.path(), Cursor::new(Vec::new()))
        .expect("Failed to build 7z archive")
        .into_inner()
}

/// Decoder standing in for the real extractor.
///
/// With status 0 it writes the received bytes to `<dest>/payload.out`.
pub struct FakeDecoder {
    status: i32,
}

impl FakeDecoder {
    #[must_use]
    pub fn succeeding() -> Self {
        Self { status: 0 }
    }

    #[must_use]
    pub fn with_status(status: i32) -> Self {
        Self { status }
    }
}

impl ArchiveDecoder for FakeDecoder {
    fn name(&self) -> &str {
        "fake"
    }

    fn decode(&self, source: &mut dyn Read, dest: &Path) -> std::io::Result<i32> {
        let mut content = Vec::new();
        source.read_to_end(&mut content)?;
        if self.status == 0 {
            std::fs::write(dest.join("payload.out"), content)?;
        }
        Ok(self.status)
    }
}

/// Progress reporter that records the events it receives
#[derive(Default)]
pub struct RecordingProgress {
    events: RefCell<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn on_start(&self) {
        self.events.borrow_mut().push("start".to_string());
    }

    fn on_finish(&self, outcome: &InstallationOutcome) {
        self.events
            .borrow_mut()
            .push(format!("finish:{}", outcome.success));
    }
}
