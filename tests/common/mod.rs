//! Common test utilities for assetboot integration tests

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A package store, install directory and native directory under one temp dir
pub struct TestEnv {
    pub temp: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        for dir in ["store/module", "native"] {
            std::fs::create_dir_all(temp.path().join(dir)).expect("Failed to create directory");
        }
        Self { temp }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.temp.path().join("store")
    }

    pub fn install_dir(&self) -> PathBuf {
        self.temp.path().join("install")
    }

    pub fn native_dir(&self) -> PathBuf {
        self.temp.path().join("native")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    /// Write an entry under the bundle root
    pub fn write_entry(&self, name: &str, content: impl AsRef<[u8]>) {
        std::fs::write(self.store_dir().join("module").join(name), content)
            .expect("Failed to write bundle entry");
    }

    /// Write a file into the native resource directory
    pub fn write_native(&self, name: &str, content: &str) {
        std::fs::write(self.native_dir().join(name), content).expect("Failed to write native file");
    }

    /// Write a file relative to the temp root
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn installed(&self, name: &str) -> PathBuf {
        self.install_dir().join(name)
    }

    pub fn read_installed(&self, name: &str) -> String {
        std::fs::read_to_string(self.installed(name)).expect("Failed to read installed file")
    }

    pub fn marker(&self) -> Option<String> {
        std::fs::read_to_string(self.installed("INSTALLED_VERSION")).ok()
    }

    /// The binary with store and directories pointed at this environment
    pub fn cmd(&self) -> Command {
        let mut cmd = assetboot_cmd();
        cmd.arg("--store")
            .arg(self.store_dir())
            .arg("--install-dir")
            .arg(self.install_dir())
            .arg("--native-dir")
            .arg(self.native_dir());
        cmd
    }
}

/// The binary with a clean environment
pub fn assetboot_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_assetboot"));
    for var in [
        "ASSETBOOT_STORE",
        "ASSETBOOT_INSTALL_DIR",
        "ASSETBOOT_NATIVE_DIR",
        "ASSETBOOT_CONFIG",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Write a zip archive to `path` from `(name, content)` pairs
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).expect("Failed to create zip");
    let mut writer = zip::ZipWriter::new(file);
    for (name, content) in entries {
        writer
            .start_file(*name, zip::write::FileOptions::default())
            .expect("Failed to start zip entry");
        writer.write_all(content).expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish zip");
}

/// Build a 7z archive in memory from `(name, content)` pairs
pub fn sevenz_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let source = TempDir::new().expect("Failed to create temp directory");
    for (name, content) in entries {
        let path = source.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directory");
        }
        std::fs::write(path, content).expect("Failed to write 7z source file");
    }
    sevenz_rust::compress(source.path(), std::io::Cursor::new(Vec::new()))
        .expect("Failed to build 7z archive")
        .into_inner()
}
