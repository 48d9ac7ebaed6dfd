//! Archive installer
//!
//! Archive entries are handed to a decoder together with the destination
//! directory. Decoders report an integer status where 0 means success; any
//! other status, or an I/O error while feeding the decoder, fails the whole
//! installation pass.

use std::io::{self, Cursor, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;
use zip::ZipArchive;

use crate::config::{BootConfig, DecoderKind};
use crate::error::{BootError, Result};
use crate::store::PackageStore;

/// Status reported by a decoder on success
pub const DECODE_OK: i32 = 0;

/// Status reported by the in-process decoders when the container is invalid
pub const DECODE_CORRUPT: i32 = 1;

/// Extracts a compressed container into a directory
pub trait ArchiveDecoder {
    fn name(&self) -> &str;

    /// Decode `source` into `dest`, returning the decoder status
    fn decode(&self, source: &mut dyn Read, dest: &Path) -> io::Result<i32>;
}

/// In-process 7z extraction
#[derive(Debug, Default, Clone, Copy)]
pub struct SevenZipDecoder;

impl ArchiveDecoder for SevenZipDecoder {
    fn name(&self) -> &str {
        "sevenzip"
    }

    fn decode(&self, source: &mut dyn Read, dest: &Path) -> io::Result<i32> {
        let mut buffer = Vec::new();
        source.read_to_end(&mut buffer)?;

        match sevenz_rust::decompress(Cursor::new(buffer), dest) {
            Ok(()) => Ok(DECODE_OK),
            Err(e) => {
                tracing::error!("Error extracting 7z archive: {e}");
                Ok(DECODE_CORRUPT)
            }
        }
    }
}

/// In-process zip extraction
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipDecoder;

impl ArchiveDecoder for ZipDecoder {
    fn name(&self) -> &str {
        "zip"
    }

    fn decode(&self, source: &mut dyn Read, dest: &Path) -> io::Result<i32> {
        let mut buffer = Vec::new();
        source.read_to_end(&mut buffer)?;

        let extracted = ZipArchive::new(Cursor::new(buffer)).and_then(|mut archive| {
            let files = archive.len();
            archive.extract(dest).map(|()| files)
        });
        match extracted {
            Ok(files) => {
                tracing::debug!("Extracted {files} zip entries into {}", dest.display());
                Ok(DECODE_OK)
            }
            Err(e) => {
                tracing::error!("Error extracting zip archive: {e}");
                Ok(DECODE_CORRUPT)
            }
        }
    }
}

/// Runs an external extractor (`<program> x -y -o<dest> <file>`)
///
/// The entry is spooled to a temporary file first; the program's exit code is
/// the decoder status.
#[derive(Debug, Clone)]
pub struct CommandDecoder {
    program: String,
}

impl CommandDecoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ArchiveDecoder for CommandDecoder {
    fn name(&self) -> &str {
        &self.program
    }

    fn decode(&self, source: &mut dyn Read, dest: &Path) -> io::Result<i32> {
        let mut spool = NamedTempFile::new()?;
        io::copy(source, &mut spool)?;
        spool.flush()?;

        let output = Command::new(&self.program)
            .arg("x")
            .arg("-y")
            .arg(format!("-o{}", dest.display()))
            .arg(spool.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()?;

        // Killed by a signal: no exit code
        let status = output.status.code().unwrap_or(-1);
        if status != DECODE_OK {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!("{} exited with {status}: {}", self.program, stderr.trim());
        }
        Ok(status)
    }
}

/// Decoders keyed by entry suffix
#[derive(Default)]
pub struct DecoderRegistry {
    decoders: Vec<(String, Box<dyn ArchiveDecoder>)>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding one decoder per configured archive rule
    pub fn from_config(config: &BootConfig) -> Self {
        let mut registry = Self::new();
        for rule in &config.archives {
            let decoder: Box<dyn ArchiveDecoder> = match rule.decoder {
                DecoderKind::SevenZip => Box::new(SevenZipDecoder),
                DecoderKind::Zip => Box::new(ZipDecoder),
                DecoderKind::Command => {
                    Box::new(CommandDecoder::new(rule.program.clone().unwrap_or_default()))
                }
            };
            registry.register(rule.suffix.clone(), decoder);
        }
        registry
    }

    /// Register `decoder` for entries ending in `suffix`
    pub fn register(&mut self, suffix: impl Into<String>, decoder: Box<dyn ArchiveDecoder>) {
        self.decoders.push((suffix.into(), decoder));
    }

    /// Decoder for `name`; the longest matching suffix wins
    pub fn for_entry(&self, name: &str) -> Option<&dyn ArchiveDecoder> {
        self.decoders
            .iter()
            .filter(|(suffix, _)| name.ends_with(suffix.as_str()))
            .max_by_key(|(suffix, _)| suffix.len())
            .map(|(_, decoder)| &**decoder)
    }
}

/// Extract the archive entry `entry_path` into `dest_dir`
pub fn install_archive(
    store: &dyn PackageStore,
    entry_path: &str,
    dest_dir: &Path,
    decoders: &DecoderRegistry,
) -> Result<()> {
    let open_failed = |reason: String| BootError::ArchiveOpenFailed {
        entry: entry_path.to_string(),
        reason,
    };

    let decoder = decoders
        .for_entry(entry_path)
        .ok_or_else(|| open_failed("no decoder registered for this suffix".to_string()))?;

    tracing::debug!("Uncompressing {entry_path} with {}", decoder.name());
    let mut reader = store.open(entry_path).map_err(|e| open_failed(e.to_string()))?;

    match decoder.decode(&mut reader, dest_dir) {
        Ok(DECODE_OK) => Ok(()),
        Ok(status) => Err(BootError::ArchiveDecodeFailed {
            entry: entry_path.to_string(),
            status,
        }),
        Err(e) => Err(open_failed(e.to_string())),
    }
}
