//! File system errors

use std::path::Path;

use super::BootError;

/// Creates a write failure for `path`
pub fn write_failed(path: &Path, err: &std::io::Error) -> BootError {
    BootError::FileWriteFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
