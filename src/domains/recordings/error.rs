//! Recording lookup error types.
//!
//! These reasons are logged but never reach HTTP clients: every one of them
//! is answered as "not found" (or an empty listing).

use std::path::PathBuf;
use thiserror::Error;

use crate::core::security::PathSecurityError;

/// Reasons a recording lookup or listing can fail.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// The requested file name is not on the allow-list.
    #[error("Rejected file name: {0:?}")]
    InvalidFileName(String),

    /// The device has no storage directory.
    #[error("Device directory does not exist: '{}'", .0.display())]
    DeviceRootMissing(PathBuf),

    /// No file with that name exists under the device directory.
    #[error("Recording not found: {0}")]
    FileNotFound(String),

    /// A discovered path failed the confinement re-check.
    #[error("Confinement check failed: {0}")]
    Confinement(#[from] PathSecurityError),

    /// An I/O error occurred while walking the directory tree.
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RecordingError {
    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
