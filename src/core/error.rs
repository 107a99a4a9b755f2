//! Error types and handling for the recordings server.
//!
//! This module defines a unified error type for startup failures.
//! Per-request recording lookups never produce it; they degrade to
//! "not found" or an empty listing inside the recordings domain.

use thiserror::Error;

/// A specialized Result type for server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the recordings server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the devices domain.
    #[error("Device registry error: {0}")]
    Device(#[from] crate::domains::devices::DeviceError),
}

