//! Device-authorization error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while authorizing access to a device.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// No valid bearer token accompanied the request.
    #[error("Missing or unknown access token")]
    Unauthenticated,

    /// The caller does not own the requested device under that agent.
    #[error("Device '{device_id}' is not bound to agent '{agent_id}' for this user")]
    NotOwned { agent_id: String, device_id: String },

    /// The registry file could not be read.
    #[error("Cannot read device registry '{path}': {source}")]
    RegistryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The registry file is not valid JSON or has the wrong shape.
    #[error("Invalid device registry '{path}': {source}")]
    RegistryFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DeviceError {
    /// Create a new "not owned" error.
    pub fn not_owned(agent_id: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self::NotOwned {
            agent_id: agent_id.into(),
            device_id: device_id.into(),
        }
    }

    /// Whether the error means the caller must be answered with 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::NotOwned { .. })
    }
}
