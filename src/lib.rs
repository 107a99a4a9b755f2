//! Device Recordings Server Library
//!
//! This crate serves the audio recordings captured for each device: it lists
//! the recording files stored under a device's directory and streams a single
//! file to an authorized web client.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, path security, server state and
//!   the HTTP transport
//! - **domains**: Business logic organized by bounded contexts
//!   - **recordings**: Recording discovery, lookup and streaming
//!   - **devices**: Caller authentication and device ownership
//!
//! # Example
//!
//! ```rust,no_run
//! use device_recordings_server::core::{Config, HttpTransport, RecordingServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = HttpTransport::new(config.http.clone());
//!     let server = RecordingServer::new(config)?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use crate::core::{Config, Error, RecordingServer, Result};
pub use domains::recordings::{RecordingFile, RecordingRepository};
