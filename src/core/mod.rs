//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the recordings
//! server, including error handling, configuration, path security, server
//! state and the HTTP transport.

pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use security::PathSecurityError;
pub use server::RecordingServer;
pub use transport::{HttpConfig, HttpTransport};
