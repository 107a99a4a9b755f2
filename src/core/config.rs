//! Configuration management for the recordings server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults. The configuration is
//! loaded once at startup and is immutable afterwards.

use super::transport::HttpConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Main configuration structure for the recordings server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP listener configuration.
    pub http: HttpConfig,

    /// Recording storage configuration.
    pub recordings: RecordingsConfig,

    /// Device ownership registry configuration.
    pub registry: RegistryConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported by the health endpoint.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for recording storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingsConfig {
    /// Base directory holding one subdirectory per device.
    pub base_dir: PathBuf,

    /// Required file extension of recordings, without the leading dot.
    /// The file-name allow-list is derived from it.
    pub extension: String,

    /// Content type sent when streaming a recording.
    pub content_type: String,

    /// Whether symlinked recording files are served.
    /// Their targets must still resolve inside the device directory.
    pub allow_symlinks: bool,
}

/// Configuration for the device ownership registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// JSON file listing users, their tokens and their devices.
    /// Without it no request is authorized.
    pub path: Option<PathBuf>,
}

impl Default for RecordingsConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("/recordings"),
            extension: "mp3".to_string(),
            content_type: "audio/mpeg".to_string(),
            allow_symlinks: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "device-recordings".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            http: HttpConfig::default(),
            recordings: RecordingsConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    /// Variables are prefixed with `RECORDINGS_`, for example
    /// `RECORDINGS_BASE_DIR` or `RECORDINGS_HTTP_PORT`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("RECORDINGS_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("RECORDINGS_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.http = HttpConfig::from_env();

        if let Ok(base_dir) = std::env::var("RECORDINGS_BASE_DIR") {
            config.recordings.base_dir = PathBuf::from(base_dir);
        }

        if let Ok(extension) = std::env::var("RECORDINGS_EXTENSION") {
            let extension = extension.trim().trim_start_matches('.');
            if extension.is_empty() {
                warn!("RECORDINGS_EXTENSION is empty, keeping '{}'", config.recordings.extension);
            } else {
                config.recordings.extension = extension.to_string();
            }
        }

        if let Ok(content_type) = std::env::var("RECORDINGS_CONTENT_TYPE") {
            config.recordings.content_type = content_type;
        }

        if let Ok(allow_symlinks) = std::env::var("RECORDINGS_ALLOW_SYMLINKS") {
            config.recordings.allow_symlinks = allow_symlinks.parse().unwrap_or(true);
            info!("Symlinked recordings allowed: {}", config.recordings.allow_symlinks);
        }

        if let Ok(path) = std::env::var("RECORDINGS_DEVICE_REGISTRY") {
            config.registry.path = Some(PathBuf::from(path));
        } else {
            warn!(
                "RECORDINGS_DEVICE_REGISTRY not set - no device registry loaded. \
                 Every recording request will be rejected as unauthorized."
            );
        }

        config
    }
}
