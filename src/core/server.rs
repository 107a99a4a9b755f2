//! Recordings server state and lifecycle.
//!
//! `RecordingServer` ties the configuration, the recording repository and the
//! authorization collaborators together. It is cheap to clone and is handed
//! to every HTTP handler as axum state.

use std::sync::Arc;
use tracing::{info, warn};

use super::config::Config;
use super::error::Result;
use crate::domains::devices::{
    Authenticator, DeviceError, DeviceRegistry, FileDeviceRegistry, UserIdentity, authorize_device,
};
use crate::domains::recordings::RecordingRepository;

/// Shared server state.
#[derive(Clone)]
pub struct RecordingServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Read-only access to recording files.
    repository: Arc<RecordingRepository>,

    /// Resolves bearer tokens to callers.
    authenticator: Arc<dyn Authenticator>,

    /// Looks up which devices a caller owns.
    devices: Arc<dyn DeviceRegistry>,
}

impl RecordingServer {
    /// Create a server, loading the device registry named in the configuration.
    pub fn new(config: Config) -> Result<Self> {
        let registry = match &config.registry.path {
            Some(path) => FileDeviceRegistry::load(path)?,
            None => {
                warn!("No device registry configured, all requests will be unauthorized");
                FileDeviceRegistry::empty()
            }
        };

        Ok(Self::with_registry(config, Arc::new(registry)))
    }

    /// Create a server around an existing registry.
    pub fn with_registry<R>(config: Config, registry: Arc<R>) -> Self
    where
        R: Authenticator + DeviceRegistry + 'static,
    {
        let repository = Arc::new(RecordingRepository::new(config.recordings.clone()));

        info!(
            base_dir = %config.recordings.base_dir.display(),
            extension = %config.recordings.extension,
            "Recording repository ready"
        );

        Self {
            config: Arc::new(config),
            repository,
            authenticator: registry.clone(),
            devices: registry,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the recording repository.
    pub fn repository(&self) -> &Arc<RecordingRepository> {
        &self.repository
    }

    /// Check that the caller holding `token` owns `device_id` under `agent_id`.
    pub async fn authorize(
        &self,
        token: Option<&str>,
        agent_id: &str,
        device_id: &str,
    ) -> std::result::Result<UserIdentity, DeviceError> {
        authorize_device(
            self.authenticator.as_ref(),
            self.devices.as_ref(),
            token,
            agent_id,
            device_id,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::devices::Device;
    use std::path::PathBuf;

    fn server() -> RecordingServer {
        let mut registry = FileDeviceRegistry::empty();
        registry.insert(
            UserIdentity {
                id: 7,
                name: "carol".to_string(),
            },
            "carol-token",
            vec![Device::new("agent", "AA:BB:CC")],
        );
        RecordingServer::with_registry(Config::default(), Arc::new(registry))
    }

    #[tokio::test]
    async fn test_authorize_through_server() {
        let server = server();
        let user = server
            .authorize(Some("carol-token"), "agent", "aa:bb:cc")
            .await
            .unwrap();
        assert_eq!(user.id, 7);
        assert!(server.authorize(None, "agent", "AA:BB:CC").await.is_err());
    }

    #[test]
    fn test_missing_registry_file_fails() {
        let mut config = Config::default();
        config.registry.path = Some(PathBuf::from("/nonexistent/devices-12345.json"));
        assert!(RecordingServer::new(config).is_err());
    }

    #[test]
    fn test_without_registry_path_starts_empty() {
        let server = RecordingServer::new(Config::default()).unwrap();
        assert_eq!(server.name(), "device-recordings");
        assert_eq!(server.repository().base_dir(), PathBuf::from("/recordings"));
    }
}
