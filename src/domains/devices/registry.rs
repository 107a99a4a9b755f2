//! Caller authentication and device ownership lookup.
//!
//! The recordings domain performs no authorization itself. Handlers call
//! [`authorize_device`] first, which resolves the caller from a bearer token
//! and checks that the requested device is bound to the caller under the
//! requested agent.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use super::error::DeviceError;
use super::models::{Device, UserIdentity};

/// Resolves an access token to a caller identity.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Option<UserIdentity>;
}

/// Looks up the devices a user owns under one agent.
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    async fn user_devices(&self, user_id: u64, agent_id: &str) -> Vec<Device>;
}

/// Whether `device_id` is one of `devices`.
pub fn is_device_owned(devices: &[Device], device_id: &str) -> bool {
    devices.iter().any(|d| d.matches(device_id))
}

/// Authenticates the caller and checks ownership of `device_id` under `agent_id`.
///
/// # Returns
///
/// * `Ok(UserIdentity)` - The caller, who owns the device
/// * `Err(DeviceError::Unauthenticated)` - If the token is missing or unknown
/// * `Err(DeviceError::NotOwned)` - If the device is not bound to the caller
pub async fn authorize_device(
    authenticator: &dyn Authenticator,
    registry: &dyn DeviceRegistry,
    token: Option<&str>,
    agent_id: &str,
    device_id: &str,
) -> Result<UserIdentity, DeviceError> {
    let token = token.ok_or(DeviceError::Unauthenticated)?;
    let user = authenticator
        .authenticate(token)
        .await
        .ok_or(DeviceError::Unauthenticated)?;

    let devices = registry.user_devices(user.id, agent_id).await;
    if !is_device_owned(&devices, device_id) {
        debug!(user = user.id, agent_id, device_id, "device not owned by caller");
        return Err(DeviceError::not_owned(agent_id, device_id));
    }

    Ok(user)
}

// ============================================================================
// File-backed registry
// ============================================================================

#[derive(Deserialize)]
struct RegistryFile {
    #[serde(default)]
    users: Vec<UserRecord>,
}

#[derive(Deserialize)]
struct UserRecord {
    id: u64,
    name: String,
    token: String,
    #[serde(default)]
    devices: Vec<Device>,
}

struct UserEntry {
    identity: UserIdentity,
    devices: Vec<Device>,
}

/// Registry loaded from a JSON file of the form
///
/// ```json
/// {"users": [{"id": 1, "name": "alice", "token": "s3cret",
///             "devices": [{"agentId": "agent-1", "macAddress": "AA:BB:CC"}]}]}
/// ```
///
/// Implements both [`Authenticator`] and [`DeviceRegistry`].
#[derive(Default)]
pub struct FileDeviceRegistry {
    /// Key: access token
    tokens: HashMap<String, u64>,
    users: HashMap<u64, UserEntry>,
}

/// Custom Debug implementation to redact tokens from logs.
impl std::fmt::Debug for FileDeviceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tokens = format!("[{} REDACTED]", self.tokens.len());
        f.debug_struct("FileDeviceRegistry")
            .field("tokens", &tokens)
            .field("users", &self.users.len())
            .finish()
    }
}

impl FileDeviceRegistry {
    /// An empty registry that authorizes nobody.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the registry from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DeviceError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DeviceError::RegistryIo {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json(&raw).map_err(|source| DeviceError::RegistryFormat {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            users = registry.users.len(),
            "device registry loaded"
        );
        Ok(registry)
    }

    /// Parse a registry from JSON text.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let file: RegistryFile = serde_json::from_str(raw)?;
        let mut registry = Self::default();
        for user in file.users {
            registry.insert(
                UserIdentity {
                    id: user.id,
                    name: user.name,
                },
                user.token,
                user.devices,
            );
        }
        Ok(registry)
    }

    /// Register a user with an access token and owned devices.
    pub fn insert(
        &mut self,
        identity: UserIdentity,
        token: impl Into<String>,
        devices: Vec<Device>,
    ) {
        self.tokens.insert(token.into(), identity.id);
        self.users.insert(identity.id, UserEntry { identity, devices });
    }
}

#[async_trait]
impl Authenticator for FileDeviceRegistry {
    async fn authenticate(&self, token: &str) -> Option<UserIdentity> {
        let id = self.tokens.get(token)?;
        self.users.get(id).map(|u| u.identity.clone())
    }
}

#[async_trait]
impl DeviceRegistry for FileDeviceRegistry {
    async fn user_devices(&self, user_id: u64, agent_id: &str) -> Vec<Device> {
        self.users
            .get(&user_id)
            .map(|u| {
                u.devices
                    .iter()
                    .filter(|d| d.agent_id == agent_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const REGISTRY_JSON: &str = r#"{
        "users": [
            {
                "id": 1,
                "name": "alice",
                "token": "alice-token",
                "devices": [
                    {"agentId": "agent-1", "macAddress": "AA:BB:CC:DD:EE:FF"},
                    {"agentId": "agent-2", "macAddress": "11:22:33:44:55:66"}
                ]
            },
            {"id": 2, "name": "bob", "token": "bob-token"}
        ]
    }"#;

    fn registry() -> FileDeviceRegistry {
        FileDeviceRegistry::from_json(REGISTRY_JSON).unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_known_token() {
        let registry = registry();
        let user = registry.authenticate("alice-token").await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "alice");
        assert!(registry.authenticate("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_user_devices_filtered_by_agent() {
        let registry = registry();
        let devices = registry.user_devices(1, "agent-1").await;
        assert_eq!(devices, vec![Device::new("agent-1", "AA:BB:CC:DD:EE:FF")]);
        assert!(registry.user_devices(2, "agent-1").await.is_empty());
        assert!(registry.user_devices(99, "agent-1").await.is_empty());
    }

    #[tokio::test]
    async fn test_authorize_matches_mac_case_insensitively() {
        let registry = registry();
        let user = authorize_device(
            &registry,
            &registry,
            Some("alice-token"),
            "agent-1",
            "aa:bb:cc:dd:ee:ff",
        )
        .await
        .unwrap();
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn test_authorize_rejects_other_agent() {
        let registry = registry();
        let result = authorize_device(
            &registry,
            &registry,
            Some("alice-token"),
            "agent-1",
            "11:22:33:44:55:66",
        )
        .await;
        assert!(matches!(result, Err(DeviceError::NotOwned { .. })));
    }

    #[tokio::test]
    async fn test_authorize_rejects_missing_token() {
        let registry = registry();
        let mac = "AA:BB:CC:DD:EE:FF";
        let result = authorize_device(&registry, &registry, None, "agent-1", mac).await;
        assert!(matches!(result, Err(DeviceError::Unauthenticated)));

        let result = authorize_device(&registry, &registry, Some("bad"), "agent-1", mac).await;
        assert!(result.unwrap_err().is_unauthorized());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("devices.json");
        fs::write(&path, REGISTRY_JSON).unwrap();

        let registry = FileDeviceRegistry::load(&path).unwrap();
        assert_eq!(registry.users.len(), 2);
    }

    #[test]
    fn test_load_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            FileDeviceRegistry::load(&missing),
            Err(DeviceError::RegistryIo { .. })
        ));

        let broken = temp_dir.path().join("broken.json");
        fs::write(&broken, "{not json").unwrap();
        assert!(matches!(
            FileDeviceRegistry::load(&broken),
            Err(DeviceError::RegistryFormat { .. })
        ));
    }

    #[test]
    fn test_tokens_redacted_in_debug() {
        let debug_str = format!("{:?}", registry());
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("alice-token"));
    }
}
