//! Device and caller identity types.

use serde::{Deserialize, Serialize};

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: u64,
    pub name: String,
}

/// A device bound to an agent, identified by its hardware address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub agent_id: String,
    pub mac_address: String,
}

impl Device {
    pub fn new(agent_id: impl Into<String>, mac_address: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            mac_address: mac_address.into(),
        }
    }

    /// Whether `device_id` names this device. Hardware addresses compare
    /// case-insensitively.
    pub fn matches(&self, device_id: &str) -> bool {
        self.mac_address.eq_ignore_ascii_case(device_id)
    }
}
