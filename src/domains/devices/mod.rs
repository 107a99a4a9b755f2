//! Devices domain module.
//!
//! Answers one question for the HTTP layer: may this caller see the
//! recordings of this device? Callers are identified by a bearer token and
//! own devices per agent.
//!
//! ## Architecture
//!
//! - `models.rs` - `UserIdentity` and `Device`
//! - `registry.rs` - `Authenticator` / `DeviceRegistry` traits, the JSON-file
//!   registry and `authorize_device`

mod error;
mod models;
mod registry;

pub use error::DeviceError;
pub use models::{Device, UserIdentity};
pub use registry::{
    Authenticator, DeviceRegistry, FileDeviceRegistry, authorize_device, is_device_owned,
};
