//! Transport layer for the recordings server.
//!
//! The server speaks plain HTTP. This module holds the listener
//! configuration, transport errors and the axum router.

mod config;
mod error;

pub mod http;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use http::{HttpTransport, build_router};
