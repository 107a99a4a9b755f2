//! Domains module containing business logic organized by bounded contexts.
//!
//! - **recordings**: discovery, lookup and streaming of device recordings
//! - **devices**: caller authentication and device ownership

pub mod devices;
pub mod recordings;
