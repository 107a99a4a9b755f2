//! Recordings domain module.
//!
//! Lists and serves the audio files recorded for each device.
//!
//! ## Architecture
//!
//! - `repository.rs` - Directory walks, metadata, ordering and lookup
//! - `handle.rs` - Validated file handles and open streams
//! - `range.rs` - `Range` header parsing
//! - `handlers.rs` - axum handlers for the HTTP routes

mod error;
pub mod handlers;
mod handle;
mod models;
mod range;
mod repository;

pub use error::RecordingError;
pub use handle::{RecordingHandle, RecordingStream};
pub use models::RecordingFile;
pub use range::{ByteRange, RangeRequest, parse_range};
pub use repository::RecordingRepository;
