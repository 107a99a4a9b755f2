//! Recording metadata returned by listings.

use serde::{Deserialize, Serialize};

/// Metadata of one recording file, captured when the device directory was
/// listed.
///
/// Serialized as `{"fileName", "size", "lastModified"}`, the shape web
/// clients already consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingFile {
    /// Base name of the file, without directory components.
    #[serde(rename = "fileName")]
    pub file_name: String,

    /// File size in bytes, `0` if it could not be read.
    #[serde(rename = "size")]
    pub size_bytes: u64,

    /// Last modification time in milliseconds since the Unix epoch, `0` if it
    /// could not be read.
    #[serde(rename = "lastModified")]
    pub last_modified_millis: i64,
}
