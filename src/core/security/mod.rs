// Security module for path resolution and confinement
//
// Untrusted device identifiers and file names are turned into paths that
// cannot leave the configured recordings directory.

pub mod path_resolver;

pub use path_resolver::{
    confine, device_root, normalize, sanitize_identifier, validate_file_name, PathSecurityError,
    FALLBACK_IDENTIFIER,
};
