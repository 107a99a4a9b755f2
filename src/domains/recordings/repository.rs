//! Recording discovery and lookup.
//!
//! Recordings live under `<base_dir>/<sanitized device id>/`, usually in
//! date-named subfolders. The repository walks that tree on every call; it
//! keeps no state besides its configuration, so one instance can serve any
//! number of concurrent requests. All filesystem work is blocking and should
//! run on a blocking worker.

use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tracing::{debug, instrument, warn};

use super::error::RecordingError;
use super::handle::RecordingHandle;
use super::models::RecordingFile;
use crate::core::config::RecordingsConfig;
use crate::core::security::{confine, device_root, validate_file_name};

/// Read-only view of the recordings stored for each device.
#[derive(Debug, Clone)]
pub struct RecordingRepository {
    config: RecordingsConfig,
}

impl RecordingRepository {
    pub fn new(config: RecordingsConfig) -> Self {
        Self { config }
    }

    /// Directory holding all device directories.
    pub fn base_dir(&self) -> &Path {
        &self.config.base_dir
    }

    /// Storage directory of `device_id`.
    pub fn device_root(&self, device_id: &str) -> PathBuf {
        device_root(&self.config.base_dir, Some(device_id))
    }

    /// Verify the base directory exists and can be listed.
    ///
    /// This is the one storage failure that is reported instead of being
    /// treated as "no recordings".
    pub fn check_base_dir(&self) -> Result<(), RecordingError> {
        let base = &self.config.base_dir;
        fs::read_dir(base)
            .map(|_| ())
            .map_err(|e| RecordingError::io(base, e))
    }

    /// List the recordings of a device, most recently modified first.
    ///
    /// A missing device directory, or one that cannot be walked, yields an
    /// empty list. A file whose metadata cannot be read is still listed,
    /// with size and time `0`.
    #[instrument(skip(self))]
    pub fn list_recordings(&self, device_id: &str) -> Vec<RecordingFile> {
        let root = self.device_root(device_id);
        if !root.exists() {
            debug!(root = %root.display(), "no recordings directory");
            return Vec::new();
        }

        match self.try_list(&root) {
            Ok(files) => {
                debug!(count = files.len(), "listed recordings");
                files
            }
            Err(e) => {
                warn!(root = %root.display(), error = %e, "recording walk failed, reporting none");
                Vec::new()
            }
        }
    }

    /// Find the recording called `file_name` anywhere under the device
    /// directory.
    ///
    /// Every failure (rejected name, missing directory, no such file, walk
    /// error, failed confinement check) is reported as `None`.
    #[instrument(skip(self))]
    pub fn resolve_recording(&self, device_id: &str, file_name: &str) -> Option<RecordingHandle> {
        match self.locate(device_id, file_name) {
            Ok(path) => Some(RecordingHandle::new(path)),
            Err(e @ RecordingError::Io { .. }) | Err(e @ RecordingError::Confinement(_)) => {
                warn!(error = %e, "recording lookup failed");
                None
            }
            Err(e) => {
                debug!(error = %e, "recording not resolved");
                None
            }
        }
    }

    fn try_list(&self, root: &Path) -> Result<Vec<RecordingFile>, RecordingError> {
        let paths = self.walk(root)?;
        Ok(summarize(paths, &self.config.extension))
    }

    fn locate(&self, device_id: &str, file_name: &str) -> Result<PathBuf, RecordingError> {
        if !validate_file_name(file_name, &self.config.extension) {
            return Err(RecordingError::InvalidFileName(file_name.to_string()));
        }

        let root = self.device_root(device_id);
        if !root.is_dir() {
            return Err(RecordingError::DeviceRootMissing(root));
        }

        let wanted = OsStr::new(file_name);
        let mut matches = self
            .walk(&root)?
            .into_iter()
            .filter(|path| path.file_name() == Some(wanted));

        let found = matches
            .next()
            .ok_or_else(|| RecordingError::FileNotFound(file_name.to_string()))?;

        let duplicates = matches.count();
        if duplicates > 0 {
            warn!(
                file_name,
                duplicates,
                chosen = %found.display(),
                "several recordings share this name, serving the first in walk order"
            );
        }

        Ok(confine(&root, &found)?)
    }

    /// Collect every regular file under `root`, depth first, entries of each
    /// directory in file-name order. Directory symlinks are not followed;
    /// file symlinks are kept only when allowed and their target resolves
    /// inside `root`.
    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, RecordingError> {
        let canonical_root = if self.config.allow_symlinks {
            Some(fs::canonicalize(root).map_err(|e| RecordingError::io(root, e))?)
        } else {
            None
        };

        let mut files = Vec::new();
        walk_dir(root, canonical_root.as_deref(), &mut files)?;
        Ok(files)
    }
}

fn walk_dir(
    dir: &Path,
    canonical_root: Option<&Path>,
    files: &mut Vec<PathBuf>,
) -> Result<(), RecordingError> {
    let mut entries = fs::read_dir(dir)
        .and_then(|entries| entries.collect::<Result<Vec<_>, _>>())
        .map_err(|e| RecordingError::io(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping entry with unreadable type");
                continue;
            }
        };

        if file_type.is_dir() {
            walk_dir(&path, canonical_root, files)?;
        } else if file_type.is_file() {
            files.push(path);
        } else if file_type.is_symlink() {
            if let Some(root) = canonical_root {
                if symlinked_file_within(&path, root) {
                    files.push(path);
                } else {
                    debug!(path = %path.display(), "skipping symlink leaving the device directory");
                }
            }
        }
    }
    Ok(())
}

fn symlinked_file_within(link: &Path, canonical_root: &Path) -> bool {
    match fs::canonicalize(link) {
        Ok(target) => target.starts_with(canonical_root) && target.is_file(),
        Err(_) => false,
    }
}

/// Keep the paths ending in `.extension` (any case) and describe them,
/// most recently modified first.
fn summarize(paths: Vec<PathBuf>, extension: &str) -> Vec<RecordingFile> {
    let suffix = format!(".{}", extension.to_lowercase());

    let mut files: Vec<RecordingFile> = paths
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            name.to_lowercase()
                .ends_with(&suffix)
                .then(|| describe(&path, name))
        })
        .collect();

    // Stable: equal timestamps keep walk order.
    files.sort_by(|a, b| b.last_modified_millis.cmp(&a.last_modified_millis));
    files
}

fn describe(path: &Path, file_name: String) -> RecordingFile {
    let metadata = fs::metadata(path);
    if let Err(e) = &metadata {
        warn!(path = %path.display(), error = %e, "cannot read recording metadata");
    }
    let metadata = metadata.ok();

    RecordingFile {
        file_name,
        size_bytes: metadata.as_ref().map(Metadata::len).unwrap_or(0),
        last_modified_millis: metadata.as_ref().and_then(modified_millis).unwrap_or(0),
    }
}

/// Modification time in milliseconds since the Unix epoch; negative before it.
fn modified_millis(metadata: &Metadata) -> Option<i64> {
    let modified = metadata.modified().ok()?;
    let millis = match modified.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => -i64::try_from(before.duration().as_millis()).unwrap_or(i64::MAX),
    };
    Some(millis)
}
