//! Handles to validated recording files.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, Take};

use super::range::ByteRange;

/// A recording file that passed name validation and confinement.
///
/// The handle holds no descriptor. [`RecordingHandle::open`] acquires one
/// right before streaming starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingHandle {
    path: PathBuf,
}

impl RecordingHandle {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Absolute, normalized path of the recording.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file for streaming.
    ///
    /// Fails if the file disappeared or became unreadable since it was
    /// resolved.
    pub async fn open(self) -> std::io::Result<RecordingStream> {
        let file = File::open(&self.path).await?;
        let len = file.metadata().await?.len();
        Ok(RecordingStream {
            path: self.path,
            file,
            len,
        })
    }
}

/// An open recording. Owns the file descriptor, which is closed when the
/// stream (or the reader produced from it) is dropped.
#[derive(Debug)]
pub struct RecordingStream {
    path: PathBuf,
    file: File,
    len: u64,
}

impl RecordingStream {
    /// Total file length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reader over the whole file.
    pub fn into_reader(self) -> Take<File> {
        let len = self.len;
        self.file.take(len)
    }

    /// Reader over `range` only.
    pub async fn into_range_reader(mut self, range: ByteRange) -> std::io::Result<Take<File>> {
        if range.start > 0 {
            self.file.seek(SeekFrom::Start(range.start)).await?;
        }
        Ok(self.file.take(range.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_and_read_whole_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rec.mp3");
        fs::write(&path, b"0123456789").unwrap();

        let stream = RecordingHandle::new(path.clone()).open().await.unwrap();
        assert_eq!(stream.len(), 10);
        assert_eq!(stream.path(), path);

        let mut buf = Vec::new();
        stream.into_reader().read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"0123456789");
    }

    #[tokio::test]
    async fn test_range_reader() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rec.mp3");
        fs::write(&path, b"0123456789").unwrap();

        let stream = RecordingHandle::new(path).open().await.unwrap();
        let mut reader = stream
            .into_range_reader(ByteRange { start: 3, end: 5 })
            .await
            .unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"345");
    }

    #[tokio::test]
    async fn test_open_vanished_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let handle = RecordingHandle::new(temp_dir.path().join("gone.mp3"));
        assert!(handle.open().await.is_err());
    }
}
