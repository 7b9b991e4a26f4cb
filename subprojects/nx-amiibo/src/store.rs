//! File-backed tag image storage.
//!
//! The store is queried on every tag command and never caches: replacing the
//! file on disk swaps the emulated tag for the next query.

use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

use fs_err as fs;

use crate::read::TagImage;

/// Source of the tag image presented to clients.
pub trait TagStore: Send + Sync {
    /// Loads the current tag image.
    fn load(&self) -> Result<TagImage, LoadError>;
}

/// Tag store reading a tag dump from a fixed path.
#[derive(Debug, Clone)]
pub struct FileTagStore {
    path: PathBuf,
}

impl FileTagStore {
    /// Default tag image file name, relative to the working directory.
    pub const DEFAULT_PATH: &'static str = "amiibo.bin";

    /// Create a store reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileTagStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl TagStore for FileTagStore {
    /// Reads at most [`TagImage::SIZE`] bytes, whatever the file size.
    fn load(&self) -> Result<TagImage, LoadError> {
        let load_error = |source: io::Error| LoadError {
            path: self.path.clone(),
            source,
        };

        let file = fs::File::open(&self.path).map_err(load_error)?;
        let len = file.metadata().map_err(load_error)?.len();

        let mut bytes = Vec::with_capacity(TagImage::SIZE);
        file.take(TagImage::SIZE as u64)
            .read_to_end(&mut bytes)
            .map_err(load_error)?;

        if len != TagImage::SIZE as u64 {
            tracing::debug!(
                path = %self.path.display(),
                len,
                expected = TagImage::SIZE,
                "tag image size mismatch"
            );
        }

        Ok(TagImage::from_bytes(&bytes))
    }
}

/// Error returned by [`TagStore::load`].
#[derive(Debug, thiserror::Error)]
#[error("failed to read tag image {}", path.display())]
pub struct LoadError {
    /// File that could not be read
    pub path: PathBuf,
    /// Underlying I/O error
    #[source]
    pub source: io::Error,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_reads_uuid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut bytes = vec![0u8; TagImage::SIZE];
        bytes[..10].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        file.write_all(&bytes).unwrap();

        let store = FileTagStore::new(file.path());
        let image = store.load().unwrap();

        assert_eq!(image.uuid(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_load_oversized_file_reads_image_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amiibo.bin");
        let mut bytes = vec![0x33u8; TagImage::SIZE];
        bytes.resize(TagImage::SIZE + 0x10_0000, 0xFF);
        std::fs::write(&path, &bytes).unwrap();

        let image = FileTagStore::new(&path).load().unwrap();

        assert_eq!(image.uuid(), &[0x33; 10]);
        assert_eq!(image.model_info().amiibo_identification_block, [0x33; 8]);
    }

    #[test]
    fn test_load_short_file_is_zero_filled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amiibo.bin");
        std::fs::write(&path, [0x44; 4]).unwrap();

        let image = FileTagStore::new(&path).load().unwrap();

        assert_eq!(image.uuid(), &[0x44, 0x44, 0x44, 0x44, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amiibo.bin");

        let err = FileTagStore::new(&path).load().unwrap_err();

        assert_eq!(err.path, path);
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_load_observes_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amiibo.bin");
        let store = FileTagStore::new(&path);

        std::fs::write(&path, [0x11; TagImage::SIZE]).unwrap();
        assert_eq!(store.load().unwrap().uuid(), &[0x11; 10]);

        std::fs::write(&path, [0x22; TagImage::SIZE]).unwrap();
        assert_eq!(store.load().unwrap().uuid(), &[0x22; 10]);
    }
}
