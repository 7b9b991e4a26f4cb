//! In-memory tag stores for unit tests.

use std::{io, path::PathBuf};

use nx_amiibo::{
    read::TagImage,
    store::{LoadError, TagStore},
};

/// Store that always returns the same image.
pub(crate) struct StaticTagStore(pub TagImage);

impl StaticTagStore {
    /// Image with UUID `01..0A` and a Mario identification block.
    pub fn sample() -> Self {
        let mut bytes = [0u8; TagImage::SIZE];
        bytes[..10].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        bytes[0x54..0x5c].copy_from_slice(&[0, 0, 0, 0, 0, 0, 0, 2]);
        Self(TagImage::from_bytes(&bytes))
    }
}

impl TagStore for StaticTagStore {
    fn load(&self) -> Result<TagImage, LoadError> {
        Ok(self.0)
    }
}

/// Store whose backing file does not exist.
pub(crate) struct MissingTagStore;

impl TagStore for MissingTagStore {
    fn load(&self) -> Result<TagImage, LoadError> {
        Err(LoadError {
            path: PathBuf::from("amiibo.bin"),
            source: io::Error::from(io::ErrorKind::NotFound),
        })
    }
}
