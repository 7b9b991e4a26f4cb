use zerocopy::{FromZeros, IntoBytes};

use super::AmiiboId;
use crate::raw::{AmiiboFile, ModelInfo, TagInfo, UUID_LEN};

/// An owned tag image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagImage {
    raw: AmiiboFile,
}

impl TagImage {
    /// Size of a complete tag image in bytes.
    pub const SIZE: usize = AmiiboFile::SIZE;

    /// Builds a tag image from the bytes read from storage.
    ///
    /// The image starts zero-filled and the first `min(bytes.len(), SIZE)`
    /// bytes are copied in: a short dump leaves a zeroed tail, a long dump is
    /// truncated.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut raw = AmiiboFile::new_zeroed();
        let len = bytes.len().min(Self::SIZE);
        raw.as_mut_bytes()[..len].copy_from_slice(&bytes[..len]);
        Self { raw }
    }

    /// Get raw tag image structure.
    pub fn raw(&self) -> &AmiiboFile {
        &self.raw
    }

    /// Get the NFC tag UUID.
    pub fn uuid(&self) -> &[u8; UUID_LEN] {
        &self.raw.uuid
    }

    /// Decodes the tag identity reported by `GetTagInfo`.
    pub fn tag_info(&self) -> TagInfo {
        TagInfo::new(self.raw.uuid)
    }

    /// Decodes the model info reported by `GetModelInfo`.
    ///
    /// The embedded block is copied verbatim, reserved bytes included.
    pub fn model_info(&self) -> ModelInfo {
        self.raw.model_info
    }

    /// Decodes the amiibo identification block.
    pub fn amiibo_id(&self) -> AmiiboId {
        AmiiboId::from_block(&self.raw.model_info.amiibo_identification_block)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use zerocopy::IntoBytes;

    use super::*;

    fn sample_image() -> Vec<u8> {
        let mut bytes = vec![0u8; TagImage::SIZE];
        bytes[..UUID_LEN].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        bytes[UUID_LEN..0x54].fill(0xEE);
        bytes[0x54..0x5c].copy_from_slice(&[0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02]);
        bytes[0x5c..].fill(0x11);
        bytes
    }

    #[test]
    fn test_tag_info_from_exact_image() {
        let image = TagImage::from_bytes(&sample_image());

        let info = image.tag_info();
        assert_eq!(info.uuid, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(info.uuid_length, 10);
        assert_eq!(info.protocol.get(), 1);
        assert_eq!(info.tag_type.get(), 2);
    }

    #[test]
    fn test_tag_info_wire_layout() {
        let image = TagImage::from_bytes(&sample_image());

        let mut expected = [0u8; 0x54];
        expected[..10].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        expected[0x0a] = 10;
        expected[0x20] = 1;
        expected[0x24] = 2;

        assert_eq!(image.tag_info().as_bytes(), &expected[..]);
    }

    #[test]
    fn test_model_info_copied_verbatim() {
        let bytes = sample_image();
        let image = TagImage::from_bytes(&bytes);

        assert_eq!(image.model_info().as_bytes(), &bytes[0x54..]);
    }

    #[test]
    fn test_short_image_is_zero_filled() {
        let image = TagImage::from_bytes(&[0xAB; 4]);

        assert_eq!(image.uuid(), &[0xAB, 0xAB, 0xAB, 0xAB, 0, 0, 0, 0, 0, 0]);
        assert_eq!(image.model_info().as_bytes(), &[0u8; 0x40][..]);
    }

    #[test]
    fn test_long_image_is_truncated() {
        let mut bytes = sample_image();
        bytes.extend_from_slice(&[0xFF; 0x100]);

        let image = TagImage::from_bytes(&bytes);

        assert_eq!(image.raw().as_bytes(), &bytes[..TagImage::SIZE]);
    }
}
