use static_assertions::const_assert_eq;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Length of the NFC tag UUID in bytes.
pub const UUID_LEN: usize = 10;

/// Model information returned by `GetModelInfo`.
///
/// Only the first 8 bytes carry data; they are copied verbatim from the tag
/// image. See [`AmiiboId`](crate::read::AmiiboId) for a decoded view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct ModelInfo {
    /// amiibo identification block
    pub amiibo_identification_block: [u8; 8],
    /// Reserved (0x08)
    _reserved_x08: [u8; 0x38],
}

const_assert_eq!(size_of::<ModelInfo>(), 0x40);

/// On-disk tag image (`amiibo.bin`) layout.
///
/// Only the UUID and the embedded model info are read; the bytes in between
/// belong to the (encrypted) tag dump and are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct AmiiboFile {
    /// NFC tag UUID
    pub uuid: [u8; UUID_LEN],
    /// Unused tag header (0x0a)
    _unused_x0a: [u8; 0x4a],
    /// Model info block (0x54)
    pub model_info: ModelInfo,
}

const_assert_eq!(size_of::<AmiiboFile>(), 0x94);
const_assert_eq!(core::mem::offset_of!(AmiiboFile, model_info), 0x54);

impl AmiiboFile {
    /// Size of a complete tag image in bytes.
    pub const SIZE: usize = size_of::<Self>();
}
