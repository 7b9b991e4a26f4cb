use static_assertions::const_assert_eq;
use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout, little_endian::U32};

use super::amiibo::UUID_LEN;

/// Tag information returned by `GetTagInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct TagInfo {
    /// NFC tag UUID
    pub uuid: [u8; UUID_LEN],
    /// UUID length, always [`UUID_LEN`]
    pub uuid_length: u8,
    /// Reserved (0x0b)
    _reserved_x0b: [u8; 0x15],
    /// NFC protocol
    pub protocol: U32,
    /// Tag type
    pub tag_type: U32,
    /// Reserved (0x28)
    _reserved_x28: [u8; 0x2c],
}

const_assert_eq!(size_of::<TagInfo>(), 0x54);
const_assert_eq!(core::mem::offset_of!(TagInfo, protocol), 0x20);
const_assert_eq!(core::mem::offset_of!(TagInfo, tag_type), 0x24);

impl TagInfo {
    /// Protocol value reported for every emulated tag.
    pub const PROTOCOL: u32 = 1;
    /// Tag type value reported for every emulated tag.
    pub const TAG_TYPE: u32 = 2;

    /// Creates the tag info reported for a tag with the given UUID.
    pub fn new(uuid: [u8; UUID_LEN]) -> Self {
        let mut info = Self::new_zeroed();
        info.uuid = uuid;
        info.uuid_length = UUID_LEN as u8;
        info.protocol = U32::new(Self::PROTOCOL);
        info.tag_type = U32::new(Self::TAG_TYPE);
        info
    }
}
