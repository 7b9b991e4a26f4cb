use static_assertions::const_assert_eq;
use zerocopy::{
    FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout,
    big_endian::{U16, U32},
};

/// Common information returned by `GetCommonInfo`.
///
/// Unlike the other NFP structures, every multi-byte field is big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct CommonInfo {
    /// Year of the last write
    pub last_write_year: U16,
    /// Month of the last write
    pub last_write_month: u8,
    /// Day of the last write
    pub last_write_day: u8,
    /// Number of writes to the tag
    pub write_counter: U16,
    /// Tag data version
    pub version: U16,
    /// Size of the application area in bytes
    pub application_area_size: U32,
    /// Reserved (0x0c)
    _reserved_x0c: [u8; 0x34],
}

const_assert_eq!(size_of::<CommonInfo>(), 0x40);
const_assert_eq!(core::mem::offset_of!(CommonInfo, application_area_size), 0x08);

impl CommonInfo {
    /// Common info for a tag without an application area.
    pub fn empty() -> Self {
        Self::new_zeroed()
    }
}
