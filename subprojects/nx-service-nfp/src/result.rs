//! Horizon OS result codes returned by the emulated service.
//!
//! A result code packs a 9-bit module id and a 13-bit description:
//!
//! - **Bits 0-8:** Module ID
//! - **Bits 9-21:** Description
//!
//! Zero means success. Codes are displayed as `2XXX-YYYY`, where `XXX` is the
//! module and `YYYY` the description.
//!
//! # References
//! - [Switchbrew Wiki: Error Codes](https://switchbrew.org/wiki/Error_codes)

/// Mask for the module field (9 bits)
const MODULE_MASK: u32 = 0x1FF;
/// Mask for the description field (13 bits)
const DESCRIPTION_MASK: u32 = 0x1FFF;
/// Shift amount for the description field
const DESCRIPTION_SHIFT: u32 = 9;

/// Kernel module.
pub const MODULE_KERNEL: u32 = 1;
/// Service framework module.
pub const MODULE_SF: u32 = 10;
/// NFP module.
pub const MODULE_NFP: u32 = 115;

/// A raw Horizon OS result code.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ResultCode(u32);

impl ResultCode {
    /// The successful result.
    pub const SUCCESS: Self = Self(0);

    /// CMIF request carried a command id the interface does not implement.
    pub const UNKNOWN_COMMAND_ID: Self = Self::from_parts(MODULE_SF, 221);

    /// CMIF request targeted an object id that is not registered.
    pub const TARGET_NOT_FOUND: Self = Self::from_parts(MODULE_SF, 261);

    /// The server already holds its maximum number of sessions.
    pub const OUT_OF_SESSIONS: Self = Self::from_parts(MODULE_KERNEL, 7);

    /// No tag is present on the reader.
    pub const TAG_NOT_FOUND: Self = Self::from_parts(MODULE_NFP, 97);

    /// Creates a result code from a module and description.
    #[inline]
    pub const fn from_parts(module: u32, description: u32) -> Self {
        Self((module & MODULE_MASK) | ((description & DESCRIPTION_MASK) << DESCRIPTION_SHIFT))
    }

    /// Creates a result code from its raw value.
    #[inline]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value (`u32`) of this result code.
    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    /// Returns `true` if the result code represents a success.
    #[inline]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Returns the module that produced the result.
    #[inline]
    pub const fn module(self) -> u32 {
        self.0 & MODULE_MASK
    }

    /// Returns the description value.
    #[inline]
    pub const fn description(self) -> u32 {
        (self.0 >> DESCRIPTION_SHIFT) & DESCRIPTION_MASK
    }
}

impl core::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:04}", 2000 + self.module(), self.description())
    }
}

impl core::fmt::Debug for ResultCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResultCode")
            .field("code", &format_args!("{}", self))
            .field("raw", &format_args!("{:#x}", self.0))
            .finish()
    }
}
