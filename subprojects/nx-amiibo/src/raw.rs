//! Raw binary structure definitions for the NFP service and tag images.
//!
//! All structures are `#[repr(C)]`, contain only byte-aligned fields and have
//! their sizes checked at compile time. Multi-byte fields use the explicit
//! endian types from `zerocopy::byteorder`.
//!
//! For decoding a tag image into these structures, see the `read` module.

pub mod amiibo;
pub mod common_info;
pub mod tag_info;

pub use self::{
    amiibo::{AmiiboFile, ModelInfo, UUID_LEN},
    common_info::CommonInfo,
    tag_info::TagInfo,
};
