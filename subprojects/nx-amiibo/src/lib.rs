//! # nx-amiibo
//! Zero-copy decoding of amiibo tag images for the emulated `nfp:user` service.
//!
//! This crate provides three layers:
//! - `raw`: Wire and on-disk structure definitions using `zerocopy`
//! - `read`: Owned tag image with the decoders the NFP commands report from
//! - `store`: File-backed tag image loader (requires `std` feature)
//!
//! All wire structures have a fixed size and explicit byte order, so the bytes
//! handed to a client are identical on every host.
//!
//! # References
//! - [switchbrew NFC services](https://switchbrew.org/wiki/NFC_services)
//! - [switchbrew amiibo](https://switchbrew.org/wiki/Amiibo)

#![cfg_attr(not(feature = "std"), no_std)]

pub mod raw;
pub mod read;

#[cfg(feature = "std")]
pub mod store;
