//! Decoders over the raw tag image.
//!
//! A [`TagImage`] is built from whatever bytes were read from storage and
//! produces the structures the NFP commands hand back to clients.

mod amiibo_id;
mod tag_image;

pub use self::{amiibo_id::AmiiboId, tag_image::TagImage};
