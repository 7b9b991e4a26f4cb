//! # nx-event
//!
//! Write-only system events.
//!
//! A [`SystemEvent`] is the writable side of a kernel-style event: the owning
//! service signals and clears it, and hands out [`ReadableEvent`]s that a
//! client duplicates and waits on. The owner never waits on its own events.
//!
//! Events are created in [`ResetMode::Auto`] by default, matching the events
//! the NFP service hands to its clients: a successful wait consumes the
//! signal.

mod event;
mod handle;

pub use self::{
    event::{ReadableEvent, ResetMode, SystemEvent},
    handle::EventHandle,
};
