//! Emulated NFP (amiibo) user service.
//!
//! This crate implements the `nfp:user` IUser interface on top of a tag image
//! instead of NFC hardware:
//! - [`NfpUserMitmService`] creates one [`UserInterface`] per client
//! - [`UserInterface`] dispatches IUser commands to a [`DeviceSession`]
//! - [`DeviceSession`] runs the reader state machine and reads the tag store
//! - [`ActivateTrigger`] is the process-wide "tag tapped" signal raised by the
//!   input monitor
//!
//! Tag data is read-only: the application area is never emulated.

pub mod cmif;
pub mod device;
pub mod mitm;
pub mod proto;
pub mod result;
pub mod trigger;
pub mod user;

#[cfg(test)]
mod testing;

pub use self::{
    cmif::{Command, RawRequest, Request, Response, UnknownCommandError},
    device::{DeviceSession, ReadTagError, Step, Transition},
    mitm::NfpUserMitmService,
    proto::{DeviceHandle, DeviceState, NpadId, SERVICE_NAME, State},
    result::ResultCode,
    trigger::ActivateTrigger,
    user::{DispatchError, UserInterface},
};
