//! Host harness for the emulated `nfp:user` service.
//!
//! Wires the service to a tag file, a key-combo input monitor and a
//! JSON-lines transport so the emulation can be driven from a host process.

pub mod config;
pub mod input;
pub mod logging;
pub mod monitor;
pub mod server;
pub mod transport;

pub use self::{
    config::{Config, ConfigError},
    input::{InputError, InputSource, Keys, VirtualPad},
    monitor::{KeyComboMonitor, MonitorHandle},
    server::{Message, ObjectId, Reply, ServerError, ServerManager, Transport, TransportError},
    transport::LineTransport,
};
