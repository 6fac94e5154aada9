//! obslink-core: Core traits, types, and the protocol engine for obslink.
//!
//! This crate defines the device-agnostic pieces that both device drivers
//! build on. Host applications depend on these types without pulling in
//! any specific driver.
//!
//! # Key types
//!
//! - [`Channel`] -- terminator framing plus the one-command-at-a-time
//!   transaction engine
//! - [`EventClassifier`] -- the hook a driver implements to peel
//!   unsolicited events out of the reply stream
//! - [`Transport`] -- byte-level communication channel
//! - [`DeviceEvent`] -- state change notifications
//! - [`Error`] / [`Result`] -- error handling

pub mod channel;
pub mod error;
pub mod events;
pub mod frame;
pub mod helpers;
pub mod transport;
pub mod types;

// Re-export key types at crate root for ergonomic `use obslink_core::*`.
pub use channel::{Channel, Classification, EventClassifier, WaitPolicy};
pub use error::{Error, Result};
pub use events::DeviceEvent;
pub use frame::Frame;
pub use helpers::{local_sidereal_time, parse_sexagesimal, split_sexagesimal};
pub use transport::Transport;
pub use types::*;
