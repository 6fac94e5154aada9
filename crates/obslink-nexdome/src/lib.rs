//! NexDome dome backend for obslink (firmware v3+).
//!
//! This crate implements the NexDome controller's serial protocol:
//! `@`-prefixed CR-LF-terminated commands answered with `:`-prefixed,
//! `#`-terminated messages, with the rotator pushing unsolicited
//! reports (shutter radio-link transitions, rotator and shutter
//! position updates) freely interleaved with command replies. It
//! provides:
//!
//! - **Protocol codec** ([`protocol`]) -- command encoding, reply-echo
//!   matching, and the pushed-event grammar.
//! - **Command builders** ([`commands`]) -- one function per supported
//!   operation plus numeric reply parsing.
//! - **Device state** ([`status`]) -- shutter link state and the latest
//!   position reports, owned by the event classifier.
//! - **Dome driver** ([`dome`]) -- the [`NexDome`] driver; reads are
//!   transactions, writes are fire-and-forget, and
//!   [`poll_events`](NexDome::poll_events) absorbs pushed reports on
//!   the host's poll tick.
//! - **Builder** ([`builder`]) -- fluent builder API.
//!
//! # Protocol notes
//!
//! - Rotator positions are in motor steps, 153 steps per degree of
//!   azimuth; goto/sync take whole degrees.
//! - The shutter unit is reached over the rotator's XBee radio; its
//!   reachability arrives as `XB-><state>` events where anything other
//!   than `Online` counts as disconnected.
//!
//! # Example
//!
//! ```
//! use obslink_nexdome::protocol::{decode_event, encode_read, DomeEvent, Param, Target};
//!
//! // Build a "read rotator position" command
//! let cmd = encode_read(Param::Position, Target::Rotator);
//! assert_eq!(cmd, b"@PRR\r\n");
//!
//! // Decode a pushed position report
//! let event = decode_event(":P27540").unwrap();
//! assert_eq!(event, DomeEvent::RotatorPosition(27540));
//! ```

pub mod builder;
pub mod commands;
pub mod dome;
pub mod protocol;
pub mod status;

// Re-export the primary types for ergonomic `use obslink_nexdome::*`.
pub use builder::NexDomeBuilder;
pub use dome::{MotorSettings, NexDome};
pub use protocol::{Param, Target};
pub use status::DomeStatus;
