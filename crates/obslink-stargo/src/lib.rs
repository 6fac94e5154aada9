//! Avalon StarGo mount backend for obslink.
//!
//! This crate implements the StarGo's LX200-dialect serial protocol:
//! colon-prefixed, hash-terminated ASCII commands, with the firmware
//! pushing unsolicited `:Z1mts#` motion-state messages interleaved with
//! command replies. It provides:
//!
//! - **Protocol codec** ([`protocol`]) -- command framing and the pushed
//!   motion-state event grammar.
//! - **Command builders** ([`commands`]) -- construct correctly-formatted
//!   commands for every supported operation (coordinates, slewing,
//!   tracking, parking, guiding configuration, meridian flip, site and
//!   time) and parse the corresponding replies.
//! - **Device state** ([`status`]) -- the mount's derived state (motor
//!   power, tracking mode, slew rate, pier side, park state), owned by
//!   the event classifier.
//! - **Mount driver** ([`mount`]) -- the [`StarGoMount`] driver running
//!   every operation as one transaction through the
//!   [`Channel`](obslink_core::Channel) engine.
//! - **Builder** ([`builder`]) -- fluent builder API for constructing
//!   [`StarGoMount`] instances.
//!
//! # Protocol notes
//!
//! - Motion-state pushes can arrive at any moment, including between a
//!   command and its reply; the transaction engine feeds them to the
//!   classifier so they never masquerade as replies.
//! - Fire-and-forget commands (tracking mode, slew rate, directional
//!   motion, pulse guiding) produce no reply at all and are sent with
//!   [`WaitPolicy::NoWait`](obslink_core::WaitPolicy).
//! - The pier-side reply letters are applied exactly as the firmware
//!   reports them.
//!
//! # Example
//!
//! ```
//! use obslink_stargo::protocol::{decode_motion_state, encode_command};
//! use obslink_core::types::MotorState;
//!
//! // Build a "query park status" command
//! let cmd = encode_command("X38");
//! assert_eq!(cmd, b":X38#");
//!
//! // Decode a pushed motion-state event
//! let (motors, _mode, _rate) = decode_motion_state(":Z1303").unwrap();
//! assert_eq!(motors, MotorState::On);
//! ```

pub mod builder;
pub mod commands;
pub mod mount;
pub mod protocol;
pub mod status;

// Re-export the primary types for ergonomic `use obslink_stargo::*`.
pub use builder::StarGoBuilder;
pub use commands::Direction;
pub use mount::StarGoMount;
pub use status::MountStatus;
