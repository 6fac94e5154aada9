//! obslink-transport: Transport implementations for obslink.
//!
//! Provides the concrete [`Transport`](obslink_core::Transport)
//! implementation for the serial links both supported controllers use:
//!
//! - [`SerialTransport`] -- USB virtual COM ports and physical RS-232
//!
//! Deterministic in-memory transports for testing live in the
//! `obslink-test-harness` crate instead.

pub mod serial;

pub use serial::{DataBits, FlowControl, Parity, SerialConfig, SerialTransport, StopBits};
