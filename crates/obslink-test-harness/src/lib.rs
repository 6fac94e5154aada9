//! obslink-test-harness: deterministic transports for protocol testing.
//!
//! Provides [`MockTransport`], an in-memory [`Transport`](obslink_core::Transport)
//! with pre-loaded request/response pairs and an unsolicited-data queue.
//! Driver and engine tests use it to exercise command framing, reply
//! parsing, and event classification without real hardware.

pub mod mock_serial;

pub use mock_serial::MockTransport;
