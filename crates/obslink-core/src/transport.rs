//! Transport trait for device communication.
//!
//! The [`Transport`] trait abstracts over the physical link to a mount or
//! dome controller. The production implementation is the serial transport
//! in `obslink-transport`; tests use `MockTransport` from the
//! `obslink-test-harness` crate.
//!
//! Framing (terminator scanning, buffering) is not a transport concern --
//! it lives in the [`Channel`](crate::channel::Channel), which consumes
//! this trait.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level transport to a device.
///
/// Implementations handle raw byte movement and error mapping at the
/// physical layer. Protocol-level concerns (command markers, terminator
/// framing, event classification) are handled by the channel and driver
/// layers that consume this trait.
#[async_trait]
pub trait Transport: Send {
    /// Send raw bytes to the device.
    ///
    /// Implementations should block until all bytes have been handed to
    /// the underlying transport (serial TX buffer).
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes from the device into the provided buffer.
    ///
    /// Returns the number of bytes actually read. Will wait up to
    /// `timeout` for data to arrive; returns
    /// [`Error::Timeout`](crate::error::Error::Timeout) if nothing is
    /// received within the deadline.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Flush any buffered output to the device.
    async fn flush(&mut self) -> Result<()>;

    /// Close the transport connection.
    ///
    /// After calling `close()`, subsequent `send()` and `receive()` calls
    /// should return [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}
