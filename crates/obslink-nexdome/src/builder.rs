//! NexDomeBuilder -- fluent builder for constructing [`NexDome`]
//! instances.
//!
//! # Example
//!
//! ```no_run
//! use obslink_nexdome::NexDomeBuilder;
//! use std::time::Duration;
//!
//! # async fn example() -> obslink_core::Result<()> {
//! let mut dome = NexDomeBuilder::new()
//!     .serial_port("/dev/ttyACM0")
//!     .command_timeout(Duration::from_secs(1))
//!     .build()
//!     .await?;
//! let version = dome.handshake().await?;
//! println!("firmware {version}");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use obslink_core::error::{Error, Result};
use obslink_core::transport::Transport;

use crate::dome::NexDome;

/// Default baud rate for the NexDome controller's USB serial interface.
const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default reply timeout for one command.
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(3);

/// Fluent builder for [`NexDome`].
pub struct NexDomeBuilder {
    serial_port: Option<String>,
    baud_rate: u32,
    command_timeout: Duration,
}

impl NexDomeBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        NexDomeBuilder {
            serial_port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Set the serial port path (e.g. `/dev/ttyACM0` or `COM4`).
    pub fn serial_port(mut self, port: &str) -> Self {
        self.serial_port = Some(port.to_string());
        self
    }

    /// Override the default baud rate (9600).
    pub fn baud_rate(mut self, baud: u32) -> Self {
        self.baud_rate = baud;
        self
    }

    /// Set the timeout for waiting for a reply to a single command
    /// (default: 3s -- shutter queries go over the XBee radio and take
    /// noticeably longer than the local rotator).
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Build a [`NexDome`] with a caller-provided transport.
    ///
    /// This is the primary entry point for testing (pass a
    /// `MockTransport` from `obslink-test-harness`).
    pub fn build_with_transport(self, transport: Box<dyn Transport>) -> NexDome {
        NexDome::new(transport, self.command_timeout)
    }

    /// Build a [`NexDome`] using a serial transport.
    ///
    /// Requires that [`serial_port()`](Self::serial_port) has been
    /// called.
    pub async fn build(self) -> Result<NexDome> {
        let port = self
            .serial_port
            .as_ref()
            .ok_or_else(|| Error::InvalidParameter("serial_port is required for build()".into()))?;

        let transport = obslink_transport::SerialTransport::open(port, self.baud_rate).await?;
        Ok(self.build_with_transport(Box::new(transport)))
    }
}

impl Default for NexDomeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obslink_test_harness::MockTransport;

    #[tokio::test]
    async fn builder_defaults() {
        let mock = MockTransport::new();
        let dome = NexDomeBuilder::new().build_with_transport(Box::new(mock));
        assert!(dome.is_connected());
    }

    #[tokio::test]
    async fn builder_serial_port_required_for_build() {
        let result = NexDomeBuilder::new().build().await;
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }
}
