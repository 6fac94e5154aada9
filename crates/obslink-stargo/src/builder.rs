//! StarGoBuilder -- fluent builder for constructing [`StarGoMount`]
//! instances.
//!
//! Separates configuration from construction so that callers can set up
//! serial port parameters and timeout values before establishing the
//! transport connection.
//!
//! # Example
//!
//! ```no_run
//! use obslink_stargo::StarGoBuilder;
//! use std::time::Duration;
//!
//! # async fn example() -> obslink_core::Result<()> {
//! let mut mount = StarGoBuilder::new()
//!     .serial_port("/dev/ttyUSB0")
//!     .baud_rate(9600)
//!     .command_timeout(Duration::from_millis(500))
//!     .build()
//!     .await?;
//! mount.handshake().await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use obslink_core::error::{Error, Result};
use obslink_core::transport::Transport;

use crate::mount::StarGoMount;

/// Default baud rate for the StarGo's serial interface.
const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default reply timeout for one command.
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

/// Fluent builder for [`StarGoMount`].
///
/// All configuration has sensible defaults, so the simplest usage is:
///
/// ```ignore
/// let mount = StarGoBuilder::new()
///     .serial_port("/dev/ttyUSB0")
///     .build()
///     .await?;
/// ```
pub struct StarGoBuilder {
    serial_port: Option<String>,
    baud_rate: u32,
    command_timeout: Duration,
}

impl StarGoBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        StarGoBuilder {
            serial_port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Set the serial port path (e.g. `/dev/ttyUSB0` or `COM3`).
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
    /// (default: 500ms).
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Build a [`StarGoMount`] with a caller-provided transport.
    ///
    /// This is the primary entry point for testing (pass a
    /// `MockTransport` from `obslink-test-harness`) and for advanced use
    /// cases where the caller manages the transport lifecycle directly.
    pub fn build_with_transport(self, transport: Box<dyn Transport>) -> StarGoMount {
        StarGoMount::new(transport, self.command_timeout)
    }

    /// Build a [`StarGoMount`] using a serial transport.
    ///
    /// Requires that [`serial_port()`](Self::serial_port) has been
    /// called.
    pub async fn build(self) -> Result<StarGoMount> {
        let port = self
            .serial_port
            .as_ref()
            .ok_or_else(|| Error::InvalidParameter("serial_port is required for build()".into()))?;

        let transport = obslink_transport::SerialTransport::open(port, self.baud_rate).await?;
        Ok(self.build_with_transport(Box::new(transport)))
    }
}

impl Default for StarGoBuilder {
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
        let mount = StarGoBuilder::new().build_with_transport(Box::new(mock));
        assert!(mount.is_connected());
    }

    #[tokio::test]
    async fn builder_custom_settings() {
        let mock = MockTransport::new();
        let mount = StarGoBuilder::new()
            .serial_port("/dev/ttyUSB0")
            .baud_rate(115_200)
            .command_timeout(Duration::from_millis(200))
            .build_with_transport(Box::new(mock));
        assert!(mount.is_connected());
    }

    #[tokio::test]
    async fn builder_serial_port_required_for_build() {
        let result = StarGoBuilder::new().build().await;
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }
}
