//! Error types for obslink.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Transport-layer, framing-layer, and
//! driver-layer errors are all captured here.

/// The error type for all obslink operations.
///
/// Variants cover the failure modes encountered when talking to mount and
/// dome controllers over a serial line: write and read failures on the
/// port, reply timeouts, and replies that do not match the expected
/// grammar. Every failure is scoped to a single transaction; the engine
/// remains usable afterwards.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Writing the command to the transport failed. The transaction is
    /// aborted before any read is attempted.
    #[error("transport write error: {0}")]
    TransportWrite(String),

    /// Reading from the transport failed for a reason other than a
    /// timeout (device unplugged, port closed underneath us).
    #[error("transport read error: {0}")]
    TransportRead(String),

    /// Timed out waiting for a reply from the device.
    ///
    /// This typically indicates the controller is powered off or the baud
    /// rate is wrong. Under [`WaitPolicy::NoWait`](crate::channel::WaitPolicy)
    /// a timeout is not an error and this variant is never returned.
    #[error("timeout waiting for reply")]
    Timeout,

    /// A reply frame was received but did not match the grammar the
    /// caller expected for this command (e.g. a set command expecting a
    /// single-digit acknowledgement got something else).
    #[error("malformed reply: {0}")]
    MalformedReply(String),

    /// The requested operation is not supported by this device.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// An invalid parameter was passed to a device command.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No connection to the device has been established.
    #[error("not connected")]
    NotConnected,

    /// The connection to the device was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
