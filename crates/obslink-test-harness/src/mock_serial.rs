//! Mock transport for deterministic testing of protocol engines.
//!
//! [`MockTransport`] implements the [`Transport`] trait with pre-loaded
//! request/response pairs plus an unsolicited-data queue. This lets you
//! test command encoding, reply parsing, event classification, and the
//! drain behavior of the transaction engine without real hardware.
//!
//! # Example
//!
//! ```
//! use obslink_test_harness::MockTransport;
//!
//! let mut mock = MockTransport::new();
//! // Pre-load: when the engine sends this command, return this reply.
//! mock.expect(b":X38#", b"p2#");
//! // Data already sitting in the receive buffer before any command.
//! mock.push_unsolicited(b":Z1303#");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

use obslink_core::error::{Error, Result};
use obslink_core::transport::Transport;

/// A pre-loaded request/response pair for the mock transport.
#[derive(Debug, Clone)]
struct Expectation {
    /// The exact bytes we expect to be sent.
    request: Vec<u8>,
    /// The bytes to return once the matching request is received.
    response: Vec<u8>,
}

/// A mock [`Transport`] for testing protocol engines without hardware.
///
/// Expectations are consumed in order. When `send()` is called, the sent
/// data is recorded and matched against the next expectation; the
/// corresponding response is then served by subsequent `receive()` calls.
/// Bytes queued with [`push_unsolicited`](MockTransport::push_unsolicited)
/// are served before any expectation response, mimicking events the
/// device pushed while the line was idle.
///
/// If a send doesn't match the next expectation, or the queue is
/// exhausted, an error is returned.
#[derive(Debug)]
pub struct MockTransport {
    /// Ordered queue of expected request/response pairs.
    expectations: VecDeque<Expectation>,
    /// Bytes available to `receive()` right now: unsolicited pushes plus
    /// the responses of already-matched expectations.
    rx_queue: VecDeque<u8>,
    /// Whether the transport is "connected".
    connected: bool,
    /// Log of all bytes sent through this transport.
    sent_log: Vec<Vec<u8>>,
}

impl MockTransport {
    /// Create a new mock transport in the connected state.
    pub fn new() -> Self {
        MockTransport {
            expectations: VecDeque::new(),
            rx_queue: VecDeque::new(),
            connected: true,
            sent_log: Vec::new(),
        }
    }

    /// Add an expected request/response pair.
    ///
    /// When `send()` is called with data matching `request`, subsequent
    /// `receive()` calls will return `response`. An empty response models
    /// a fire-and-forget command the device never answers.
    pub fn expect(&mut self, request: &[u8], response: &[u8]) {
        self.expectations.push_back(Expectation {
            request: request.to_vec(),
            response: response.to_vec(),
        });
    }

    /// Queue bytes as already-received unsolicited data.
    ///
    /// These bytes are served by `receive()` before any command is sent,
    /// mimicking events the device pushed on its own (the stray frames
    /// the engine's drain step must absorb).
    pub fn push_unsolicited(&mut self, data: &[u8]) {
        self.rx_queue.extend(data.iter().copied());
    }

    /// Return a reference to all data that has been sent through this
    /// transport. Each element is the byte slice from one `send()` call.
    pub fn sent_data(&self) -> &[Vec<u8>] {
        &self.sent_log
    }

    /// Return the number of expectations that have not yet been consumed.
    pub fn remaining_expectations(&self) -> usize {
        self.expectations.len()
    }

    /// Set the connected state of the mock transport.
    ///
    /// When set to `false`, subsequent `send()` and `receive()` calls
    /// will return [`Error::NotConnected`].
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        // Record what was sent.
        self.sent_log.push(data.to_vec());

        // Match against the next expectation.
        if let Some(expectation) = self.expectations.pop_front() {
            if data != expectation.request.as_slice() {
                return Err(Error::TransportWrite(format!(
                    "unexpected send data: expected {:02X?}, got {:02X?}",
                    expectation.request, data
                )));
            }
            self.rx_queue.extend(expectation.response.iter().copied());
            Ok(())
        } else {
            Err(Error::TransportWrite(
                "no more expectations in mock transport".into(),
            ))
        }
    }

    async fn receive(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        if self.rx_queue.is_empty() {
            return Err(Error::Timeout);
        }

        let mut n = 0;
        while n < buf.len() {
            match self.rx_queue.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    async fn flush(&mut self) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        self.rx_queue.clear();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn basic_send_receive() {
        let mut mock = MockTransport::new();
        mock.expect(b":GR#", b"12:34:56#");

        mock.send(b":GR#").await.unwrap();

        let mut buf = [0u8; 64];
        let n = mock
            .receive(&mut buf, Duration::from_millis(100))
            .await
            .unwrap();

        assert_eq!(&buf[..n], b"12:34:56#");
    }

    #[tokio::test]
    async fn tracks_sent_data() {
        let mut mock = MockTransport::new();
        mock.expect(b":TQ#", b"");
        mock.expect(b":RS#", b"");

        mock.send(b":TQ#").await.unwrap();
        mock.send(b":RS#").await.unwrap();

        assert_eq!(mock.sent_data().len(), 2);
        assert_eq!(mock.sent_data()[0], b":TQ#");
        assert_eq!(mock.sent_data()[1], b":RS#");
    }

    #[tokio::test]
    async fn wrong_data_errors() {
        let mut mock = MockTransport::new();
        mock.expect(b":X38#", b"p0#");

        let result = mock.send(b":X39#").await;
        assert!(matches!(result.unwrap_err(), Error::TransportWrite(_)));
    }

    #[tokio::test]
    async fn no_expectations_errors() {
        let mut mock = MockTransport::new();

        let result = mock.send(b":GR#").await;
        assert!(matches!(result.unwrap_err(), Error::TransportWrite(_)));
    }

    #[tokio::test]
    async fn receive_without_send_times_out() {
        let mut mock = MockTransport::new();
        let mut buf = [0u8; 64];

        let result = mock.receive(&mut buf, Duration::from_millis(10)).await;
        assert!(matches!(result.unwrap_err(), Error::Timeout));
    }

    #[tokio::test]
    async fn empty_response_models_no_reply() {
        let mut mock = MockTransport::new();
        mock.expect(b":Q#", b"");

        mock.send(b":Q#").await.unwrap();

        let mut buf = [0u8; 64];
        let result = mock.receive(&mut buf, Duration::from_millis(10)).await;
        assert!(matches!(result.unwrap_err(), Error::Timeout));
    }

    #[tokio::test]
    async fn unsolicited_data_served_before_send() {
        let mut mock = MockTransport::new();
        mock.push_unsolicited(b":Z1303#");

        let mut buf = [0u8; 64];
        let n = mock
            .receive(&mut buf, Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(&buf[..n], b":Z1303#");
    }

    #[tokio::test]
    async fn unsolicited_data_precedes_response() {
        let mut mock = MockTransport::new();
        mock.push_unsolicited(b":Z1000#");
        mock.expect(b":X38#", b"p2#");

        mock.send(b":X38#").await.unwrap();

        let mut buf = [0u8; 64];
        let n = mock
            .receive(&mut buf, Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(&buf[..n], b":Z1000#p2#");
    }

    #[tokio::test]
    async fn partial_receive() {
        let mut mock = MockTransport::new();
        mock.expect(b":GR#", b"12:34:56#");

        mock.send(b":GR#").await.unwrap();

        // Read with a buffer smaller than the response.
        let mut buf = [0u8; 4];
        let n = mock
            .receive(&mut buf, Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf[..n], b"12:3");

        let n = mock
            .receive(&mut buf, Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf[..n], b"4:56");
    }

    #[tokio::test]
    async fn disconnect() {
        let mut mock = MockTransport::new();
        assert!(mock.is_connected());

        mock.close().await.unwrap();
        assert!(!mock.is_connected());

        let result = mock.send(b":GR#").await;
        assert!(matches!(result.unwrap_err(), Error::NotConnected));

        let mut buf = [0u8; 8];
        let result = mock.receive(&mut buf, Duration::from_millis(10)).await;
        assert!(matches!(result.unwrap_err(), Error::NotConnected));
    }

    #[tokio::test]
    async fn remaining_expectations_counts_down() {
        let mut mock = MockTransport::new();
        mock.expect(b":GR#", b"a#");
        mock.expect(b":GD#", b"b#");
        assert_eq!(mock.remaining_expectations(), 2);

        mock.send(b":GR#").await.unwrap();
        assert_eq!(mock.remaining_expectations(), 1);

        mock.send(b":GD#").await.unwrap();
        assert_eq!(mock.remaining_expectations(), 0);
    }
}
