//! Frame reader and transaction engine.
//!
//! Mount and dome controllers interleave two kinds of traffic on the same
//! serial line: replies to commands we sent, and unsolicited status
//! messages the firmware pushes whenever it feels like it. The
//! [`Channel`] owns the transport and untangles the two:
//!
//! - [`Channel::next_frame`] pulls one terminator-delimited frame off the
//!   line, blocking or not.
//! - [`Channel::execute`] runs one complete transaction: drain any stale
//!   frames, transmit the command, then collect frames until the real
//!   reply shows up -- feeding every pushed event to the driver's
//!   [`EventClassifier`] along the way.
//!
//! Exactly one transaction is in flight at a time; the `&mut self`
//! receivers enforce this at compile time. There is no background reader
//! task and no automatic retry: every failure is scoped to its
//! transaction, and the next call's drain step resynchronizes the line.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::frame::{self, Frame};
use crate::transport::Transport;

/// Timeout used for the non-blocking reads of the drain step. Long enough
/// to pick up bytes already in the OS buffer, short enough that draining
/// an idle line costs nothing noticeable.
const DRAIN_TIMEOUT: Duration = Duration::from_millis(10);

/// Upper bound on a whole transaction, as a multiple of the per-read
/// timeout. A firmware pushing events in a tight loop could otherwise
/// keep the collect phase alive indefinitely.
const TRANSACTION_CAP_FACTOR: u32 = 4;

/// Per-command policy for the collect phase of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Block until a genuine (non-event) reply arrives; a read timeout is
    /// an error.
    Wait,
    /// Best effort: many commands produce no reply at all. The first read
    /// blocks for at most one read timeout; after the first frame the
    /// loop downgrades to non-blocking reads so an event flood cannot
    /// stall the caller. A timeout yields success with an empty reply.
    NoWait,
}

/// Verdict of the event classifier for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The frame matched an event signature and has been consumed; it
    /// must not be handed to the caller as a reply.
    Event,
    /// The frame matched no event signature; it is a reply candidate.
    NotAnEvent,
}

/// Pattern-matches frames against a device's unsolicited event signatures.
///
/// Implementations try their registered signatures in a fixed priority
/// order; on the first match they decode the positional fields, update
/// the device state they own, notify subscribers, and return
/// [`Classification::Event`]. A decode failure (wrong arity, non-numeric
/// field) is logged and reported as [`Classification::NotAnEvent`] so the
/// in-flight transaction can still find its real reply later in the
/// stream.
pub trait EventClassifier {
    /// Classify one frame, applying its state update if it is an event.
    fn classify(&mut self, frame: &Frame) -> Classification;
}

/// A framed, transaction-oriented view of a byte transport.
///
/// Owns the transport exclusively for the life of the connection along
/// with the receive accumulation buffer, the protocol's terminator byte,
/// and the reply timeout.
pub struct Channel {
    transport: Box<dyn Transport>,
    terminator: u8,
    read_timeout: Duration,
    rx_buf: Vec<u8>,
}

impl Channel {
    /// Create a channel over `transport` for a protocol whose frames end
    /// with `terminator`, using `read_timeout` for blocking reads.
    pub fn new(transport: Box<dyn Transport>, terminator: u8, read_timeout: Duration) -> Self {
        Channel {
            transport,
            terminator,
            read_timeout,
            rx_buf: Vec::new(),
        }
    }

    /// The reply timeout for blocking reads.
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Whether the underlying transport is connected.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Close the underlying transport.
    pub async fn close(&mut self) -> Result<()> {
        self.rx_buf.clear();
        self.transport.close().await
    }

    /// Read the next frame off the line.
    ///
    /// With `block` set, waits up to the channel's read timeout; if the
    /// deadline passes with partial unterminated content buffered, that
    /// content is returned as a frame rather than dropped (some firmware
    /// replies omit the terminator), and an empty line yields
    /// [`Error::Timeout`].
    ///
    /// Without `block`, a minimal timeout is used and "nothing available"
    /// is the non-fatal `Ok(None)` -- callers use this to drain backlog
    /// without stalling. Partial content stays buffered for the next
    /// read.
    pub async fn next_frame(&mut self, block: bool) -> Result<Option<Frame>> {
        let timeout = if block { self.read_timeout } else { DRAIN_TIMEOUT };
        let deadline = std::time::Instant::now() + timeout;

        loop {
            if let Some((frame, consumed)) = frame::split_frame(&self.rx_buf, self.terminator) {
                self.rx_buf.drain(..consumed);
                trace!(frame = %frame, "frame received");
                return Ok(Some(frame));
            }

            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                return self.deadline_expired(block);
            }

            let mut buf = [0u8; 256];
            match self.transport.receive(&mut buf, remaining).await {
                Ok(0) => continue,
                Ok(n) => self.rx_buf.extend_from_slice(&buf[..n]),
                Err(Error::Timeout) => return self.deadline_expired(block),
                Err(e) => return Err(Error::TransportRead(e.to_string())),
            }
        }
    }

    /// Resolve a read that ran out of time.
    fn deadline_expired(&mut self, block: bool) -> Result<Option<Frame>> {
        if !block {
            return Ok(None);
        }
        if self.rx_buf.is_empty() {
            return Err(Error::Timeout);
        }
        // The read completed without a terminator. Return the content
        // unterminated rather than silently dropping it.
        let frame = Frame::from_bytes(&self.rx_buf);
        self.rx_buf.clear();
        debug!(frame = %frame, "frame received without terminator");
        Ok(Some(frame))
    }

    /// Execute one command/response transaction.
    ///
    /// 1. **Drain** -- non-blocking reads pull any frames buffered before
    ///    transmission. Events are classified and applied; a non-event
    ///    frame here is a stray reply from an earlier aborted transaction
    ///    and is logged and discarded.
    /// 2. **Transmit** -- the command is written verbatim, framing markers
    ///    included. A write failure aborts the transaction with
    ///    [`Error::TransportWrite`] before any read is attempted.
    /// 3. **Collect** -- frames are read and classified until a non-event
    ///    frame (the reply) arrives, per the [`WaitPolicy`].
    ///
    /// The returned frame is the raw reply; validating it against the
    /// expected reply grammar is the caller's job.
    pub async fn execute(
        &mut self,
        cmd: &[u8],
        policy: WaitPolicy,
        classifier: &mut dyn EventClassifier,
    ) -> Result<Frame> {
        while let Some(frame) = self.next_frame(false).await? {
            match classifier.classify(&frame) {
                Classification::Event => {
                    debug!(frame = %frame, "stale event applied during drain");
                }
                Classification::NotAnEvent => {
                    warn!(frame = %frame, "discarding stray reply from an earlier transaction");
                }
            }
        }

        debug!(cmd = %String::from_utf8_lossy(cmd), ?policy, "sending command");
        self.transport
            .send(cmd)
            .await
            .map_err(|e| Error::TransportWrite(e.to_string()))?;
        self.transport
            .flush()
            .await
            .map_err(|e| Error::TransportWrite(e.to_string()))?;

        let cap = std::time::Instant::now() + self.read_timeout * TRANSACTION_CAP_FACTOR;
        let mut block = true;

        loop {
            match self.next_frame(block).await {
                Ok(Some(frame)) => match classifier.classify(&frame) {
                    Classification::NotAnEvent => {
                        debug!(reply = %frame, "reply received");
                        return Ok(frame);
                    }
                    Classification::Event => {
                        if policy == WaitPolicy::NoWait {
                            block = false;
                        }
                    }
                },
                // Only reachable in non-blocking mode: the backlog is
                // empty and the fire-and-forget command owes no reply.
                Ok(None) => return Ok(Frame::empty()),
                Err(Error::Timeout) => {
                    return match policy {
                        WaitPolicy::Wait => Err(Error::Timeout),
                        WaitPolicy::NoWait => Ok(Frame::empty()),
                    };
                }
                Err(e) => return Err(e),
            }

            if std::time::Instant::now() >= cap {
                warn!(cmd = %String::from_utf8_lossy(cmd), "transaction wall-clock cap reached during event flood");
                return match policy {
                    WaitPolicy::Wait => Err(Error::Timeout),
                    WaitPolicy::NoWait => Ok(Frame::empty()),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;

    /// Minimal scripted transport. Chunks queued with `push_now` are
    /// available to `receive` immediately (stray pre-command data);
    /// chunks queued with `push_reply` become available only after the
    /// next `send`, like a device answering a command.
    struct StubTransport {
        available: VecDeque<Vec<u8>>,
        after_send: VecDeque<Vec<u8>>,
        fail_send: bool,
    }

    impl StubTransport {
        fn new() -> Self {
            StubTransport {
                available: VecDeque::new(),
                after_send: VecDeque::new(),
                fail_send: false,
            }
        }

        fn push_now(&mut self, bytes: &[u8]) {
            self.available.push_back(bytes.to_vec());
        }

        fn push_reply(&mut self, bytes: &[u8]) {
            self.after_send.push_back(bytes.to_vec());
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(&mut self, data: &[u8]) -> Result<()> {
            if self.fail_send {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "write failed",
                )));
            }
            if let Some(reply) = self.after_send.pop_front() {
                self.available.push_back(reply);
            }
            Ok(())
        }

        async fn receive(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
            match self.available.pop_front() {
                Some(chunk) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    Ok(n)
                }
                None => Err(Error::Timeout),
            }
        }

        async fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        async fn close(&mut self) -> Result<()> {
            Ok(())
        }

        fn is_connected(&self) -> bool {
            true
        }
    }

    /// Classifier treating any frame starting with `:Z1` as an event.
    struct PrefixClassifier {
        events: Vec<String>,
    }

    impl PrefixClassifier {
        fn new() -> Self {
            PrefixClassifier { events: Vec::new() }
        }
    }

    impl EventClassifier for PrefixClassifier {
        fn classify(&mut self, frame: &Frame) -> Classification {
            if frame.as_str().starts_with(":Z1") {
                self.events.push(frame.as_str().to_string());
                Classification::Event
            } else {
                Classification::NotAnEvent
            }
        }
    }

    fn channel_with(stub: StubTransport) -> Channel {
        Channel::new(Box::new(stub), b'#', Duration::from_millis(50))
    }

    #[tokio::test]
    async fn wait_returns_reply_after_events() {
        let mut stub = StubTransport::new();
        stub.push_reply(b":Z1303#:Z1301#reply#");
        let mut channel = channel_with(stub);
        let mut classifier = PrefixClassifier::new();

        let reply = channel
            .execute(b":X34#", WaitPolicy::Wait, &mut classifier)
            .await
            .unwrap();

        assert_eq!(reply.as_str(), "reply");
        assert_eq!(classifier.events, vec![":Z1303", ":Z1301"]);
    }

    #[tokio::test]
    async fn wait_times_out_without_reply() {
        let stub = StubTransport::new();
        let mut channel = channel_with(stub);
        let mut classifier = PrefixClassifier::new();

        let result = channel
            .execute(b":X34#", WaitPolicy::Wait, &mut classifier)
            .await;

        assert!(matches!(result, Err(Error::Timeout)));
    }

    #[tokio::test]
    async fn nowait_succeeds_with_empty_reply_when_silent() {
        let stub = StubTransport::new();
        let mut channel = channel_with(stub);
        let mut classifier = PrefixClassifier::new();

        let reply = channel
            .execute(b":Q#", WaitPolicy::NoWait, &mut classifier)
            .await
            .unwrap();

        assert!(reply.is_empty());
    }

    #[tokio::test]
    async fn nowait_consumes_event_then_returns_empty() {
        let mut stub = StubTransport::new();
        stub.push_reply(b":Z1330#");
        let mut channel = channel_with(stub);
        let mut classifier = PrefixClassifier::new();

        let reply = channel
            .execute(b":X3C#", WaitPolicy::NoWait, &mut classifier)
            .await
            .unwrap();

        assert!(reply.is_empty());
        assert_eq!(classifier.events, vec![":Z1330"]);
    }

    #[tokio::test]
    async fn write_failure_aborts_before_any_read() {
        let mut stub = StubTransport::new();
        stub.fail_send = true;
        // If the engine attempted a read after a failed write, this
        // pending reply would leak into the result.
        stub.push_reply(b"reply#");
        let mut channel = channel_with(stub);
        let mut classifier = PrefixClassifier::new();

        let result = channel
            .execute(b":X362#", WaitPolicy::Wait, &mut classifier)
            .await;

        assert!(matches!(result, Err(Error::TransportWrite(_))));
        assert!(classifier.events.is_empty());
    }

    #[tokio::test]
    async fn drain_applies_stray_events_before_transmit() {
        let mut stub = StubTransport::new();
        // Two stray events buffered before the command goes out, then the
        // genuine reply.
        stub.push_now(b":Z1000#:Z1103#");
        stub.push_reply(b"pB#");
        let mut channel = channel_with(stub);
        let mut classifier = PrefixClassifier::new();

        let reply = channel
            .execute(b":X362#", WaitPolicy::Wait, &mut classifier)
            .await
            .unwrap();

        assert_eq!(reply.as_str(), "pB");
        assert_eq!(classifier.events, vec![":Z1000", ":Z1103"]);
    }

    #[tokio::test]
    async fn drain_discards_stray_replies() {
        let mut stub = StubTransport::new();
        stub.push_now(b"leftover#");
        stub.push_reply(b"real#");
        let mut channel = channel_with(stub);
        let mut classifier = PrefixClassifier::new();

        let reply = channel
            .execute(b":GR#", WaitPolicy::Wait, &mut classifier)
            .await
            .unwrap();

        // The stray pre-command frame is discarded, not returned.
        assert_eq!(reply.as_str(), "real");
    }

    #[tokio::test]
    async fn unterminated_reply_is_returned_not_dropped() {
        let mut stub = StubTransport::new();
        stub.push_reply(b"halfreply");
        let mut channel = channel_with(stub);
        let mut classifier = PrefixClassifier::new();

        let reply = channel
            .execute(b":GVP#", WaitPolicy::Wait, &mut classifier)
            .await
            .unwrap();

        assert_eq!(reply.as_str(), "halfreply");
    }

    #[tokio::test]
    async fn next_frame_nonblocking_returns_none_when_idle() {
        let stub = StubTransport::new();
        let mut channel = channel_with(stub);

        let result = channel.next_frame(false).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn next_frame_keeps_partial_content_when_nonblocking() {
        let mut stub = StubTransport::new();
        stub.push_now(b"par");
        let mut channel = channel_with(stub);

        // Partial content must stay buffered, not surface as a frame.
        assert!(channel.next_frame(false).await.unwrap().is_none());

        // Once the rest arrives, the frame completes.
        channel.rx_buf.extend_from_slice(b"tial#");
        let frame = channel.next_frame(false).await.unwrap().unwrap();
        assert_eq!(frame.as_str(), "partial");
    }

    #[tokio::test]
    async fn split_frames_across_chunks() {
        let mut stub = StubTransport::new();
        stub.push_now(b":Z13");
        stub.push_now(b"03#ok#");
        let mut channel = channel_with(stub);

        let first = channel.next_frame(true).await.unwrap().unwrap();
        assert_eq!(first.as_str(), ":Z1303");
        let second = channel.next_frame(true).await.unwrap().unwrap();
        assert_eq!(second.as_str(), "ok");
    }

    #[tokio::test]
    async fn empty_frame_is_valid() {
        let mut stub = StubTransport::new();
        stub.push_now(b"#");
        let mut channel = channel_with(stub);

        let frame = channel.next_frame(true).await.unwrap().unwrap();
        assert!(frame.is_empty());
    }

    #[tokio::test]
    async fn classifying_same_event_twice_is_idempotent() {
        let mut stub = StubTransport::new();
        stub.push_reply(b":Z1303#:Z1303#done#");
        let mut channel = channel_with(stub);
        let mut classifier = PrefixClassifier::new();

        let reply = channel
            .execute(b":X34#", WaitPolicy::Wait, &mut classifier)
            .await
            .unwrap();

        assert_eq!(reply.as_str(), "done");
        assert_eq!(classifier.events.len(), 2);
        assert_eq!(classifier.events[0], classifier.events[1]);
    }
}
