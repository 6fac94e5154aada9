//! Terminator-delimited protocol frames.
//!
//! Both supported wire protocols are ASCII streams in which each message
//! -- solicited reply or unsolicited event alike -- ends with a single
//! sentinel byte (`#`). A [`Frame`] is one such message with the
//! terminator stripped. Zero-length frames are valid and meaningful (a
//! bare acknowledgement).

use std::fmt;

/// One terminator-stripped protocol message.
///
/// Frames are immutable once constructed. The terminator byte never
/// appears inside a frame's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(String);

impl Frame {
    /// Create a frame from already-stripped content bytes.
    ///
    /// Non-UTF-8 bytes are replaced; both protocols are plain ASCII, so
    /// replacement only occurs on line noise.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Frame(String::from_utf8_lossy(bytes).into_owned())
    }

    /// The empty frame, used as the successful result of a fire-and-forget
    /// command that produced no reply.
    pub fn empty() -> Self {
        Frame(String::new())
    }

    /// The frame content as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the frame content in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the frame has no content.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Frame {
    fn from(s: &str) -> Self {
        Frame(s.to_string())
    }
}

/// Split the next complete frame off the front of a receive buffer.
///
/// Scans `buf` for `terminator`. On a hit, returns the frame content
/// (terminator stripped) and the number of bytes consumed (content plus
/// terminator); the caller drains that many bytes. Returns `None` when
/// the buffer holds no complete frame yet -- partial content is left in
/// place for the next read cycle, so no frame is ever truncated.
pub fn split_frame(buf: &[u8], terminator: u8) -> Option<(Frame, usize)> {
    let pos = buf.iter().position(|&b| b == terminator)?;
    Some((Frame::from_bytes(&buf[..pos]), pos + 1))
}
