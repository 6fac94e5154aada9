//! StarGo wire-protocol encoder and event grammar.
//!
//! The Avalon StarGo speaks an LX200 dialect over a serial link: every
//! command starts with `:` and ends with `#`, and every reply or pushed
//! message ends with `#`. Replies carry no terminator-independent
//! framing, so the `#` sentinel is the only message boundary.
//!
//! # Command format
//!
//! ```text
//! :<verb><params>#
//! ```
//!
//! - `verb`: one to five ASCII characters (e.g. `GR`, `MS`, `X38`,
//!   `TTGFh`).
//! - `params`: zero or more fixed-width ASCII fields (zero-padded
//!   integers, sign-prefixed sexagesimal components).
//! - Terminator: `#` (0x23).
//!
//! # Pushed motion-state events
//!
//! With the firmware's status push active, the mount spontaneously emits
//!
//! ```text
//! :Z1<m><t><s>#
//! ```
//!
//! one digit each for motor power, tracking mode, and slew rate. These
//! arrive interleaved with command replies at any time and are decoded
//! with [`decode_motion_state`].

use bytes::{BufMut, BytesMut};

use obslink_core::types::{MotorState, SlewRate, TrackMode};

/// Reply and event terminator byte.
pub const TERMINATOR: u8 = b'#';

/// Command start marker.
pub const COMMAND_START: u8 = b':';

/// Prefix of the pushed motion-state message (after terminator strip).
pub const MOTION_STATE_PREFIX: &str = ":Z1";

/// Encode a StarGo command into raw bytes ready for transmission.
///
/// Wraps the body in the `:`/`#` framing markers.
///
/// # Example
///
/// ```
/// use obslink_stargo::protocol::encode_command;
///
/// assert_eq!(encode_command("GR"), b":GR#");
/// assert_eq!(encode_command("Mgn0500"), b":Mgn0500#");
/// ```
pub fn encode_command(body: &str) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(body.len() + 2);
    buf.put_u8(COMMAND_START);
    buf.put_slice(body.as_bytes());
    buf.put_u8(TERMINATOR);
    buf.to_vec()
}

/// Decode a pushed motion-state event.
///
/// Expects the terminator-stripped frame `:Z1<m><t><s>` with exactly
/// three digits, each in `0..=3`. Returns `None` for anything else --
/// including a `:Z1` frame whose fields are out of range, so that a
/// partially valid push never half-updates the device state.
///
/// # Example
///
/// ```
/// use obslink_stargo::protocol::decode_motion_state;
/// use obslink_core::types::{MotorState, SlewRate, TrackMode};
///
/// let (motors, mode, rate) = decode_motion_state(":Z1303").unwrap();
/// assert_eq!(motors, MotorState::On);
/// assert_eq!(mode, TrackMode::None);
/// assert_eq!(rate, SlewRate::Max);
/// ```
pub fn decode_motion_state(frame: &str) -> Option<(MotorState, TrackMode, SlewRate)> {
    let fields = frame.strip_prefix(MOTION_STATE_PREFIX)?;
    if fields.len() != 3 {
        return None;
    }

    let mut digits = fields.chars().filter_map(|c| c.to_digit(10));
    let motors = MotorState::from_code(digits.next()? as u8)?;
    let mode = TrackMode::from_code(digits.next()? as u8)?;
    let rate = SlewRate::from_code(digits.next()? as u8)?;

    Some((motors, mode, rate))
}
