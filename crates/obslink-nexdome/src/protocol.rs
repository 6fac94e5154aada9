//! NexDome wire-protocol encoder and event grammar (firmware v3+).
//!
//! The NexDome controller takes `@`-prefixed commands terminated with
//! CR LF and answers with `:`-prefixed, `#`-terminated messages. The
//! rotator unit also pushes unsolicited reports -- shutter radio-link
//! transitions and position updates while either motor is moving -- in
//! the same `:`/`#` format, freely interleaved with command replies.
//!
//! # Command format
//!
//! ```text
//! @<param><R|W><R|S>[,<value>]\r\n
//! ```
//!
//! - `param`: single-letter parameter verb (see [`Param`]).
//! - `R|W`: read or write.
//! - `R|S`: target unit, rotator or shutter (see [`Target`]).
//! - `value`: optional decimal argument for writes.
//!
//! # Reply format
//!
//! A read `@PRR` is answered with `:PRR<value>#`; the leading `:` and
//! any stray CR/LF padding are stripped by [`normalize`] before
//! matching. Writes are fire-and-forget.
//!
//! # Event signatures (fixed priority order)
//!
//! 1. `XB-><state>` -- shutter radio link; `Online` means connected.
//! 2. `P<steps>` -- rotator position report (integer remainder only).
//! 3. `S<steps>` -- shutter position report (integer remainder only).

use bytes::{BufMut, BytesMut};

/// Reply and event terminator byte.
pub const TERMINATOR: u8 = b'#';

/// Command start marker.
pub const COMMAND_START: u8 = b'@';

/// Rotator steps per degree of dome azimuth.
pub const STEPS_PER_DEGREE: f64 = 153.0;

/// The XBee link state the shutter reports when reachable.
pub const XBEE_ONLINE: &str = "Online";

/// Which unit a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The dome rotator (the unit holding the serial link).
    Rotator,
    /// The shutter unit, reached through the rotator's XBee radio.
    Shutter,
}

impl Target {
    /// The single-letter target suffix.
    pub fn letter(&self) -> char {
        match self {
            Target::Rotator => 'R',
            Target::Shutter => 'S',
        }
    }
}

/// Single-letter parameter verbs of the v3 firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// Semantic firmware version (`F`).
    SemanticVersion,
    /// Acceleration ramp time in milliseconds (`A`).
    AccelerationRamp,
    /// Motor velocity in steps per second (`V`).
    Velocity,
    /// Dead zone in steps (`D`).
    DeadZone,
    /// Travel range in steps (`R`).
    Range,
    /// Position in steps; writing syncs the position (`P`).
    Position,
    /// Goto azimuth in degrees (`G`).
    GotoAzimuth,
    /// Open the shutter (`O`).
    OpenShutter,
    /// Close the shutter (`C`).
    CloseShutter,
    /// Emergency stop (`S`).
    EmergencyStop,
    /// Home position in steps (`H`).
    HomePosition,
    /// Battery voltage reading (`B`).
    BatteryVoltage,
}

impl Param {
    /// The single-letter parameter verb.
    pub fn letter(&self) -> char {
        match self {
            Param::SemanticVersion => 'F',
            Param::AccelerationRamp => 'A',
            Param::Velocity => 'V',
            Param::DeadZone => 'D',
            Param::Range => 'R',
            Param::Position => 'P',
            Param::GotoAzimuth => 'G',
            Param::OpenShutter => 'O',
            Param::CloseShutter => 'C',
            Param::EmergencyStop => 'S',
            Param::HomePosition => 'H',
            Param::BatteryVoltage => 'B',
        }
    }
}

/// An unsolicited report decoded from a pushed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomeEvent {
    /// `XB-><state>`: the shutter radio link changed state.
    XbeeState(String),
    /// `P<steps>`: the rotator reported its position.
    RotatorPosition(i32),
    /// `S<steps>`: the shutter reported its position.
    ShutterPosition(i32),
}

fn encode(param: Param, rw: char, target: Target, value: Option<i32>) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(8);
    buf.put_u8(COMMAND_START);
    buf.put_u8(param.letter() as u8);
    buf.put_u8(rw as u8);
    buf.put_u8(target.letter() as u8);
    if let Some(value) = value {
        buf.put_slice(format!(",{value}").as_bytes());
    }
    buf.put_slice(b"\r\n");
    buf.to_vec()
}

/// Encode a parameter read command (`@FRR\r\n`).
pub fn encode_read(param: Param, target: Target) -> Vec<u8> {
    encode(param, 'R', target, None)
}

/// Encode a parameter write command (`@GWR,170\r\n`), with or without a
/// value argument.
pub fn encode_write(param: Param, target: Target, value: Option<i32>) -> Vec<u8> {
    encode(param, 'W', target, value)
}

/// Strip the leading `:` and any CR/LF padding from a frame.
///
/// The firmware newline-separates some messages, so frames can arrive
/// with stray line endings around the payload.
pub fn normalize(frame: &str) -> &str {
    let trimmed = frame.trim_matches(|c: char| c == '\r' || c == '\n' || c == ' ');
    trimmed.strip_prefix(':').unwrap_or(trimmed)
}

/// Extract the value from a read reply, if the frame echoes the given
/// parameter and target (`:FRR3.3.0#` for a `@FRR` read).
pub fn reply_value<'a>(frame: &'a str, param: Param, target: Target) -> Option<&'a str> {
    let body = normalize(frame);
    let mut chars = body.chars();
    if chars.next()? != param.letter() {
        return None;
    }
    if chars.next()? != 'R' {
        return None;
    }
    if chars.next()? != target.letter() {
        return None;
    }
    Some(chars.as_str())
}

/// Decode an unsolicited report frame.
///
/// Tries the event signatures in their fixed priority order; the first
/// match wins. Returns `None` for anything that is not an event -- a
/// `P`/`S` prefix only counts when the entire remainder is a decimal
/// step count, which is what keeps read replies like `PRR12345` out of
/// the event path.
pub fn decode_event(frame: &str) -> Option<DomeEvent> {
    let body = normalize(frame);

    if let Some(state) = body.strip_prefix("XB->") {
        return Some(DomeEvent::XbeeState(state.to_string()));
    }
    if let Some(steps) = body.strip_prefix('P') {
        if let Ok(steps) = steps.parse::<i32>() {
            return Some(DomeEvent::RotatorPosition(steps));
        }
    }
    if let Some(steps) = body.strip_prefix('S') {
        if let Ok(steps) = steps.parse::<i32>() {
            return Some(DomeEvent::ShutterPosition(steps));
        }
    }

    None
}

/// Convert a rotator step count to degrees of azimuth.
pub fn steps_to_degrees(steps: i32) -> f64 {
    steps as f64 / STEPS_PER_DEGREE
}

/// Parse a `major.minor.patch` semantic version string.
pub fn parse_semver(value: &str) -> Option<(u32, u32, u32)> {
    let mut fields = value.trim().split('.');
    let major = fields.next()?.parse().ok()?;
    let minor = fields.next()?.parse().ok()?;
    let patch = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---------------------------------------------------------------
    // Command encoding
    // ---------------------------------------------------------------

    #[test]
    fn encode_reads() {
        assert_eq!(encode_read(Param::SemanticVersion, Target::Rotator), b"@FRR\r\n");
        assert_eq!(encode_read(Param::Position, Target::Shutter), b"@PRS\r\n");
        assert_eq!(encode_read(Param::BatteryVoltage, Target::Rotator), b"@BRR\r\n");
    }

    #[test]
    fn encode_writes_with_value() {
        assert_eq!(encode_write(Param::GotoAzimuth, Target::Rotator, Some(170)), b"@GWR,170\r\n");
        assert_eq!(encode_write(Param::Position, Target::Rotator, Some(-20)), b"@PWR,-20\r\n");
        assert_eq!(
            encode_write(Param::Velocity, Target::Shutter, Some(800)),
            b"@VWS,800\r\n"
        );
    }

    #[test]
    fn encode_writes_without_value() {
        assert_eq!(encode_write(Param::OpenShutter, Target::Shutter, None), b"@OWS\r\n");
        assert_eq!(encode_write(Param::CloseShutter, Target::Shutter, None), b"@CWS\r\n");
        assert_eq!(
            encode_write(Param::EmergencyStop, Target::Rotator, None),
            b"@SWR\r\n"
        );
    }

    // ---------------------------------------------------------------
    // Normalization and reply matching
    // ---------------------------------------------------------------

    #[test]
    fn normalize_strips_colon_and_padding() {
        assert_eq!(normalize(":FRR3.3.0"), "FRR3.3.0");
        assert_eq!(normalize("\r\n:P12345"), "P12345");
        assert_eq!(normalize("XB->Online"), "XB->Online");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn reply_value_matches_echo() {
        assert_eq!(
            reply_value(":FRR3.3.0", Param::SemanticVersion, Target::Rotator),
            Some("3.3.0")
        );
        assert_eq!(
            reply_value(":PRR12345", Param::Position, Target::Rotator),
            Some("12345")
        );
        assert_eq!(
            reply_value(":ARS1500", Param::AccelerationRamp, Target::Shutter),
            Some("1500")
        );
    }

    #[test]
    fn reply_value_rejects_mismatches() {
        // Wrong parameter.
        assert_eq!(reply_value(":FRR3.3.0", Param::Position, Target::Rotator), None);
        // Wrong target.
        assert_eq!(reply_value(":PRR12345", Param::Position, Target::Shutter), None);
        // An event, not a read echo.
        assert_eq!(reply_value(":P12345", Param::Position, Target::Rotator), None);
        assert_eq!(reply_value("", Param::Position, Target::Rotator), None);
    }

    // ---------------------------------------------------------------
    // Event decoding
    // ---------------------------------------------------------------

    #[test]
    fn decode_xbee_states() {
        assert_eq!(
            decode_event(":XB->Online"),
            Some(DomeEvent::XbeeState("Online".into()))
        );
        assert_eq!(
            decode_event(":XB->Offline"),
            Some(DomeEvent::XbeeState("Offline".into()))
        );
        assert_eq!(
            decode_event(":XB->WaitAT"),
            Some(DomeEvent::XbeeState("WaitAT".into()))
        );
    }

    #[test]
    fn decode_position_reports() {
        assert_eq!(decode_event(":P12345"), Some(DomeEvent::RotatorPosition(12345)));
        assert_eq!(decode_event(":S-100"), Some(DomeEvent::ShutterPosition(-100)));
        assert_eq!(decode_event("P0"), Some(DomeEvent::RotatorPosition(0)));
    }

    #[test]
    fn read_echoes_are_not_events() {
        // The remainder after `P` is not a bare integer.
        assert_eq!(decode_event(":PRR12345"), None);
        assert_eq!(decode_event(":SER,0,0,55080,0,0"), None);
        assert_eq!(decode_event(":FRR3.3.0"), None);
    }

    #[test]
    fn junk_is_not_an_event() {
        assert_eq!(decode_event(""), None);
        assert_eq!(decode_event(":Pxyz"), None);
        assert_eq!(decode_event("left"), None);
    }

    // ---------------------------------------------------------------
    // Conversions
    // ---------------------------------------------------------------

    #[test]
    fn steps_to_degrees_uses_fixed_ratio() {
        assert_eq!(steps_to_degrees(0), 0.0);
        assert_eq!(steps_to_degrees(153), 1.0);
        assert_eq!(steps_to_degrees(27540), 180.0);
        assert!((steps_to_degrees(100) - 0.6535947712).abs() < 1e-9);
    }

    #[test]
    fn semver_parsing() {
        assert_eq!(parse_semver("3.3.0"), Some((3, 3, 0)));
        assert_eq!(parse_semver("10.0.1"), Some((10, 0, 1)));
        assert_eq!(parse_semver("3.3"), None);
        assert_eq!(parse_semver("3.3.0.1"), None);
        assert_eq!(parse_semver("abc"), None);
    }
}
