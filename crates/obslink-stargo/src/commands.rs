//! StarGo command builders and reply parsers.
//!
//! This module provides functions to construct command byte sequences
//! for all supported mount operations and to parse the corresponding
//! replies.
//!
//! All functions are pure -- they produce or consume byte vectors /
//! string slices without performing any I/O. The driver in
//! [`mount`](crate::mount) is responsible for sending the bytes through
//! the transaction engine and feeding the reply frames back into the
//! parsers.
//!
//! # Command reference
//!
//! The verbs are the StarGo firmware's LX200 dialect: the classic `G*`,
//! `S*`, `M*`, `R*`, `T*`, `Q` and `CM` families plus Avalon's `X*` and
//! `TT*F*` extensions for parking, motion status, guiding configuration,
//! and meridian-flip control.

use obslink_core::error::{Error, Result};
use obslink_core::helpers::split_sexagesimal;
use obslink_core::types::{MotorPhase, ParkState, PierSide, SlewRate, TrackMode};

use crate::protocol::encode_command;

/// One of the four manual motion directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// The single-letter direction suffix used by the `M`/`Q`/`Mg`
    /// command families.
    fn letter(&self) -> char {
        match self {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
        }
    }
}

// ---------------------------------------------------------------
// Command builders -- queries
// ---------------------------------------------------------------

/// Build a "read right ascension" command (`:GR#`).
pub fn cmd_get_ra() -> Vec<u8> {
    encode_command("GR")
}

/// Build a "read declination" command (`:GD#`).
pub fn cmd_get_dec() -> Vec<u8> {
    encode_command("GD")
}

/// Build a "read site latitude" command (`:Gt#`).
pub fn cmd_get_site_latitude() -> Vec<u8> {
    encode_command("Gt")
}

/// Build a "read site longitude" command (`:Gg#`).
pub fn cmd_get_site_longitude() -> Vec<u8> {
    encode_command("Gg")
}

/// Build a "read local time" command (`:GL#`).
pub fn cmd_get_local_time() -> Vec<u8> {
    encode_command("GL")
}

/// Build a "read local date" command (`:GC#`).
pub fn cmd_get_local_date() -> Vec<u8> {
    encode_command("GC")
}

/// Build a "read UTC offset" command (`:GG#`).
pub fn cmd_get_utc_offset() -> Vec<u8> {
    encode_command("GG")
}

/// Build a "read tracking frequency" command (`:GT#`).
pub fn cmd_get_track_frequency() -> Vec<u8> {
    encode_command("GT")
}

/// Build a "read manufacturer name" command (`:GVP#`).
pub fn cmd_get_manufacturer() -> Vec<u8> {
    encode_command("GVP")
}

/// Build a "read firmware version" command (`:GVN#`).
pub fn cmd_get_firmware_version() -> Vec<u8> {
    encode_command("GVN")
}

/// Build a "read firmware date" command (`:GVD#`).
pub fn cmd_get_firmware_date() -> Vec<u8> {
    encode_command("GVD")
}

/// Build a "query motion state" command (`:X3C#`).
///
/// The answer arrives as the pushed `:Z1mts#` event, not as a regular
/// reply; send with `NoWait` and let the classifier absorb it.
pub fn cmd_query_motion_state() -> Vec<u8> {
    encode_command("X3C")
}

/// Build a "query slew status" command (`:X34#`). Reply is `mxy` with
/// one motion-phase digit per axis; see [`parse_slew_status`].
pub fn cmd_query_slew_status() -> Vec<u8> {
    encode_command("X34")
}

/// Build a "query park/sync status" command (`:X38#`). Reply is
/// `p0`/`p1`/`p2`; see [`parse_park_state`].
pub fn cmd_query_park_state() -> Vec<u8> {
    encode_command("X38")
}

/// Build a "query pier side" command (`:X39#`). Reply is `PX`/`PE`/`PW`;
/// see [`parse_pier_side`].
pub fn cmd_query_pier_side() -> Vec<u8> {
    encode_command("X39")
}

/// Build a "read guiding speeds" command (`:X22#`). Reply is `rrbdd`;
/// see [`parse_guide_speeds`].
pub fn cmd_get_guide_speeds() -> Vec<u8> {
    encode_command("X22")
}

/// Build a "query ST4 port state" command (`:TTGFh#`). Reply is
/// `vh0`/`vh1` (1 = enabled).
pub fn cmd_query_st4() -> Vec<u8> {
    encode_command("TTGFh")
}

/// Build a "query meridian flip state" command (`:TTGFs#`). Reply is
/// `vs0`/`vs1`; `0` means the flip is enabled (the flag stores the
/// *disabled* state).
pub fn cmd_query_meridian_flip() -> Vec<u8> {
    encode_command("TTGFs")
}

/// Build a "query forced meridian flip state" command (`:TTGFd#`).
/// Reply is `vd0`/`vd1` (1 = forced).
pub fn cmd_query_meridian_flip_forced() -> Vec<u8> {
    encode_command("TTGFd")
}

// ---------------------------------------------------------------
// Command builders -- motion
// ---------------------------------------------------------------

/// Build a "set target right ascension" command (`:Sr HH:MM:SS#`).
pub fn cmd_set_target_ra(ra_hours: f64) -> Vec<u8> {
    let (_, h, m, s) = split_sexagesimal(ra_hours);
    encode_command(&format!("Sr {h:02}:{m:02}:{s:02}"))
}

/// Build a "set target declination" command (`:Sd sDD*MM:SS #`).
///
/// The sign is emitted separately from the degree digits so the
/// negative-zero case (`-00*30:00` for -0.5 degrees) survives.
pub fn cmd_set_target_dec(dec_deg: f64) -> Vec<u8> {
    let (negative, d, m, s) = split_sexagesimal(dec_deg);
    let sign = if negative { '-' } else { '+' };
    encode_command(&format!("Sd {sign}{d:02}*{m:02}:{s:02} "))
}

/// Build a "slew to target" command (`:MS#`).
pub fn cmd_slew_to_target() -> Vec<u8> {
    encode_command("MS")
}

/// Build a "sync to target" command (`:CM#`).
pub fn cmd_sync_to_target() -> Vec<u8> {
    encode_command("CM")
}

/// Build an "abort all motion" command (`:Q#`).
pub fn cmd_abort() -> Vec<u8> {
    encode_command("Q")
}

/// Build a "start moving in a direction" command (`:Mn#` etc.).
pub fn cmd_move(dir: Direction) -> Vec<u8> {
    encode_command(&format!("M{}", dir.letter()))
}

/// Build a "stop moving in a direction" command (`:Qn#` etc.).
pub fn cmd_stop(dir: Direction) -> Vec<u8> {
    encode_command(&format!("Q{}", dir.letter()))
}

/// Build a timed pulse-guide command (`:Mgn0500#` etc.).
///
/// The duration is a zero-padded four-digit millisecond field; values
/// above 9999 ms cannot be encoded.
pub fn cmd_pulse_guide(dir: Direction, duration_ms: u32) -> Result<Vec<u8>> {
    if duration_ms > 9999 {
        return Err(Error::InvalidParameter(format!(
            "pulse duration {duration_ms} ms exceeds the 4-digit field"
        )));
    }
    Ok(encode_command(&format!("Mg{}{duration_ms:04}", dir.letter())))
}

/// Build a "set slew rate" command (`:RG#`, `:RC#`, `:RM#`, `:RS#`).
pub fn cmd_set_slew_rate(rate: SlewRate) -> Vec<u8> {
    let verb = match rate {
        SlewRate::Guide => "RG",
        SlewRate::Centering => "RC",
        SlewRate::Find => "RM",
        SlewRate::Max => "RS",
    };
    encode_command(verb)
}

// ---------------------------------------------------------------
// Command builders -- tracking
// ---------------------------------------------------------------

/// Build a "set tracking mode" command (`:TQ#`, `:TS#`, `:TL#`, `:TM#`).
pub fn cmd_set_track_mode(mode: TrackMode) -> Vec<u8> {
    let verb = match mode {
        TrackMode::Sidereal => "TQ",
        TrackMode::Solar => "TS",
        TrackMode::Lunar => "TL",
        TrackMode::None => "TM",
    };
    encode_command(verb)
}

/// Build a "tracking on/off" command (`:X122#` / `:X120#`).
pub fn cmd_set_tracking(enable: bool) -> Vec<u8> {
    encode_command(if enable { "X122" } else { "X120" })
}

// ---------------------------------------------------------------
// Command builders -- park and home
// ---------------------------------------------------------------

/// Build a "park the mount" command (`:X362#`). Expected reply: `pB`.
pub fn cmd_park() -> Vec<u8> {
    encode_command("X362")
}

/// Build an "unpark the mount" command (`:X370#`). Expected reply: `p0`.
pub fn cmd_unpark() -> Vec<u8> {
    encode_command("X370")
}

/// Build a "store current position as park position" command (`:X352#`).
/// Expected reply starts with `0`.
pub fn cmd_set_park_position() -> Vec<u8> {
    encode_command("X352")
}

/// Build a "slew to home position" command (`:X361#`). Expected reply:
/// `pA`.
pub fn cmd_goto_home() -> Vec<u8> {
    encode_command("X361")
}

/// Build a "sync home position to the given LST" command
/// (`:X31HHMMSS#`).
pub fn cmd_sync_home(lst_hours: f64) -> Vec<u8> {
    let (_, h, m, s) = split_sexagesimal(lst_hours);
    encode_command(&format!("X31{h:02}{m:02}{s:02}"))
}

/// Build a "set the mount's sidereal time" command (`:X32HHMMSS#`),
/// issued before unparking. Expected reply starts with `0`.
pub fn cmd_set_sidereal_time(lst_hours: f64) -> Vec<u8> {
    let (_, h, m, s) = split_sexagesimal(lst_hours);
    encode_command(&format!("X32{h:02}{m:02}{s:02}"))
}

// ---------------------------------------------------------------
// Command builders -- guiding and meridian flip
// ---------------------------------------------------------------

/// Build a "set RA guiding speed" command (`:X20rr#`, percentage).
pub fn cmd_set_guide_speed_ra(percent: u8) -> Result<Vec<u8>> {
    if percent > 99 {
        return Err(Error::InvalidParameter(format!(
            "RA guide speed {percent}% exceeds the 2-digit field"
        )));
    }
    Ok(encode_command(&format!("X20{percent:02}")))
}

/// Build a "set DEC guiding speed" command (`:X21dd#`, percentage).
pub fn cmd_set_guide_speed_dec(percent: u8) -> Result<Vec<u8>> {
    if percent > 99 {
        return Err(Error::InvalidParameter(format!(
            "DEC guide speed {percent}% exceeds the 2-digit field"
        )));
    }
    Ok(encode_command(&format!("X21{percent:02}")))
}

/// Build an "enable/disable the ST4 guide port" command
/// (`:TTSFh#` / `:TTRFh#`).
pub fn cmd_set_st4(enable: bool) -> Vec<u8> {
    encode_command(if enable { "TTSFh" } else { "TTRFh" })
}

/// Build an "enable/disable the meridian flip" command.
///
/// The firmware flag stores the disabled state: `:TTRFs#` clears it
/// (flip enabled), `:TTSFs#` sets it (flip disabled).
pub fn cmd_set_meridian_flip(enable: bool) -> Vec<u8> {
    encode_command(if enable { "TTRFs" } else { "TTSFs" })
}

/// Build a "force/unforce the meridian flip" command
/// (`:TTSFd#` / `:TTRFd#`).
pub fn cmd_set_meridian_flip_forced(forced: bool) -> Vec<u8> {
    encode_command(if forced { "TTSFd" } else { "TTRFd" })
}

// ---------------------------------------------------------------
// Command builders -- site and time
// ---------------------------------------------------------------

/// Build a "set site latitude" command (`:StsDD*MM:SS#`).
pub fn cmd_set_site_latitude(latitude_deg: f64) -> Vec<u8> {
    let (negative, d, m, s) = split_sexagesimal(latitude_deg);
    let sign = if negative { '-' } else { '+' };
    encode_command(&format!("St{sign}{d:02}*{m:02}:{s:02}"))
}

/// Build a "set site longitude" command (`:Sg+DDD*MM:SS#`).
///
/// The longitude is normalized into `-180.0..=180.0` first, matching
/// what the firmware expects.
pub fn cmd_set_site_longitude(longitude_deg: f64) -> Vec<u8> {
    let mut lon = longitude_deg;
    if lon > 180.0 {
        lon -= 360.0;
    }
    if lon < -180.0 {
        lon += 360.0;
    }
    let (negative, d, m, s) = split_sexagesimal(lon);
    let sign = if negative { '-' } else { '+' };
    encode_command(&format!("Sg{sign}{d:03}*{m:02}:{s:02}"))
}

/// Build a "set local time" command (`:SL HH:MM:SS#`).
pub fn cmd_set_local_time(hour: u8, minute: u8, second: u8) -> Vec<u8> {
    encode_command(&format!("SL {hour:02}:{minute:02}:{second:02}"))
}

/// Build a "set local date" command (`:SC MM/DD/YY#`).
pub fn cmd_set_local_date(month: u8, day: u8, year: u16) -> Vec<u8> {
    let yy = year % 100;
    encode_command(&format!("SC {month:02}/{day:02}/{yy:02}"))
}

/// Build a "set UTC offset" command (`:SG sHH#`).
///
/// The wire value is the number of hours added to local time to reach
/// UTC -- the opposite sign of the conventional offset, so the value is
/// negated here.
pub fn cmd_set_utc_offset(offset_hours: f64) -> Vec<u8> {
    let hours = (-offset_hours).round() as i32;
    let sign = if hours < 0 { '-' } else { '+' };
    encode_command(&format!("SG {sign}{:02}", hours.abs()))
}

// ---------------------------------------------------------------
// Reply parsers
// ---------------------------------------------------------------

/// Parse the `mxy` reply of the slew-status query into per-axis motion
/// phases (RA/AZ first, DEC/ALT second).
pub fn parse_slew_status(reply: &str) -> Result<(MotorPhase, MotorPhase)> {
    let fields = reply
        .strip_prefix('m')
        .filter(|f| f.len() == 2)
        .ok_or_else(|| malformed("slew status", reply))?;

    let mut digits = fields.chars().map(|c| c.to_digit(10));
    let x = digits
        .next()
        .flatten()
        .and_then(|d| MotorPhase::from_code(d as u8))
        .ok_or_else(|| malformed("slew status", reply))?;
    let y = digits
        .next()
        .flatten()
        .and_then(|d| MotorPhase::from_code(d as u8))
        .ok_or_else(|| malformed("slew status", reply))?;

    Ok((x, y))
}

/// Parse the `p0`/`p1`/`p2` reply of the park-status query.
pub fn parse_park_state(reply: &str) -> Result<ParkState> {
    reply
        .strip_prefix('p')
        .and_then(|f| f.parse::<u8>().ok())
        .and_then(ParkState::from_code)
        .ok_or_else(|| malformed("park state", reply))
}

/// Parse the `PX`/`PE`/`PW` reply of the pier-side query.
pub fn parse_pier_side(reply: &str) -> Result<PierSide> {
    reply
        .strip_prefix('P')
        .and_then(|f| f.chars().next())
        .and_then(PierSide::from_code)
        .ok_or_else(|| malformed("pier side", reply))
}

/// Parse the `rrbdd` reply of the guiding-speeds query into RA and DEC
/// percentages.
pub fn parse_guide_speeds(reply: &str) -> Result<(u8, u8)> {
    let (ra, dec) = reply
        .split_once('b')
        .ok_or_else(|| malformed("guide speeds", reply))?;
    let ra = ra
        .trim()
        .parse::<u8>()
        .map_err(|_| malformed("guide speeds", reply))?;
    let dec = dec
        .trim()
        .parse::<u8>()
        .map_err(|_| malformed("guide speeds", reply))?;
    Ok((ra, dec))
}

/// Parse a `v<letter><digit>` flag reply (`vh1`, `vs0`, `vd1`, ...)
/// and return whether the digit is `1`.
///
/// Interpreting what a set flag *means* is the caller's job -- for the
/// meridian flip the firmware stores the disabled state, so `vs0` means
/// the flip is on.
pub fn parse_flag(prefix: &str, reply: &str) -> Result<bool> {
    reply
        .strip_prefix(prefix)
        .and_then(|f| f.parse::<u8>().ok())
        .map(|digit| digit == 1)
        .ok_or_else(|| malformed("flag", reply))
}

/// Parse a sexagesimal reply (RA, DEC, site coordinates, local time).
pub fn parse_angle(reply: &str) -> Result<f64> {
    obslink_core::helpers::parse_sexagesimal(reply)
        .ok_or_else(|| malformed("sexagesimal value", reply))
}

/// Parse the `MM/DD/YY` local-date reply into `(year, month, day)`.
///
/// Two-digit years of 50 or more land in the 20th century, the rest in
/// the 21st.
pub fn parse_local_date(reply: &str) -> Result<(u16, u8, u8)> {
    let mut fields = reply.split('/');
    let month = next_number::<u8>(&mut fields).ok_or_else(|| malformed("date", reply))?;
    let day = next_number::<u8>(&mut fields).ok_or_else(|| malformed("date", reply))?;
    let yy = next_number::<u16>(&mut fields).ok_or_else(|| malformed("date", reply))?;

    let year = if yy >= 50 { 1900 + yy } else { 2000 + yy };
    Ok((year, month, day))
}

/// Parse the UTC-offset reply, flipping the wire sign back to the
/// conventional east-positive offset.
pub fn parse_utc_offset(reply: &str) -> Result<f64> {
    let raw: f64 = reply
        .trim()
        .parse()
        .map_err(|_| malformed("UTC offset", reply))?;
    Ok(-raw)
}

/// Parse the tracking-frequency reply (a plain decimal number).
pub fn parse_track_frequency(reply: &str) -> Result<f64> {
    reply
        .trim()
        .parse()
        .map_err(|_| malformed("tracking frequency", reply))
}

fn next_number<T: std::str::FromStr>(fields: &mut std::str::Split<'_, char>) -> Option<T> {
    fields.next()?.trim().parse().ok()
}

fn malformed(what: &str, reply: &str) -> Error {
    Error::MalformedReply(format!("expected {what}, got {reply:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---------------------------------------------------------------
    // Command encoding
    // ---------------------------------------------------------------

    #[test]
    fn queries() {
        assert_eq!(cmd_get_ra(), b":GR#");
        assert_eq!(cmd_get_dec(), b":GD#");
        assert_eq!(cmd_get_site_latitude(), b":Gt#");
        assert_eq!(cmd_get_site_longitude(), b":Gg#");
        assert_eq!(cmd_query_motion_state(), b":X3C#");
        assert_eq!(cmd_query_slew_status(), b":X34#");
        assert_eq!(cmd_query_park_state(), b":X38#");
        assert_eq!(cmd_query_pier_side(), b":X39#");
        assert_eq!(cmd_get_guide_speeds(), b":X22#");
    }

    #[test]
    fn set_target_ra() {
        assert_eq!(cmd_set_target_ra(12.5), b":Sr 12:30:00#");
        assert_eq!(cmd_set_target_ra(0.0), b":Sr 00:00:00#");
    }

    #[test]
    fn set_target_dec_positive() {
        assert_eq!(cmd_set_target_dec(45.25), b":Sd +45*15:00 #");
    }

    #[test]
    fn set_target_dec_negative() {
        assert_eq!(cmd_set_target_dec(-5.5), b":Sd -05*30:00 #");
    }

    #[test]
    fn set_target_dec_negative_zero() {
        // -0.5 degrees: the sign must survive the zero degree field.
        assert_eq!(cmd_set_target_dec(-0.5), b":Sd -00*30:00 #");
    }

    #[test]
    fn motion_commands() {
        assert_eq!(cmd_slew_to_target(), b":MS#");
        assert_eq!(cmd_sync_to_target(), b":CM#");
        assert_eq!(cmd_abort(), b":Q#");
        assert_eq!(cmd_move(Direction::North), b":Mn#");
        assert_eq!(cmd_move(Direction::West), b":Mw#");
        assert_eq!(cmd_stop(Direction::South), b":Qs#");
        assert_eq!(cmd_stop(Direction::East), b":Qe#");
    }

    #[test]
    fn pulse_guide() {
        assert_eq!(cmd_pulse_guide(Direction::North, 500).unwrap(), b":Mgn0500#");
        assert_eq!(cmd_pulse_guide(Direction::West, 9999).unwrap(), b":Mgw9999#");
        assert!(cmd_pulse_guide(Direction::East, 10_000).is_err());
    }

    #[test]
    fn slew_rates() {
        assert_eq!(cmd_set_slew_rate(SlewRate::Guide), b":RG#");
        assert_eq!(cmd_set_slew_rate(SlewRate::Centering), b":RC#");
        assert_eq!(cmd_set_slew_rate(SlewRate::Find), b":RM#");
        assert_eq!(cmd_set_slew_rate(SlewRate::Max), b":RS#");
    }

    #[test]
    fn track_modes() {
        assert_eq!(cmd_set_track_mode(TrackMode::Sidereal), b":TQ#");
        assert_eq!(cmd_set_track_mode(TrackMode::Solar), b":TS#");
        assert_eq!(cmd_set_track_mode(TrackMode::Lunar), b":TL#");
        assert_eq!(cmd_set_track_mode(TrackMode::None), b":TM#");
    }

    #[test]
    fn tracking_on_off() {
        assert_eq!(cmd_set_tracking(true), b":X122#");
        assert_eq!(cmd_set_tracking(false), b":X120#");
    }

    #[test]
    fn park_commands() {
        assert_eq!(cmd_park(), b":X362#");
        assert_eq!(cmd_unpark(), b":X370#");
        assert_eq!(cmd_set_park_position(), b":X352#");
        assert_eq!(cmd_goto_home(), b":X361#");
    }

    #[test]
    fn home_and_lst() {
        assert_eq!(cmd_sync_home(12.5), b":X31123000#");
    }

    #[test]
    fn sidereal_time() {
        assert_eq!(cmd_set_sidereal_time(23.0 + 59.0 / 60.0), b":X32235900#");
    }

    #[test]
    fn guide_speeds() {
        assert_eq!(cmd_set_guide_speed_ra(5).unwrap(), b":X2005#");
        assert_eq!(cmd_set_guide_speed_dec(80).unwrap(), b":X2180#");
        assert!(cmd_set_guide_speed_ra(100).is_err());
    }

    #[test]
    fn st4_and_flip() {
        assert_eq!(cmd_query_st4(), b":TTGFh#");
        assert_eq!(cmd_set_st4(true), b":TTSFh#");
        assert_eq!(cmd_set_st4(false), b":TTRFh#");
        // The firmware flag stores the disabled state.
        assert_eq!(cmd_set_meridian_flip(true), b":TTRFs#");
        assert_eq!(cmd_set_meridian_flip(false), b":TTSFs#");
        assert_eq!(cmd_set_meridian_flip_forced(true), b":TTSFd#");
        assert_eq!(cmd_set_meridian_flip_forced(false), b":TTRFd#");
    }

    #[test]
    fn site_latitude() {
        assert_eq!(cmd_set_site_latitude(48.25), b":St+48*15:00#");
        assert_eq!(cmd_set_site_latitude(-33.5), b":St-33*30:00#");
    }

    #[test]
    fn site_longitude() {
        assert_eq!(cmd_set_site_longitude(11.5), b":Sg+011*30:00#");
        assert_eq!(cmd_set_site_longitude(-122.25), b":Sg-122*15:00#");
        // Values above 180 wrap into the negative range.
        assert_eq!(cmd_set_site_longitude(237.75), b":Sg-122*15:00#");
    }

    #[test]
    fn time_and_date() {
        assert_eq!(cmd_set_local_time(22, 5, 59), b":SL 22:05:59#");
        assert_eq!(cmd_set_local_date(8, 7, 2026), b":SC 08/07/26#");
        assert_eq!(cmd_set_utc_offset(2.0), b":SG -02#");
        assert_eq!(cmd_set_utc_offset(-7.0), b":SG +07#");
    }

    // ---------------------------------------------------------------
    // Reply parsing
    // ---------------------------------------------------------------

    #[test]
    fn slew_status_complete() {
        let (x, y) = parse_slew_status("m00").unwrap();
        assert!(x.is_settled() && y.is_settled());

        let (x, y) = parse_slew_status("m11").unwrap();
        assert!(x.is_settled() && y.is_settled());
    }

    #[test]
    fn slew_status_in_motion() {
        let (x, y) = parse_slew_status("m25").unwrap();
        assert_eq!(x, MotorPhase::Accelerating);
        assert_eq!(y, MotorPhase::HighSpeedSeek);
        assert!(!(x.is_settled() && y.is_settled()));
    }

    #[test]
    fn slew_status_malformed() {
        assert!(parse_slew_status("m0").is_err());
        assert!(parse_slew_status("m123").is_err());
        assert!(parse_slew_status("m9x").is_err());
        assert!(parse_slew_status("p0").is_err());
        assert!(parse_slew_status("").is_err());
    }

    #[test]
    fn park_states() {
        assert_eq!(parse_park_state("p0").unwrap(), ParkState::Unparked);
        assert_eq!(parse_park_state("p1").unwrap(), ParkState::UnparkedSynced);
        assert_eq!(parse_park_state("p2").unwrap(), ParkState::Parked);
        assert!(parse_park_state("p3").is_err());
        assert!(parse_park_state("q0").is_err());
    }

    #[test]
    fn pier_sides() {
        assert_eq!(parse_pier_side("PX").unwrap(), PierSide::Unknown);
        assert_eq!(parse_pier_side("PE").unwrap(), PierSide::East);
        assert_eq!(parse_pier_side("PW").unwrap(), PierSide::West);
        assert!(parse_pier_side("PN").is_err());
        assert!(parse_pier_side("").is_err());
    }

    #[test]
    fn guide_speed_reply() {
        assert_eq!(parse_guide_speeds("30b50").unwrap(), (30, 50));
        assert_eq!(parse_guide_speeds("05b99").unwrap(), (5, 99));
        assert!(parse_guide_speeds("3050").is_err());
        assert!(parse_guide_speeds("xxbyy").is_err());
    }

    #[test]
    fn flags() {
        assert!(parse_flag("vh", "vh1").unwrap());
        assert!(!parse_flag("vh", "vh0").unwrap());
        assert!(!parse_flag("vs", "vs0").unwrap());
        assert!(parse_flag("vd", "vd1").unwrap());
        assert!(parse_flag("vh", "vx1").is_err());
        assert!(parse_flag("vh", "vh").is_err());
    }

    #[test]
    fn angles() {
        assert_eq!(parse_angle("12:30:00").unwrap(), 12.5);
        assert_eq!(parse_angle("+45*15:00").unwrap(), 45.25);
        assert!(parse_angle("nonsense").is_err());
    }

    #[test]
    fn local_date() {
        assert_eq!(parse_local_date("08/07/26").unwrap(), (2026, 8, 7));
        assert_eq!(parse_local_date("12/31/99").unwrap(), (1999, 12, 31));
        assert!(parse_local_date("2026-08-07").is_err());
    }

    #[test]
    fn utc_offset_sign_flip() {
        assert_eq!(parse_utc_offset("-2").unwrap(), 2.0);
        assert_eq!(parse_utc_offset("7").unwrap(), -7.0);
        assert_eq!(parse_utc_offset("5.5").unwrap(), -5.5);
        assert!(parse_utc_offset("x").is_err());
    }

    #[test]
    fn track_frequency() {
        assert_eq!(parse_track_frequency("60.1").unwrap(), 60.1);
        assert!(parse_track_frequency("").is_err());
    }
}
