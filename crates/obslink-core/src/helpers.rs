//! Angle and time conversion helpers.
//!
//! The mount protocol expresses right ascension, declination, site
//! coordinates, and local time as sexagesimal ASCII fields. These helpers
//! convert between those fields and `f64` values (hours or degrees), and
//! compute the local sidereal time the mount needs for unparking and
//! home synchronization.

use std::time::{SystemTime, UNIX_EPOCH};

/// Parse a sexagesimal string into a decimal value.
///
/// Accepts the separator characters the mount uses interchangeably
/// (`:`, `*`, `'`, space) and one, two, or three numeric fields. A
/// leading `-` applies to the whole value, including the `-00*30:00`
/// case where the degree field itself is zero.
///
/// Returns `None` if no numeric field can be extracted.
///
/// # Example
///
/// ```
/// use obslink_core::helpers::parse_sexagesimal;
///
/// assert_eq!(parse_sexagesimal("12:30:00"), Some(12.5));
/// assert_eq!(parse_sexagesimal("+45*15:00"), Some(45.25));
/// assert_eq!(parse_sexagesimal("-00*30:00"), Some(-0.5));
/// assert_eq!(parse_sexagesimal("garbage"), None);
/// ```
pub fn parse_sexagesimal(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut fields = rest
        .split(|c: char| c == ':' || c == '*' || c == '\'' || c.is_whitespace())
        .filter(|f| !f.is_empty());

    let whole: f64 = fields.next()?.parse().ok()?;
    let minutes: f64 = match fields.next() {
        Some(f) => f.parse().ok()?,
        None => 0.0,
    };
    let seconds: f64 = match fields.next() {
        Some(f) => f.parse().ok()?,
        None => 0.0,
    };

    let value = whole + minutes / 60.0 + seconds / 3600.0;
    Some(if negative { -value } else { value })
}

/// Split a decimal value into sign and whole/minute/second components.
///
/// Seconds are rounded to the nearest integer, with carry into minutes
/// and the whole part so that `59.5` seconds never prints as `60`.
/// The sign is returned separately because the protocol's negative-zero
/// declination case (`-00*30:00`) cannot be represented by a signed
/// degree field alone.
///
/// # Example
///
/// ```
/// use obslink_core::helpers::split_sexagesimal;
///
/// assert_eq!(split_sexagesimal(12.5), (false, 12, 30, 0));
/// assert_eq!(split_sexagesimal(-0.5), (true, 0, 30, 0));
/// ```
pub fn split_sexagesimal(value: f64) -> (bool, u32, u32, u32) {
    let negative = value < 0.0;
    let total_seconds = (value.abs() * 3600.0).round() as u64;

    let whole = (total_seconds / 3600) as u32;
    let minutes = ((total_seconds / 60) % 60) as u32;
    let seconds = (total_seconds % 60) as u32;

    (negative, whole, minutes, seconds)
}

/// Days elapsed since the J2000.0 epoch (2000-01-01 12:00 UTC).
///
/// J2000.0 corresponds to Unix time 946 728 000.
fn days_since_j2000(time: SystemTime) -> f64 {
    let unix_seconds = match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        // Pre-1970 clocks only occur on badly misconfigured hosts; the
        // sidereal result is still well defined.
        Err(e) => -e.duration().as_secs_f64(),
    };
    (unix_seconds - 946_728_000.0) / 86_400.0
}

/// Compute the local sidereal time in hours for an east-positive
/// longitude in degrees.
///
/// Uses the standard GMST approximation
/// `18.697374558 + 24.06570982441908 * D` (D = days since J2000.0),
/// good to well under a second over the lifetime of any mount firmware.
/// The result is normalized to `0.0..24.0`.
pub fn local_sidereal_time(longitude_deg: f64, time: SystemTime) -> f64 {
    let d = days_since_j2000(time);
    let gmst = 18.697_374_558 + 24.065_709_824_419_08 * d;
    let lst = gmst + longitude_deg / 15.0;
    lst.rem_euclid(24.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const J2000_UNIX: u64 = 946_728_000;

    #[test]
    fn parse_hours() {
        assert_eq!(parse_sexagesimal("12:30:00"), Some(12.5));
        assert_eq!(parse_sexagesimal("00:00:00"), Some(0.0));
        assert_eq!(parse_sexagesimal("23:59:59"), Some(23.0 + 59.0 / 60.0 + 59.0 / 3600.0));
    }

    #[test]
    fn parse_degrees_with_star_separator() {
        assert_eq!(parse_sexagesimal("+45*15:00"), Some(45.25));
        assert_eq!(parse_sexagesimal("-12*00:00"), Some(-12.0));
    }

    #[test]
    fn parse_negative_zero_degrees() {
        // The sign must survive a zero degree field.
        assert_eq!(parse_sexagesimal("-00*30:00"), Some(-0.5));
    }

    #[test]
    fn parse_two_fields() {
        assert_eq!(parse_sexagesimal("10:30"), Some(10.5));
    }

    #[test]
    fn parse_single_field() {
        assert_eq!(parse_sexagesimal("42"), Some(42.0));
        assert_eq!(parse_sexagesimal("-3.5"), Some(-3.5));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_sexagesimal(""), None);
        assert_eq!(parse_sexagesimal("abc"), None);
        assert_eq!(parse_sexagesimal("12:xy:00"), None);
    }

    #[test]
    fn split_positive() {
        assert_eq!(split_sexagesimal(12.5), (false, 12, 30, 0));
        assert_eq!(split_sexagesimal(45.25), (false, 45, 15, 0));
    }

    #[test]
    fn split_negative() {
        assert_eq!(split_sexagesimal(-12.0), (true, 12, 0, 0));
        assert_eq!(split_sexagesimal(-0.5), (true, 0, 30, 0));
    }

    #[test]
    fn split_rounds_seconds_with_carry() {
        // 59.9999 degrees is 59d 59m 59.64s; rounding must carry cleanly
        // to 60d 0m 0s rather than print 59m 60s.
        assert_eq!(split_sexagesimal(59.9999), (false, 60, 0, 0));
    }

    #[test]
    fn round_trip() {
        for &value in &[0.0, 12.5, -0.5, 89.9875, -45.25] {
            let (negative, d, m, s) = split_sexagesimal(value);
            let rebuilt = (d as f64 + m as f64 / 60.0 + s as f64 / 3600.0)
                * if negative { -1.0 } else { 1.0 };
            assert!((rebuilt - value).abs() < 1.0 / 3600.0 + 1e-9, "value {value}");
        }
    }

    #[test]
    fn lst_at_j2000_greenwich() {
        let t = UNIX_EPOCH + Duration::from_secs(J2000_UNIX);
        let lst = local_sidereal_time(0.0, t);
        assert!((lst - 18.697_374_558).abs() < 1e-6);
    }

    #[test]
    fn lst_shifts_one_hour_per_15_degrees_east() {
        let t = UNIX_EPOCH + Duration::from_secs(J2000_UNIX);
        let greenwich = local_sidereal_time(0.0, t);
        let east15 = local_sidereal_time(15.0, t);
        assert!(((east15 - greenwich).rem_euclid(24.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn lst_is_normalized() {
        let t = UNIX_EPOCH + Duration::from_secs(J2000_UNIX + 86_400 * 365);
        for &lon in &[-180.0, -75.5, 0.0, 120.0, 179.9] {
            let lst = local_sidereal_time(lon, t);
            assert!((0.0..24.0).contains(&lst), "lon {lon} gave {lst}");
        }
    }
}
