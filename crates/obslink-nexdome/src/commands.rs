//! NexDome command builders and reply parsers.
//!
//! Thin, pure wrappers over the [`protocol`](crate::protocol) encoder:
//! one function per operation the driver supports, plus the numeric
//! reply parsers. No I/O happens here; the driver sends the bytes
//! through the transaction engine and feeds reply frames back in.

use obslink_core::error::{Error, Result};

use crate::protocol::{encode_read, encode_write, Param, Target};

/// Build a "read firmware semantic version" command (`@FRR\r\n` /
/// `@FRS\r\n`).
pub fn cmd_firmware_version(target: Target) -> Vec<u8> {
    encode_read(Param::SemanticVersion, target)
}

/// Build a "read position in steps" command (`@PRR\r\n` / `@PRS\r\n`).
pub fn cmd_read_position(target: Target) -> Vec<u8> {
    encode_read(Param::Position, target)
}

/// Build a "sync rotator position to an azimuth" command
/// (`@PWR,<deg>\r\n`). The firmware takes whole degrees.
pub fn cmd_sync_azimuth(azimuth_deg: f64) -> Vec<u8> {
    encode_write(Param::Position, Target::Rotator, Some(azimuth_deg.round() as i32))
}

/// Build a "goto azimuth" command (`@GWR,<deg>\r\n`). The firmware
/// takes whole degrees.
pub fn cmd_goto_azimuth(azimuth_deg: f64) -> Vec<u8> {
    encode_write(Param::GotoAzimuth, Target::Rotator, Some(azimuth_deg.round() as i32))
}

/// Build an "open shutter" command (`@OWS\r\n`).
pub fn cmd_open_shutter() -> Vec<u8> {
    encode_write(Param::OpenShutter, Target::Shutter, None)
}

/// Build a "close shutter" command (`@CWS\r\n`).
pub fn cmd_close_shutter() -> Vec<u8> {
    encode_write(Param::CloseShutter, Target::Shutter, None)
}

/// Build an "emergency stop" command (`@SWR\r\n`).
pub fn cmd_emergency_stop() -> Vec<u8> {
    encode_write(Param::EmergencyStop, Target::Rotator, None)
}

/// Build a "read acceleration ramp" command (`@ARR\r\n` / `@ARS\r\n`).
pub fn cmd_read_acceleration_ramp(target: Target) -> Vec<u8> {
    encode_read(Param::AccelerationRamp, target)
}

/// Build a "write acceleration ramp" command (`@AWR,<ms>\r\n`).
pub fn cmd_write_acceleration_ramp(target: Target, milliseconds: i32) -> Vec<u8> {
    encode_write(Param::AccelerationRamp, target, Some(milliseconds))
}

/// Build a "read velocity" command (`@VRR\r\n` / `@VRS\r\n`).
pub fn cmd_read_velocity(target: Target) -> Vec<u8> {
    encode_read(Param::Velocity, target)
}

/// Build a "write velocity" command (`@VWR,<steps/s>\r\n`).
pub fn cmd_write_velocity(target: Target, steps_per_second: i32) -> Vec<u8> {
    encode_write(Param::Velocity, target, Some(steps_per_second))
}

/// Build a "read dead zone" command (`@DRR\r\n`).
pub fn cmd_read_dead_zone(target: Target) -> Vec<u8> {
    encode_read(Param::DeadZone, target)
}

/// Build a "write dead zone" command (`@DWR,<steps>\r\n`).
pub fn cmd_write_dead_zone(target: Target, steps: i32) -> Vec<u8> {
    encode_write(Param::DeadZone, target, Some(steps))
}

/// Build a "read travel range" command (`@RRR\r\n`).
pub fn cmd_read_range(target: Target) -> Vec<u8> {
    encode_read(Param::Range, target)
}

/// Build a "write travel range" command (`@RWR,<steps>\r\n`).
pub fn cmd_write_range(target: Target, steps: i32) -> Vec<u8> {
    encode_write(Param::Range, target, Some(steps))
}

/// Build a "read home position" command (`@HRR\r\n`).
pub fn cmd_read_home_position() -> Vec<u8> {
    encode_read(Param::HomePosition, Target::Rotator)
}

/// Build a "read battery voltage" command (`@BRR\r\n` / `@BRS\r\n`).
pub fn cmd_read_battery(target: Target) -> Vec<u8> {
    encode_read(Param::BatteryVoltage, target)
}

/// Parse a decimal integer reply value.
pub fn parse_int(value: &str) -> Result<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::MalformedReply(format!("expected integer, got {value:?}")))
}
