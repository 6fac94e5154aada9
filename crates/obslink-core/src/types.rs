//! Core types used throughout obslink.
//!
//! These are the enumerated device-state fields shared by the mount and
//! dome drivers, each with its wire-code mapping. State values are only
//! ever written by a driver's classifier/dispatcher as a side effect of a
//! fully decoded frame; a decode that fails part-way never touches them.

use std::fmt;

/// Power state of the mount's two axis motors.
///
/// Decoded from the first digit of the `:Z1mts` motion-state message:
/// `0` both off, `1` DEC only, `2` RA only, `3` both on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MotorState {
    /// Both motors unpowered.
    #[default]
    Off,
    /// DEC motor powered, RA motor off.
    DecOnly,
    /// RA motor powered, DEC motor off.
    RaOnly,
    /// Both motors powered.
    On,
}

impl MotorState {
    /// Map a wire digit to a motor state. Returns `None` for digits
    /// outside `0..=3`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MotorState::Off),
            1 => Some(MotorState::DecOnly),
            2 => Some(MotorState::RaOnly),
            3 => Some(MotorState::On),
            _ => None,
        }
    }
}

impl fmt::Display for MotorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MotorState::Off => "off",
            MotorState::DecOnly => "DEC only",
            MotorState::RaOnly => "RA only",
            MotorState::On => "on",
        };
        write!(f, "{s}")
    }
}

/// Tracking mode of the mount.
///
/// Decoded from the second digit of the `:Z1mts` motion-state message:
/// `0` none, `1` lunar, `2` solar, `3` sidereal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrackMode {
    /// No tracking at all.
    #[default]
    None,
    /// Tracking at lunar rate.
    Lunar,
    /// Tracking at solar rate.
    Solar,
    /// Tracking at sidereal rate.
    Sidereal,
}

impl TrackMode {
    /// Map a wire digit to a tracking mode. Returns `None` for digits
    /// outside `0..=3`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TrackMode::None),
            1 => Some(TrackMode::Lunar),
            2 => Some(TrackMode::Solar),
            3 => Some(TrackMode::Sidereal),
            _ => None,
        }
    }
}

impl fmt::Display for TrackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrackMode::None => "none",
            TrackMode::Lunar => "lunar",
            TrackMode::Solar => "solar",
            TrackMode::Sidereal => "sidereal",
        };
        write!(f, "{s}")
    }
}

/// Manual slew speed of the mount.
///
/// Decoded from the third digit of the `:Z1mts` motion-state message:
/// `0` guide, `1` centering, `2` find, `3` max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlewRate {
    /// Slowest speed, used for autoguider corrections.
    #[default]
    Guide,
    /// Centering speed.
    Centering,
    /// Finding speed.
    Find,
    /// Maximum slew speed.
    Max,
}

impl SlewRate {
    /// Map a wire digit to a slew rate. Returns `None` for digits
    /// outside `0..=3`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SlewRate::Guide),
            1 => Some(SlewRate::Centering),
            2 => Some(SlewRate::Find),
            3 => Some(SlewRate::Max),
            _ => None,
        }
    }
}

impl fmt::Display for SlewRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SlewRate::Guide => "guide",
            SlewRate::Centering => "centering",
            SlewRate::Find => "find",
            SlewRate::Max => "max",
        };
        write!(f, "{s}")
    }
}

/// Which side of the pier the telescope tube is on.
///
/// Decoded from the `:X39#` reply (`PX`, `PE`, `PW`). The firmware's
/// east/west lettering is preserved exactly as reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PierSide {
    /// The mount does not know its pier side.
    #[default]
    Unknown,
    /// East side of the pier.
    East,
    /// West side of the pier.
    West,
}

impl PierSide {
    /// Map the `:X39#` reply letter to a pier side. Returns `None` for
    /// unrecognized letters.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'X' => Some(PierSide::Unknown),
            'E' => Some(PierSide::East),
            'W' => Some(PierSide::West),
            _ => None,
        }
    }
}

impl fmt::Display for PierSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PierSide::Unknown => "unknown",
            PierSide::East => "east",
            PierSide::West => "west",
        };
        write!(f, "{s}")
    }
}

/// Park and synchronization status of the mount.
///
/// Decoded from the `:X38#` reply: `p0` unparked and unsynced, `p1`
/// unparked at the home position (synced), `p2` parked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParkState {
    /// Unparked, not synchronized.
    #[default]
    Unparked,
    /// Unparked and synchronized (at the home position).
    UnparkedSynced,
    /// Parked.
    Parked,
}

impl ParkState {
    /// Map a wire digit to a park state. Returns `None` for digits
    /// outside `0..=2`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ParkState::Unparked),
            1 => Some(ParkState::UnparkedSynced),
            2 => Some(ParkState::Parked),
            _ => None,
        }
    }

    /// `true` if the mount is parked.
    pub fn is_parked(&self) -> bool {
        matches!(self, ParkState::Parked)
    }

    /// `true` if the mount has been synchronized.
    pub fn is_synced(&self) -> bool {
        matches!(self, ParkState::UnparkedSynced | ParkState::Parked)
    }
}

impl fmt::Display for ParkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParkState::Unparked => "unparked",
            ParkState::UnparkedSynced => "unparked (synced)",
            ParkState::Parked => "parked",
        };
        write!(f, "{s}")
    }
}

/// Motion phase of one mount axis, from the `:X34#` slew-status reply.
///
/// The reply `mxy` carries one digit per axis (`x` RA/AZ, `y` DEC/ALT):
/// `0` stopped or unpowered, `1` back in tracking, `2` accelerating,
/// `3` decelerating, `4` refining at low speed, `5` seeking the target
/// at high speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotorPhase {
    /// Motor stopped or unpowered.
    Stopped,
    /// Motor returned to tracking.
    Tracking,
    /// Accelerating toward slew speed.
    Accelerating,
    /// Decelerating.
    Decelerating,
    /// Moving at low speed to refine the target position.
    LowSpeedRefine,
    /// Moving at high speed toward the target.
    HighSpeedSeek,
}

impl MotorPhase {
    /// Map a wire digit to a motor phase. Returns `None` for digits
    /// outside `0..=5`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MotorPhase::Stopped),
            1 => Some(MotorPhase::Tracking),
            2 => Some(MotorPhase::Accelerating),
            3 => Some(MotorPhase::Decelerating),
            4 => Some(MotorPhase::LowSpeedRefine),
            5 => Some(MotorPhase::HighSpeedSeek),
            _ => None,
        }
    }

    /// `true` if this axis has settled: stopped or back in tracking.
    ///
    /// A slew is complete iff both axes are settled.
    pub fn is_settled(&self) -> bool {
        matches!(self, MotorPhase::Stopped | MotorPhase::Tracking)
    }
}

impl fmt::Display for MotorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MotorPhase::Stopped => "stopped",
            MotorPhase::Tracking => "tracking",
            MotorPhase::Accelerating => "accelerating",
            MotorPhase::Decelerating => "decelerating",
            MotorPhase::LowSpeedRefine => "low-speed refine",
            MotorPhase::HighSpeedSeek => "high-speed seek",
        };
        write!(f, "{s}")
    }
}

/// Radio link state between the dome rotator and its shutter unit.
///
/// The shutter module talks to the rotator over an XBee link; the rotator
/// reports link transitions as `XB-><state>` events where `Online` means
/// connected and anything else (`Offline`, `Starting`, ...) means the
/// shutter is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShutterLink {
    /// The shutter module is reachable.
    Connected,
    /// The shutter module is not reachable.
    #[default]
    Disconnected,
}

impl fmt::Display for ShutterLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShutterLink::Connected => "connected",
            ShutterLink::Disconnected => "disconnected",
        };
        write!(f, "{s}")
    }
}
