//! Device state-change notifications.
//!
//! Events are emitted by a driver's classifier/dispatcher through a
//! `tokio::sync::broadcast` channel whenever a device-state field is
//! derived from a decoded frame. The host glue layer subscribes to these
//! and maps them onto whatever external representation it exposes.

use crate::types::{MotorState, ParkState, PierSide, ShutterLink, SlewRate, TrackMode};

/// An event emitted when a device-state field receives a new value.
///
/// Subscribe via the `subscribe()` method on a driver. Events are
/// delivered on a best-effort basis through a bounded broadcast channel;
/// slow consumers may miss events under heavy load (e.g. position reports
/// streaming during a dome rotation).
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// The mount's motor power state changed.
    MotorStateChanged {
        /// New motor power state.
        state: MotorState,
    },

    /// The mount's tracking mode changed.
    TrackModeChanged {
        /// New tracking mode.
        mode: TrackMode,
    },

    /// The mount's manual slew rate changed.
    SlewRateChanged {
        /// New slew rate.
        rate: SlewRate,
    },

    /// The mount's pier side changed.
    PierSideChanged {
        /// New pier side.
        side: PierSide,
    },

    /// The mount's park/sync status changed.
    ParkStateChanged {
        /// New park state.
        state: ParkState,
    },

    /// The dome shutter's radio link state changed.
    ShutterLinkChanged {
        /// New link state.
        link: ShutterLink,
    },

    /// The dome rotator reported a new position.
    RotatorPositionChanged {
        /// Raw position in motor steps.
        steps: i32,
        /// Position converted to degrees of azimuth.
        degrees: f64,
    },

    /// The dome shutter reported a new position.
    ShutterPositionChanged {
        /// Raw position in motor steps.
        steps: i32,
    },

    /// Successfully connected to the device.
    Connected,

    /// Connection to the device was closed or lost.
    Disconnected,
}
