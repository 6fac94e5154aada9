//! Mount device state and the event classifier that owns it.
//!
//! [`MountStatus`] is the driver's in-memory picture of the hardware:
//! motor power, tracking mode, slew rate, pier side, and park state. All
//! writes funnel through this one component -- the pushed `:Z1mts#`
//! events via the [`EventClassifier`] implementation, and the
//! reply-derived fields (pier side, park state) via the crate-internal
//! setters the driver calls after parsing a query reply. Every applied
//! update is broadcast as a [`DeviceEvent`].

use tokio::sync::broadcast;
use tracing::debug;

use obslink_core::channel::{Classification, EventClassifier};
use obslink_core::events::DeviceEvent;
use obslink_core::frame::Frame;
use obslink_core::types::{MotorState, ParkState, PierSide, SlewRate, TrackMode};

use crate::protocol::{self, MOTION_STATE_PREFIX};

/// Current device state of a StarGo mount.
///
/// Created with every field at its unknown/idle default when the driver
/// connects, updated for the life of the connection, discarded on
/// disconnect.
pub struct MountStatus {
    motors: MotorState,
    track_mode: TrackMode,
    slew_rate: SlewRate,
    pier_side: PierSide,
    park_state: ParkState,
    event_tx: broadcast::Sender<DeviceEvent>,
}

impl MountStatus {
    pub(crate) fn new(event_tx: broadcast::Sender<DeviceEvent>) -> Self {
        MountStatus {
            motors: MotorState::default(),
            track_mode: TrackMode::default(),
            slew_rate: SlewRate::default(),
            pier_side: PierSide::default(),
            park_state: ParkState::default(),
            event_tx,
        }
    }

    /// Current motor power state.
    pub fn motors(&self) -> MotorState {
        self.motors
    }

    /// Current tracking mode.
    pub fn track_mode(&self) -> TrackMode {
        self.track_mode
    }

    /// Current manual slew rate.
    pub fn slew_rate(&self) -> SlewRate {
        self.slew_rate
    }

    /// Current pier side.
    pub fn pier_side(&self) -> PierSide {
        self.pier_side
    }

    /// Current park/sync state.
    pub fn park_state(&self) -> ParkState {
        self.park_state
    }

    /// `true` if the mount is not actively tracking the sky.
    ///
    /// Any mode other than sidereal counts as not-tracking for
    /// slew-completion purposes.
    pub fn is_idle(&self) -> bool {
        self.track_mode != TrackMode::Sidereal
    }

    pub(crate) fn set_pier_side(&mut self, side: PierSide) {
        self.pier_side = side;
        let _ = self.event_tx.send(DeviceEvent::PierSideChanged { side });
    }

    pub(crate) fn set_park_state(&mut self, state: ParkState) {
        self.park_state = state;
        let _ = self.event_tx.send(DeviceEvent::ParkStateChanged { state });
    }

    fn apply_motion_state(&mut self, motors: MotorState, mode: TrackMode, rate: SlewRate) {
        self.motors = motors;
        self.track_mode = mode;
        self.slew_rate = rate;
        let _ = self.event_tx.send(DeviceEvent::MotorStateChanged { state: motors });
        let _ = self.event_tx.send(DeviceEvent::TrackModeChanged { mode });
        let _ = self.event_tx.send(DeviceEvent::SlewRateChanged { rate });
    }
}

impl EventClassifier for MountStatus {
    fn classify(&mut self, frame: &Frame) -> Classification {
        match protocol::decode_motion_state(frame.as_str()) {
            Some((motors, mode, rate)) => {
                debug!(%motors, %mode, %rate, "motion-state event");
                self.apply_motion_state(motors, mode, rate);
                Classification::Event
            }
            None => {
                if frame.as_str().starts_with(MOTION_STATE_PREFIX) {
                    // Looks like a motion-state push but doesn't decode;
                    // leave the state untouched and let the transaction
                    // keep looking for its real reply.
                    debug!(frame = %frame, "skipping undecodable motion-state event");
                }
                Classification::NotAnEvent
            }
        }
    }
}
