//! Dome device state and the event classifier that owns it.
//!
//! [`DomeStatus`] tracks what the rotator has told us: the shutter's
//! radio-link state and the latest rotator/shutter position reports.
//! All writes go through the [`EventClassifier`] implementation; every
//! applied update is broadcast as a [`DeviceEvent`].

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use obslink_core::channel::{Classification, EventClassifier};
use obslink_core::events::DeviceEvent;
use obslink_core::frame::Frame;
use obslink_core::types::ShutterLink;

use crate::protocol::{self, DomeEvent, XBEE_ONLINE};

/// Current device state of a NexDome controller.
///
/// Created with every field at its unknown default when the driver
/// connects, updated continuously from pushed reports, discarded on
/// disconnect.
pub struct DomeStatus {
    shutter_link: ShutterLink,
    rotator_steps: Option<i32>,
    shutter_steps: Option<i32>,
    event_tx: broadcast::Sender<DeviceEvent>,
}

impl DomeStatus {
    pub(crate) fn new(event_tx: broadcast::Sender<DeviceEvent>) -> Self {
        DomeStatus {
            shutter_link: ShutterLink::default(),
            rotator_steps: None,
            shutter_steps: None,
            event_tx,
        }
    }

    /// Radio link state between rotator and shutter.
    pub fn shutter_link(&self) -> ShutterLink {
        self.shutter_link
    }

    /// Last reported rotator position in steps, if any report has
    /// arrived yet.
    pub fn rotator_steps(&self) -> Option<i32> {
        self.rotator_steps
    }

    /// Last reported rotator position in degrees of azimuth.
    pub fn rotator_degrees(&self) -> Option<f64> {
        self.rotator_steps.map(protocol::steps_to_degrees)
    }

    /// Last reported shutter position in steps.
    pub fn shutter_steps(&self) -> Option<i32> {
        self.shutter_steps
    }

    pub(crate) fn set_rotator_steps(&mut self, steps: i32) {
        self.rotator_steps = Some(steps);
        let _ = self.event_tx.send(DeviceEvent::RotatorPositionChanged {
            steps,
            degrees: protocol::steps_to_degrees(steps),
        });
    }

    pub(crate) fn set_shutter_steps(&mut self, steps: i32) {
        self.shutter_steps = Some(steps);
        let _ = self
            .event_tx
            .send(DeviceEvent::ShutterPositionChanged { steps });
    }

    fn apply_xbee_state(&mut self, state: &str) {
        let link = if state == XBEE_ONLINE {
            ShutterLink::Connected
        } else {
            ShutterLink::Disconnected
        };

        match (self.shutter_link, link) {
            (ShutterLink::Disconnected, ShutterLink::Connected) => {
                info!("shutter is connected");
            }
            (ShutterLink::Connected, ShutterLink::Disconnected) => {
                warn!(state, "lost connection to the shutter");
            }
            _ => {}
        }

        self.shutter_link = link;
        let _ = self.event_tx.send(DeviceEvent::ShutterLinkChanged { link });
    }
}

impl EventClassifier for DomeStatus {
    fn classify(&mut self, frame: &Frame) -> Classification {
        match protocol::decode_event(frame.as_str()) {
            Some(DomeEvent::XbeeState(state)) => {
                debug!(%state, "shutter link event");
                self.apply_xbee_state(&state);
                Classification::Event
            }
            Some(DomeEvent::RotatorPosition(steps)) => {
                debug!(steps, "rotator position event");
                self.set_rotator_steps(steps);
                Classification::Event
            }
            Some(DomeEvent::ShutterPosition(steps)) => {
                debug!(steps, "shutter position event");
                self.set_shutter_steps(steps);
                Classification::Event
            }
            None => Classification::NotAnEvent,
        }
    }
}
