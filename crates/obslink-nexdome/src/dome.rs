//! NexDome -- the driver for NexDome rotator/shutter controllers
//! (firmware v3+).
//!
//! Ties the command builders ([`commands`]) and the event classifier
//! ([`DomeStatus`]) to a [`Channel`]. Reads are one transaction each;
//! writes are fire-and-forget (the firmware reports progress through
//! pushed position events instead of replies). The host's poll tick
//! calls [`poll_events`](NexDome::poll_events) to absorb whatever the
//! rotator pushed since the last tick.

use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use obslink_core::channel::{Channel, Classification, EventClassifier, WaitPolicy};
use obslink_core::error::{Error, Result};
use obslink_core::events::DeviceEvent;
use obslink_core::frame::Frame;
use obslink_core::transport::Transport;

use crate::commands;
use crate::protocol::{self, Param, Target, TERMINATOR};
use crate::status::DomeStatus;

/// Capacity of the event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Oldest firmware this driver talks to. v1/v2 use an entirely
/// different wire protocol.
const MINIMUM_VERSION: (u32, u32, u32) = (3, 0, 0);

/// Motor settings of one unit, as read from the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorSettings {
    /// Acceleration ramp time in milliseconds.
    pub acceleration_ramp_ms: i32,
    /// Velocity in steps per second.
    pub velocity: i32,
}

/// A connected NexDome controller.
///
/// Constructed via [`NexDomeBuilder`](crate::builder::NexDomeBuilder).
pub struct NexDome {
    channel: Channel,
    status: DomeStatus,
    event_tx: broadcast::Sender<DeviceEvent>,
}

impl NexDome {
    /// Create a new `NexDome` from its constituent parts.
    ///
    /// This is called by [`NexDomeBuilder`](crate::builder::NexDomeBuilder);
    /// callers should use the builder API instead.
    pub(crate) fn new(transport: Box<dyn Transport>, command_timeout: Duration) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let status = DomeStatus::new(event_tx.clone());
        NexDome {
            channel: Channel::new(transport, TERMINATOR, command_timeout),
            status,
            event_tx,
        }
    }

    /// Subscribe to device state-change events.
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_tx.subscribe()
    }

    /// The dome's current device state.
    pub fn status(&self) -> &DomeStatus {
        &self.status
    }

    /// Whether the underlying transport is connected.
    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    /// Close the connection. Subscribers receive a final
    /// [`DeviceEvent::Disconnected`].
    pub async fn close(&mut self) -> Result<()> {
        self.channel.close().await?;
        let _ = self.event_tx.send(DeviceEvent::Disconnected);
        Ok(())
    }

    /// Run one transaction through the engine with the dome's
    /// classifier attached.
    async fn execute(&mut self, cmd: Vec<u8>, policy: WaitPolicy) -> Result<Frame> {
        self.channel.execute(&cmd, policy, &mut self.status).await
    }

    /// Run a read transaction and extract the echoed value.
    async fn read_value(&mut self, cmd: Vec<u8>, param: Param, target: Target) -> Result<String> {
        let reply = self.execute(cmd, WaitPolicy::Wait).await?;
        protocol::reply_value(reply.as_str(), param, target)
            .map(str::to_string)
            .ok_or_else(|| {
                Error::MalformedReply(format!(
                    "expected {}R{} echo, got {:?}",
                    param.letter(),
                    target.letter(),
                    reply.as_str()
                ))
            })
    }

    // -----------------------------------------------------------
    // Connection
    // -----------------------------------------------------------

    /// Verify the rotator answers and runs a supported firmware.
    pub async fn handshake(&mut self) -> Result<String> {
        let version = self.firmware_version(Target::Rotator).await?;
        let parsed = protocol::parse_semver(&version)
            .ok_or_else(|| Error::MalformedReply(format!("bad firmware version {version:?}")))?;

        if parsed < MINIMUM_VERSION {
            return Err(Error::Unsupported(format!(
                "firmware {version} is older than the minimum supported {}.{}.{}",
                MINIMUM_VERSION.0, MINIMUM_VERSION.1, MINIMUM_VERSION.2
            )));
        }

        info!(%version, "NexDome handshake succeeded");
        let _ = self.event_tx.send(DeviceEvent::Connected);
        Ok(version)
    }

    /// Read the semantic firmware version of a unit.
    pub async fn firmware_version(&mut self, target: Target) -> Result<String> {
        self.read_value(
            commands::cmd_firmware_version(target),
            Param::SemanticVersion,
            target,
        )
        .await
    }

    // -----------------------------------------------------------
    // Motion
    // -----------------------------------------------------------

    /// Rotate the dome to an absolute azimuth in degrees.
    ///
    /// Fire-and-forget: progress arrives as pushed `P<steps>` position
    /// reports.
    pub async fn goto_azimuth(&mut self, azimuth_deg: f64) -> Result<()> {
        self.execute(commands::cmd_goto_azimuth(azimuth_deg), WaitPolicy::NoWait)
            .await?;
        info!(azimuth_deg, "dome rotating");
        Ok(())
    }

    /// Sync the rotator's position to the given azimuth in degrees.
    pub async fn sync_azimuth(&mut self, azimuth_deg: f64) -> Result<()> {
        self.execute(commands::cmd_sync_azimuth(azimuth_deg), WaitPolicy::NoWait)
            .await?;
        info!(azimuth_deg, "dome azimuth synced");
        Ok(())
    }

    /// Open the shutter. Fire-and-forget.
    pub async fn open_shutter(&mut self) -> Result<()> {
        self.execute(commands::cmd_open_shutter(), WaitPolicy::NoWait)
            .await?;
        info!("opening shutter");
        Ok(())
    }

    /// Close the shutter. Fire-and-forget.
    pub async fn close_shutter(&mut self) -> Result<()> {
        self.execute(commands::cmd_close_shutter(), WaitPolicy::NoWait)
            .await?;
        info!("closing shutter");
        Ok(())
    }

    /// Stop all motion immediately. Fire-and-forget.
    pub async fn emergency_stop(&mut self) -> Result<()> {
        self.execute(commands::cmd_emergency_stop(), WaitPolicy::NoWait)
            .await?;
        warn!("emergency stop issued");
        Ok(())
    }

    // -----------------------------------------------------------
    // Position and settings
    // -----------------------------------------------------------

    /// Read a unit's position in steps. The reply also refreshes the
    /// cached position in [`status()`](Self::status).
    pub async fn read_position(&mut self, target: Target) -> Result<i32> {
        let value = self
            .read_value(commands::cmd_read_position(target), Param::Position, target)
            .await?;
        let steps = commands::parse_int(&value)?;
        match target {
            Target::Rotator => self.status.set_rotator_steps(steps),
            Target::Shutter => self.status.set_shutter_steps(steps),
        }
        Ok(steps)
    }

    /// Read the rotator's position as degrees of azimuth.
    pub async fn rotator_azimuth(&mut self) -> Result<f64> {
        let steps = self.read_position(Target::Rotator).await?;
        Ok(protocol::steps_to_degrees(steps))
    }

    /// Read a unit's motor settings (acceleration ramp and velocity).
    pub async fn motor_settings(&mut self, target: Target) -> Result<MotorSettings> {
        let ramp = self
            .read_value(
                commands::cmd_read_acceleration_ramp(target),
                Param::AccelerationRamp,
                target,
            )
            .await?;
        let velocity = self
            .read_value(commands::cmd_read_velocity(target), Param::Velocity, target)
            .await?;
        Ok(MotorSettings {
            acceleration_ramp_ms: commands::parse_int(&ramp)?,
            velocity: commands::parse_int(&velocity)?,
        })
    }

    /// Write a unit's motor settings. Fire-and-forget.
    pub async fn set_motor_settings(&mut self, target: Target, settings: MotorSettings) -> Result<()> {
        self.execute(
            commands::cmd_write_acceleration_ramp(target, settings.acceleration_ramp_ms),
            WaitPolicy::NoWait,
        )
        .await?;
        self.execute(
            commands::cmd_write_velocity(target, settings.velocity),
            WaitPolicy::NoWait,
        )
        .await?;
        Ok(())
    }

    /// Read the rotator's dead zone in steps.
    pub async fn dead_zone(&mut self) -> Result<i32> {
        let value = self
            .read_value(
                commands::cmd_read_dead_zone(Target::Rotator),
                Param::DeadZone,
                Target::Rotator,
            )
            .await?;
        commands::parse_int(&value)
    }

    /// Write the rotator's dead zone in steps. Fire-and-forget.
    pub async fn set_dead_zone(&mut self, steps: i32) -> Result<()> {
        self.execute(
            commands::cmd_write_dead_zone(Target::Rotator, steps),
            WaitPolicy::NoWait,
        )
        .await?;
        Ok(())
    }

    /// Read the rotator's travel range in steps.
    pub async fn range(&mut self) -> Result<i32> {
        let value = self
            .read_value(
                commands::cmd_read_range(Target::Rotator),
                Param::Range,
                Target::Rotator,
            )
            .await?;
        commands::parse_int(&value)
    }

    /// Write the rotator's travel range in steps. Fire-and-forget.
    pub async fn set_range(&mut self, steps: i32) -> Result<()> {
        self.execute(
            commands::cmd_write_range(Target::Rotator, steps),
            WaitPolicy::NoWait,
        )
        .await?;
        Ok(())
    }

    /// Read the home position in steps.
    pub async fn home_position(&mut self) -> Result<i32> {
        let value = self
            .read_value(
                commands::cmd_read_home_position(),
                Param::HomePosition,
                Target::Rotator,
            )
            .await?;
        commands::parse_int(&value)
    }

    /// Read a unit's battery voltage (raw controller units).
    pub async fn battery_voltage(&mut self, target: Target) -> Result<i32> {
        let value = self
            .read_value(
                commands::cmd_read_battery(target),
                Param::BatteryVoltage,
                target,
            )
            .await?;
        commands::parse_int(&value)
    }

    // -----------------------------------------------------------
    // Event polling
    // -----------------------------------------------------------

    /// Absorb every report the rotator has pushed since the last call.
    ///
    /// Non-blocking; intended for the host's periodic poll tick.
    /// Returns the number of events applied. A non-event frame here is
    /// a stray reply from an earlier aborted transaction and is logged
    /// and discarded.
    pub async fn poll_events(&mut self) -> Result<usize> {
        let mut applied = 0;
        while let Some(frame) = self.channel.next_frame(false).await? {
            match self.status.classify(&frame) {
                Classification::Event => applied += 1,
                Classification::NotAnEvent => {
                    debug!(frame = %frame, "discarding stray non-event frame");
                }
            }
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obslink_core::types::ShutterLink;
    use obslink_test_harness::MockTransport;

    fn dome_with(mock: MockTransport) -> NexDome {
        NexDome::new(Box::new(mock), Duration::from_millis(50))
    }

    #[tokio::test]
    async fn handshake_accepts_v3_firmware() {
        let mut mock = MockTransport::new();
        mock.expect(b"@FRR\r\n", b":FRR3.3.0#");
        let mut dome = dome_with(mock);

        let version = dome.handshake().await.unwrap();
        assert_eq!(version, "3.3.0");
    }

    #[tokio::test]
    async fn handshake_rejects_old_firmware() {
        let mut mock = MockTransport::new();
        mock.expect(b"@FRR\r\n", b":FRR2.9.9#");
        let mut dome = dome_with(mock);

        let result = dome.handshake().await;
        assert!(matches!(result, Err(Error::Unsupported(_))));
    }

    #[tokio::test]
    async fn handshake_rejects_garbage_version() {
        let mut mock = MockTransport::new();
        mock.expect(b"@FRR\r\n", b":FRRv3#");
        let mut dome = dome_with(mock);

        let result = dome.handshake().await;
        assert!(matches!(result, Err(Error::MalformedReply(_))));
    }

    #[tokio::test]
    async fn read_position_refreshes_status() {
        let mut mock = MockTransport::new();
        mock.expect(b"@PRR\r\n", b":PRR27540#");
        let mut dome = dome_with(mock);

        let steps = dome.read_position(Target::Rotator).await.unwrap();
        assert_eq!(steps, 27540);
        assert_eq!(dome.status().rotator_degrees(), Some(180.0));
    }

    #[tokio::test]
    async fn position_reply_with_interleaved_events() {
        // A link event and a position report arrive ahead of the reply;
        // the classifier absorbs both.
        let mut mock = MockTransport::new();
        mock.expect(b"@PRS\r\n", b":XB->Online#:P100#:PRS500#");
        let mut dome = dome_with(mock);

        let steps = dome.read_position(Target::Shutter).await.unwrap();
        assert_eq!(steps, 500);
        assert_eq!(dome.status().shutter_link(), ShutterLink::Connected);
        assert_eq!(dome.status().rotator_steps(), Some(100));
    }

    #[tokio::test]
    async fn goto_is_fire_and_forget() {
        let mut mock = MockTransport::new();
        mock.expect(b"@GWR,170\r\n", b"");
        let mut dome = dome_with(mock);

        dome.goto_azimuth(170.0).await.unwrap();
    }

    #[tokio::test]
    async fn shutter_commands() {
        let mut mock = MockTransport::new();
        mock.expect(b"@OWS\r\n", b"");
        mock.expect(b"@CWS\r\n", b"");
        mock.expect(b"@SWR\r\n", b"");
        let mut dome = dome_with(mock);

        dome.open_shutter().await.unwrap();
        dome.close_shutter().await.unwrap();
        dome.emergency_stop().await.unwrap();
    }

    #[tokio::test]
    async fn motor_settings_round_trip() {
        let mut mock = MockTransport::new();
        mock.expect(b"@ARR\r\n", b":ARR1500#");
        mock.expect(b"@VRR\r\n", b":VRR800#");
        mock.expect(b"@AWS,1000\r\n", b"");
        mock.expect(b"@VWS,600\r\n", b"");
        let mut dome = dome_with(mock);

        let settings = dome.motor_settings(Target::Rotator).await.unwrap();
        assert_eq!(settings.acceleration_ramp_ms, 1500);
        assert_eq!(settings.velocity, 800);

        dome.set_motor_settings(
            Target::Shutter,
            MotorSettings {
                acceleration_ramp_ms: 1000,
                velocity: 600,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn mismatched_echo_is_malformed() {
        // The reply echoes the wrong parameter.
        let mut mock = MockTransport::new();
        mock.expect(b"@DRR\r\n", b":RRR55080#");
        let mut dome = dome_with(mock);

        let result = dome.dead_zone().await;
        assert!(matches!(result, Err(Error::MalformedReply(_))));
    }

    #[tokio::test]
    async fn poll_events_absorbs_backlog() {
        let mut mock = MockTransport::new();
        mock.push_unsolicited(b":XB->Online#:P100#:P200#:S50#");
        let mut dome = dome_with(mock);

        let applied = dome.poll_events().await.unwrap();
        assert_eq!(applied, 4);
        assert_eq!(dome.status().shutter_link(), ShutterLink::Connected);
        assert_eq!(dome.status().rotator_steps(), Some(200));
        assert_eq!(dome.status().shutter_steps(), Some(50));
    }

    #[tokio::test]
    async fn poll_events_with_nothing_pending() {
        let mock = MockTransport::new();
        let mut dome = dome_with(mock);

        assert_eq!(dome.poll_events().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn write_failure_surfaces_as_transport_write() {
        let mock = MockTransport::new();
        let mut dome = dome_with(mock);

        let result = dome.goto_azimuth(90.0).await;
        assert!(matches!(result, Err(Error::TransportWrite(_))));
    }

    #[tokio::test]
    async fn frames_with_crlf_padding_normalize() {
        let mut mock = MockTransport::new();
        mock.expect(b"@FRR\r\n", b"\r\n:FRR3.4.1#");
        let mut dome = dome_with(mock);

        let version = dome.firmware_version(Target::Rotator).await.unwrap();
        assert_eq!(version, "3.4.1");
    }
}
