//! StarGoMount -- the driver for Avalon StarGo mounts.
//!
//! This module ties the command builders ([`commands`]) and the event
//! classifier ([`MountStatus`]) to a [`Channel`] to produce a working
//! mount backend. Every operation is one transaction through the
//! engine; the `&mut self` receivers guarantee a single command in
//! flight at a time, and the pushed `:Z1mts#` motion-state events are
//! absorbed into [`MountStatus`] no matter which command they interleave
//! with.
//!
//! Failure semantics: transport and timeout errors surface as typed
//! errors for the one transaction that hit them, nothing is retried
//! here, and the device state is never touched by a failed decode. The
//! next transaction's drain step resynchronizes the line.

use std::time::SystemTime;

use tokio::sync::broadcast;
use tracing::{debug, info};

use obslink_core::channel::{Channel, WaitPolicy};
use obslink_core::error::{Error, Result};
use obslink_core::events::DeviceEvent;
use obslink_core::frame::Frame;
use obslink_core::helpers::local_sidereal_time;
use obslink_core::transport::Transport;
use obslink_core::types::{MotorState, ParkState, PierSide, SlewRate, TrackMode};

use crate::commands::{self, Direction};
use crate::protocol::TERMINATOR;
use crate::status::MountStatus;

/// Capacity of the event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A connected Avalon StarGo mount.
///
/// Constructed via [`StarGoBuilder`](crate::builder::StarGoBuilder). All
/// communication goes through the [`Transport`] provided at build time.
pub struct StarGoMount {
    channel: Channel,
    status: MountStatus,
    event_tx: broadcast::Sender<DeviceEvent>,
    /// Set by [`park`](Self::park), cleared once the firmware reports
    /// the motors off and the park is marked complete.
    parking: bool,
}

impl StarGoMount {
    /// Create a new `StarGoMount` from its constituent parts.
    ///
    /// This is called by [`StarGoBuilder`](crate::builder::StarGoBuilder);
    /// callers should use the builder API instead.
    pub(crate) fn new(transport: Box<dyn Transport>, command_timeout: std::time::Duration) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let status = MountStatus::new(event_tx.clone());
        StarGoMount {
            channel: Channel::new(transport, TERMINATOR, command_timeout),
            status,
            event_tx,
            parking: false,
        }
    }

    /// Subscribe to device state-change events.
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_tx.subscribe()
    }

    /// The mount's current device state.
    pub fn status(&self) -> &MountStatus {
        &self.status
    }

    /// `true` if a park command has been issued and the firmware has not
    /// yet reported the motors off.
    pub fn is_parking(&self) -> bool {
        self.parking
    }

    /// Whether the underlying transport is connected.
    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    /// Close the connection. The device state is discarded with the
    /// driver; subscribers receive a final [`DeviceEvent::Disconnected`].
    pub async fn close(&mut self) -> Result<()> {
        self.channel.close().await?;
        let _ = self.event_tx.send(DeviceEvent::Disconnected);
        Ok(())
    }

    /// Run one transaction through the engine with the mount's
    /// classifier attached.
    async fn execute(&mut self, cmd: Vec<u8>, policy: WaitPolicy) -> Result<Frame> {
        self.channel.execute(&cmd, policy, &mut self.status).await
    }

    // -----------------------------------------------------------
    // Connection
    // -----------------------------------------------------------

    /// Verify the mount answers on the line.
    ///
    /// Reads the current right ascension and checks it parses; anything
    /// else on the wire means a wrong port or baud rate.
    pub async fn handshake(&mut self) -> Result<()> {
        let reply = self.execute(commands::cmd_get_ra(), WaitPolicy::Wait).await?;
        commands::parse_angle(reply.as_str())?;
        info!("StarGo handshake succeeded");
        let _ = self.event_tx.send(DeviceEvent::Connected);
        Ok(())
    }

    // -----------------------------------------------------------
    // Coordinates and motion
    // -----------------------------------------------------------

    /// Read the current right ascension in hours.
    pub async fn get_ra(&mut self) -> Result<f64> {
        let reply = self.execute(commands::cmd_get_ra(), WaitPolicy::Wait).await?;
        commands::parse_angle(reply.as_str())
    }

    /// Read the current declination in degrees.
    pub async fn get_dec(&mut self) -> Result<f64> {
        let reply = self.execute(commands::cmd_get_dec(), WaitPolicy::Wait).await?;
        commands::parse_angle(reply.as_str())
    }

    /// Load the target coordinates into the mount.
    ///
    /// The set commands produce no reply; errors only surface if the
    /// transport itself fails.
    pub async fn set_target(&mut self, ra_hours: f64, dec_deg: f64) -> Result<()> {
        self.execute(commands::cmd_set_target_ra(ra_hours), WaitPolicy::NoWait)
            .await?;
        self.execute(commands::cmd_set_target_dec(dec_deg), WaitPolicy::NoWait)
            .await?;
        Ok(())
    }

    /// Slew to the given coordinates.
    ///
    /// Loads the target and issues the slew; the mount acknowledges with
    /// `0` and the slew continues in the background. Poll
    /// [`is_slew_complete`](Self::is_slew_complete) for completion.
    pub async fn goto(&mut self, ra_hours: f64, dec_deg: f64) -> Result<()> {
        self.set_target(ra_hours, dec_deg).await?;
        let reply = self
            .execute(commands::cmd_slew_to_target(), WaitPolicy::Wait)
            .await?;
        if !reply.as_str().starts_with('0') {
            return Err(Error::MalformedReply(format!(
                "slew rejected: {:?}",
                reply.as_str()
            )));
        }
        info!(ra_hours, dec_deg, "slewing to target");
        Ok(())
    }

    /// Sync the mount's pointing model to the given coordinates.
    pub async fn sync(&mut self, ra_hours: f64, dec_deg: f64) -> Result<()> {
        self.set_target(ra_hours, dec_deg).await?;
        self.execute(commands::cmd_sync_to_target(), WaitPolicy::Wait)
            .await?;
        info!(ra_hours, dec_deg, "synchronized to target");
        Ok(())
    }

    /// Abort any motion in progress.
    pub async fn abort(&mut self) -> Result<()> {
        self.execute(commands::cmd_abort(), WaitPolicy::NoWait)
            .await?;
        Ok(())
    }

    /// Start moving in a direction at the current slew rate.
    pub async fn move_dir(&mut self, dir: Direction) -> Result<()> {
        self.execute(commands::cmd_move(dir), WaitPolicy::NoWait)
            .await?;
        Ok(())
    }

    /// Stop moving in a direction.
    pub async fn stop_dir(&mut self, dir: Direction) -> Result<()> {
        self.execute(commands::cmd_stop(dir), WaitPolicy::NoWait)
            .await?;
        Ok(())
    }

    /// Issue a timed guide pulse (up to 9999 ms).
    pub async fn pulse_guide(&mut self, dir: Direction, duration_ms: u32) -> Result<()> {
        let cmd = commands::cmd_pulse_guide(dir, duration_ms)?;
        self.execute(cmd, WaitPolicy::NoWait).await?;
        Ok(())
    }

    /// Select the manual slew rate.
    pub async fn set_slew_rate(&mut self, rate: SlewRate) -> Result<()> {
        self.execute(commands::cmd_set_slew_rate(rate), WaitPolicy::NoWait)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------
    // Tracking
    // -----------------------------------------------------------

    /// Select the tracking mode.
    pub async fn set_track_mode(&mut self, mode: TrackMode) -> Result<()> {
        self.execute(commands::cmd_set_track_mode(mode), WaitPolicy::NoWait)
            .await?;
        info!(%mode, "tracking mode set");
        Ok(())
    }

    /// Switch tracking on or off.
    pub async fn set_tracking(&mut self, enable: bool) -> Result<()> {
        self.execute(commands::cmd_set_tracking(enable), WaitPolicy::NoWait)
            .await?;
        info!(enable, "tracking toggled");
        Ok(())
    }

    /// Custom tracking rates are not supported by the StarGo firmware.
    pub async fn set_track_rate(&mut self, _ra_rate: f64, _dec_rate: f64) -> Result<()> {
        Err(Error::Unsupported("custom track rates".into()))
    }

    // -----------------------------------------------------------
    // Status queries
    // -----------------------------------------------------------

    /// Refresh motor power, tracking mode, and slew rate.
    ///
    /// The `:X3C#` query is answered with a pushed `:Z1mts#` event, so
    /// the update lands in [`status()`](Self::status) as a side effect
    /// of the classifier. Completes a pending park when the firmware
    /// reports the motors off.
    pub async fn update_motion_state(&mut self) -> Result<()> {
        self.execute(commands::cmd_query_motion_state(), WaitPolicy::NoWait)
            .await?;
        if self.parking && self.status.motors() == MotorState::Off {
            debug!("motors off while parking: park complete");
            self.parking = false;
            self.status.set_park_state(ParkState::Parked);
        }
        Ok(())
    }

    /// `true` once both axes have settled (stopped or back in tracking).
    pub async fn is_slew_complete(&mut self) -> Result<bool> {
        let reply = self
            .execute(commands::cmd_query_slew_status(), WaitPolicy::Wait)
            .await?;
        let (ra, dec) = commands::parse_slew_status(reply.as_str())?;
        debug!(%ra, %dec, "slew status");
        Ok(ra.is_settled() && dec.is_settled())
    }

    /// `true` if the mount is not actively tracking the sky.
    ///
    /// Refresh with [`update_motion_state`](Self::update_motion_state)
    /// first; this predicate reads the cached tracking mode.
    pub fn is_idle(&self) -> bool {
        self.status.is_idle()
    }

    /// Query and apply the park/sync status.
    pub async fn query_park_state(&mut self) -> Result<ParkState> {
        let reply = self
            .execute(commands::cmd_query_park_state(), WaitPolicy::Wait)
            .await?;
        let state = commands::parse_park_state(reply.as_str())?;
        self.status.set_park_state(state);
        Ok(state)
    }

    /// Query and apply the pier side.
    pub async fn query_pier_side(&mut self) -> Result<PierSide> {
        let reply = self
            .execute(commands::cmd_query_pier_side(), WaitPolicy::Wait)
            .await?;
        let side = commands::parse_pier_side(reply.as_str())?;
        self.status.set_pier_side(side);
        Ok(side)
    }

    // -----------------------------------------------------------
    // Park and home
    // -----------------------------------------------------------

    /// Start parking the mount.
    ///
    /// The firmware acknowledges with `pB` and parks in the background;
    /// [`update_motion_state`](Self::update_motion_state) marks the park
    /// complete once the motors power down.
    pub async fn park(&mut self) -> Result<()> {
        let reply = self.execute(commands::cmd_park(), WaitPolicy::Wait).await?;
        if reply.as_str() != "pB" {
            return Err(Error::MalformedReply(format!(
                "park not acknowledged: {:?}",
                reply.as_str()
            )));
        }
        self.parking = true;
        info!("parking mount");
        Ok(())
    }

    /// Unpark the mount.
    ///
    /// The firmware loses track of sidereal time while parked, so the
    /// current LST (from the stored site longitude and the system clock)
    /// is loaded first.
    pub async fn unpark(&mut self) -> Result<()> {
        let lst = self.current_lst().await?;
        self.unpark_at(lst).await
    }

    /// Unpark the mount with an explicitly supplied local sidereal time
    /// in hours.
    pub async fn unpark_at(&mut self, lst_hours: f64) -> Result<()> {
        let reply = self
            .execute(commands::cmd_set_sidereal_time(lst_hours), WaitPolicy::Wait)
            .await?;
        if !reply.as_str().starts_with('0') {
            return Err(Error::MalformedReply(format!(
                "setting LST before unpark failed: {:?}",
                reply.as_str()
            )));
        }

        let reply = self.execute(commands::cmd_unpark(), WaitPolicy::Wait).await?;
        if reply.as_str() != "p0" {
            return Err(Error::MalformedReply(format!(
                "unpark not acknowledged: {:?}",
                reply.as_str()
            )));
        }
        self.parking = false;
        self.status.set_park_state(ParkState::Unparked);
        info!("mount unparked");
        Ok(())
    }

    /// Store the current position as the park position.
    pub async fn set_park_position(&mut self) -> Result<()> {
        let reply = self
            .execute(commands::cmd_set_park_position(), WaitPolicy::Wait)
            .await?;
        if !reply.as_str().starts_with('0') {
            return Err(Error::MalformedReply(format!(
                "set park position not acknowledged: {:?}",
                reply.as_str()
            )));
        }
        Ok(())
    }

    /// Slew to the home position.
    pub async fn goto_home(&mut self) -> Result<()> {
        let reply = self.execute(commands::cmd_goto_home(), WaitPolicy::Wait).await?;
        if reply.as_str() != "pA" {
            return Err(Error::MalformedReply(format!(
                "goto home not acknowledged: {:?}",
                reply.as_str()
            )));
        }
        info!("slewing to home position");
        Ok(())
    }

    /// Synchronize the home position to the current local sidereal time.
    pub async fn sync_home(&mut self) -> Result<()> {
        let lst = self.current_lst().await?;
        self.sync_home_at(lst).await
    }

    /// Synchronize the home position to an explicitly supplied local
    /// sidereal time in hours.
    pub async fn sync_home_at(&mut self, lst_hours: f64) -> Result<()> {
        self.execute(commands::cmd_sync_home(lst_hours), WaitPolicy::Wait)
            .await?;
        info!("home position synchronized");
        Ok(())
    }

    /// Local sidereal time from the mount's site longitude and the
    /// system clock.
    async fn current_lst(&mut self) -> Result<f64> {
        let longitude = self.get_site_longitude().await?;
        Ok(local_sidereal_time(longitude, SystemTime::now()))
    }

    // -----------------------------------------------------------
    // Guiding configuration
    // -----------------------------------------------------------

    /// Read the RA and DEC guiding speeds as percentages.
    pub async fn get_guide_speeds(&mut self) -> Result<(u8, u8)> {
        let reply = self
            .execute(commands::cmd_get_guide_speeds(), WaitPolicy::Wait)
            .await?;
        commands::parse_guide_speeds(reply.as_str())
    }

    /// Set the RA and DEC guiding speeds as percentages (0-99).
    pub async fn set_guide_speeds(&mut self, ra_percent: u8, dec_percent: u8) -> Result<()> {
        let cmd = commands::cmd_set_guide_speed_ra(ra_percent)?;
        self.execute(cmd, WaitPolicy::Wait).await?;
        let cmd = commands::cmd_set_guide_speed_dec(dec_percent)?;
        self.execute(cmd, WaitPolicy::Wait).await?;
        info!(ra_percent, dec_percent, "guiding speeds set");
        Ok(())
    }

    /// `true` if the ST4 guide port is enabled.
    pub async fn get_st4_enabled(&mut self) -> Result<bool> {
        let reply = self.execute(commands::cmd_query_st4(), WaitPolicy::Wait).await?;
        commands::parse_flag("vh", reply.as_str())
    }

    /// Enable or disable the ST4 guide port.
    pub async fn set_st4_enabled(&mut self, enable: bool) -> Result<()> {
        self.execute(commands::cmd_set_st4(enable), WaitPolicy::Wait)
            .await?;
        info!(enable, "ST4 port toggled");
        Ok(())
    }

    /// `true` if the automatic meridian flip is enabled.
    ///
    /// The firmware flag stores the disabled state (`vs0` = enabled).
    pub async fn get_meridian_flip_enabled(&mut self) -> Result<bool> {
        let reply = self
            .execute(commands::cmd_query_meridian_flip(), WaitPolicy::Wait)
            .await?;
        Ok(!commands::parse_flag("vs", reply.as_str())?)
    }

    /// Enable or disable the automatic meridian flip.
    pub async fn set_meridian_flip_enabled(&mut self, enable: bool) -> Result<()> {
        self.execute(commands::cmd_set_meridian_flip(enable), WaitPolicy::Wait)
            .await?;
        info!(enable, "meridian flip toggled");
        Ok(())
    }

    /// `true` if the meridian flip is being forced.
    pub async fn get_meridian_flip_forced(&mut self) -> Result<bool> {
        let reply = self
            .execute(commands::cmd_query_meridian_flip_forced(), WaitPolicy::Wait)
            .await?;
        commands::parse_flag("vd", reply.as_str())
    }

    /// Force the meridian flip or return it to automatic.
    pub async fn set_meridian_flip_forced(&mut self, forced: bool) -> Result<()> {
        self.execute(commands::cmd_set_meridian_flip_forced(forced), WaitPolicy::Wait)
            .await?;
        info!(forced, "meridian flip force toggled");
        Ok(())
    }

    // -----------------------------------------------------------
    // Site and time
    // -----------------------------------------------------------

    /// Read the site latitude in degrees.
    pub async fn get_site_latitude(&mut self) -> Result<f64> {
        let reply = self
            .execute(commands::cmd_get_site_latitude(), WaitPolicy::Wait)
            .await?;
        commands::parse_angle(reply.as_str())
    }

    /// Read the site longitude in degrees.
    pub async fn get_site_longitude(&mut self) -> Result<f64> {
        let reply = self
            .execute(commands::cmd_get_site_longitude(), WaitPolicy::Wait)
            .await?;
        commands::parse_angle(reply.as_str())
    }

    /// Set the site location.
    pub async fn set_site_location(&mut self, latitude_deg: f64, longitude_deg: f64) -> Result<()> {
        self.execute(commands::cmd_set_site_longitude(longitude_deg), WaitPolicy::Wait)
            .await?;
        self.execute(commands::cmd_set_site_latitude(latitude_deg), WaitPolicy::Wait)
            .await?;
        info!(latitude_deg, longitude_deg, "site location set");
        Ok(())
    }

    /// Read the local time as decimal hours.
    pub async fn get_local_time(&mut self) -> Result<f64> {
        let reply = self
            .execute(commands::cmd_get_local_time(), WaitPolicy::Wait)
            .await?;
        commands::parse_angle(reply.as_str())
    }

    /// Read the local date as `(year, month, day)`.
    pub async fn get_local_date(&mut self) -> Result<(u16, u8, u8)> {
        let reply = self
            .execute(commands::cmd_get_local_date(), WaitPolicy::Wait)
            .await?;
        commands::parse_local_date(reply.as_str())
    }

    /// Read the UTC offset in hours (conventional east-positive sign).
    pub async fn get_utc_offset(&mut self) -> Result<f64> {
        let reply = self
            .execute(commands::cmd_get_utc_offset(), WaitPolicy::Wait)
            .await?;
        commands::parse_utc_offset(reply.as_str())
    }

    /// Set the local time.
    pub async fn set_local_time(&mut self, hour: u8, minute: u8, second: u8) -> Result<()> {
        self.execute(commands::cmd_set_local_time(hour, minute, second), WaitPolicy::NoWait)
            .await?;
        Ok(())
    }

    /// Set the local date.
    pub async fn set_local_date(&mut self, month: u8, day: u8, year: u16) -> Result<()> {
        let reply = self
            .execute(commands::cmd_set_local_date(month, day, year), WaitPolicy::Wait)
            .await?;
        if reply.as_str().starts_with('0') {
            return Err(Error::MalformedReply(format!(
                "set date rejected: {:?}",
                reply.as_str()
            )));
        }
        Ok(())
    }

    /// Set the UTC offset in hours (conventional east-positive sign).
    pub async fn set_utc_offset(&mut self, offset_hours: f64) -> Result<()> {
        self.execute(commands::cmd_set_utc_offset(offset_hours), WaitPolicy::NoWait)
            .await?;
        Ok(())
    }

    /// Read the tracking frequency in hertz.
    pub async fn get_track_frequency(&mut self) -> Result<f64> {
        let reply = self
            .execute(commands::cmd_get_track_frequency(), WaitPolicy::Wait)
            .await?;
        commands::parse_track_frequency(reply.as_str())
    }

    /// Retrieve the firmware description: manufacturer, version, date.
    pub async fn firmware_info(&mut self) -> Result<String> {
        let manufacturer = self
            .execute(commands::cmd_get_manufacturer(), WaitPolicy::Wait)
            .await?;
        let version = self
            .execute(commands::cmd_get_firmware_version(), WaitPolicy::Wait)
            .await?;
        let date = self
            .execute(commands::cmd_get_firmware_date(), WaitPolicy::Wait)
            .await?;
        Ok(format!("{} - {} - {}", manufacturer, version, date))
    }
}
