//! # obslink -- Observatory Equipment Control
//!
//! `obslink` is an asynchronous Rust library for controlling observatory
//! equipment over serial lines: Avalon StarGo telescope mounts and
//! NexDome dome controllers. It is designed for observatory automation
//! hosts that need reliable command/response transactions on lines where
//! the firmware freely interleaves unsolicited telemetry with replies.
//!
//! ## Quick Start
//!
//! Add `obslink` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! obslink = { version = "0.1", features = ["stargo"] }
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! Connect to a mount and read its position:
//!
//! ```no_run
//! use obslink::stargo::StarGoBuilder;
//!
//! #[tokio::main]
//! async fn main() -> obslink::Result<()> {
//!     let mut mount = StarGoBuilder::new()
//!         .serial_port("/dev/ttyUSB0")
//!         .build()
//!         .await?;
//!
//!     mount.handshake().await?;
//!     let ra = mount.get_ra().await?;
//!     let dec = mount.get_dec().await?;
//!     println!("RA {ra:.4} h, DEC {dec:.4} deg");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                  | Purpose                                           |
//! |------------------------|---------------------------------------------------|
//! | `obslink-core`         | Framing, transaction engine, device state, errors |
//! | `obslink-transport`    | Serial transport implementation                   |
//! | `obslink-stargo`       | Avalon StarGo mount driver                        |
//! | `obslink-nexdome`      | NexDome rotator/shutter driver                    |
//! | `obslink-test-harness` | Mock transport for deterministic tests            |
//! | **`obslink`**          | This facade crate -- re-exports everything        |
//!
//! Both drivers run on the same engine: the
//! [`Channel`](obslink_core::Channel) drains stale frames, transmits one
//! command at a time, and classifies everything that comes back as
//! either an unsolicited event (absorbed into the device state) or the
//! command's reply.
//!
//! ## Feature Flags
//!
//! Each device backend is gated behind a feature flag:
//!
//! | Feature   | Enables                              | Default |
//! |-----------|--------------------------------------|---------|
//! | `stargo`  | [`stargo`] module (mount driver)     | yes     |
//! | `nexdome` | [`nexdome`] module (dome driver)     | yes     |
//!
//! ## Event Subscription
//!
//! Both drivers emit [`DeviceEvent`]s through a broadcast channel as
//! device-state fields are derived from the wire. Subscribe to receive
//! motor, tracking, pier-side, park, shutter-link, and position changes
//! without polling:
//!
//! ```no_run
//! use obslink::DeviceEvent;
//! # async fn example(mount: &obslink::stargo::StarGoMount) {
//! let mut events = mount.subscribe();
//! while let Ok(event) = events.recv().await {
//!     match event {
//!         DeviceEvent::TrackModeChanged { mode } => println!("tracking: {mode}"),
//!         other => println!("{other:?}"),
//!     }
//! }
//! # }
//! ```

pub use obslink_core::*;

/// Avalon StarGo mount backend.
///
/// Provides [`StarGoMount`](stargo::StarGoMount) and
/// [`StarGoBuilder`](stargo::StarGoBuilder) for controlling Avalon
/// StarGo mounts over the LX200-dialect serial protocol with pushed
/// motion-state events.
#[cfg(feature = "stargo")]
pub mod stargo {
    pub use obslink_stargo::*;
}

/// NexDome dome backend.
///
/// Provides [`NexDome`](nexdome::NexDome) and
/// [`NexDomeBuilder`](nexdome::NexDomeBuilder) for controlling NexDome
/// rotator/shutter controllers running firmware v3 or newer.
#[cfg(feature = "nexdome")]
pub mod nexdome {
    pub use obslink_nexdome::*;
}
