//! Watch a NexDome controller's pushed reports in real time.
//!
//! Usage:
//!
//! ```text
//! cargo run --example monitor_events -- /dev/ttyACM0
//! ```
//!
//! Prints shutter-link transitions and position reports as the rotator
//! pushes them. Rotate the dome or toggle the shutter to see traffic.

use std::time::Duration;

use obslink::nexdome::NexDomeBuilder;
use obslink::DeviceEvent;

#[tokio::main]
async fn main() -> obslink::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyACM0".to_string());

    let mut dome = NexDomeBuilder::new().serial_port(&port).build().await?;
    let version = dome.handshake().await?;
    println!("connected, firmware {version}");

    let mut events = dome.subscribe();

    loop {
        dome.poll_events().await?;

        while let Ok(event) = events.try_recv() {
            match event {
                DeviceEvent::ShutterLinkChanged { link } => {
                    println!("shutter link: {link}");
                }
                DeviceEvent::RotatorPositionChanged { steps, degrees } => {
                    println!("rotator: {steps} steps ({degrees:.1} deg)");
                }
                DeviceEvent::ShutterPositionChanged { steps } => {
                    println!("shutter: {steps} steps");
                }
                other => println!("{other:?}"),
            }
        }

        tokio::time::sleep(Duration::from_millis(250)).await;
    }
}
