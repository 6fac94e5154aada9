//! Connect to a StarGo mount and print its current status.
//!
//! Usage:
//!
//! ```text
//! cargo run --example mount_status -- /dev/ttyUSB0
//! ```

use std::time::Duration;

use obslink::stargo::StarGoBuilder;

#[tokio::main]
async fn main() -> obslink::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());

    let mut mount = StarGoBuilder::new()
        .serial_port(&port)
        .command_timeout(Duration::from_millis(500))
        .build()
        .await?;

    mount.handshake().await?;
    println!("firmware: {}", mount.firmware_info().await?);

    let ra = mount.get_ra().await?;
    let dec = mount.get_dec().await?;
    println!("position: RA {ra:.4} h, DEC {dec:.4} deg");

    mount.update_motion_state().await?;
    let status = mount.status();
    println!("motors:   {}", status.motors());
    println!("tracking: {}", status.track_mode());
    println!("slew:     {}", status.slew_rate());

    let park = mount.query_park_state().await?;
    println!("park:     {park}");
    let pier = mount.query_pier_side().await?;
    println!("pier:     {pier}");

    mount.close().await?;
    Ok(())
}
