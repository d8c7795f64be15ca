//! Expiring keys example for the namespaced KV client
//!
//! Demonstrates relative TTLs (duration strings and raw seconds) and
//! absolute expiration timestamps.
//!
//! Run with: cargo run --example expiring_keys

use std::time::{SystemTime, UNIX_EPOCH};

use kv_namespace_client::{Client, DeleteOptions, SetOptions, Ttl};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let client = Client::from_env()?;

    // TTL as a duration string: expires ten minutes from now
    info!("Storing 'session:short' with a 10m TTL...");
    client
        .set(
            "session:short",
            "short-lived state",
            SetOptions {
                expiration_ttl: Some(Ttl::from("10m")),
                ..Default::default()
            },
        )
        .await?;

    // TTL as raw seconds: expires in one hour
    info!("Storing 'session:hour' with a 3600s TTL...");
    client
        .set(
            "session:hour",
            "hour-lived state",
            SetOptions {
                expiration_ttl: Some(Ttl::Seconds(3600)),
                ..Default::default()
            },
        )
        .await?;

    // Absolute expiration: midnight tomorrow, as epoch seconds
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let tomorrow = now + 86_400;
    info!("Storing 'report:daily' expiring at epoch {}...", tomorrow);
    client
        .set(
            "report:daily",
            "daily report payload",
            SetOptions {
                expiration: Some(tomorrow),
                ..Default::default()
            },
        )
        .await?;

    // Clean up all three in one bulk request
    info!("Cleaning up...");
    let envelope = client
        .delete(
            vec!["session:short", "session:hour", "report:daily"],
            DeleteOptions::default(),
        )
        .await?;
    info!("Cleanup success: {}", envelope.success);

    Ok(())
}
