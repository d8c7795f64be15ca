//! Basic usage example for the namespaced KV client
//!
//! Run with: cargo run --example basic_usage
//!
//! Expects KV_ENDPOINT, KV_ACCOUNT_ID, KV_NAMESPACE_ID and KV_API_TOKEN
//! in the environment.

use kv_namespace_client::{Client, DeleteOptions, GetOptions, ListOptions, SetOptions};
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

    // Create client from the environment
    let client = Client::from_env()?;
    info!("Using namespace {}", client.namespace_id());

    // Store a value
    info!("Storing key 'example:hello'...");
    let envelope = client
        .set("example:hello", "Hello, KV Storage!", SetOptions::default())
        .await?;
    info!("Stored! success: {}", envelope.success);

    // Retrieve the value
    info!("Retrieving key 'example:hello'...");
    if let Some(value) = client.get("example:hello", GetOptions::default()).await? {
        info!("Retrieved: {}", value);
    } else {
        info!("Key not found");
    }

    // List keys under the example prefix
    info!("Listing keys with prefix 'example:'...");
    let envelope = client
        .list(ListOptions {
            prefix: Some("example:".to_string()),
            limit: Some(10),
            ..Default::default()
        })
        .await?;
    for entry in envelope.result.unwrap_or_default() {
        info!("  - {} (expires: {:?})", entry.name, entry.expiration);
    }
    if let Some(info_block) = envelope.result_info {
        info!("Page count: {}, cursor: {:?}", info_block.count, info_block.cursor);
    }

    // Delete the key
    info!("Deleting key 'example:hello'...");
    let envelope = client.delete("example:hello", DeleteOptions::default()).await?;
    info!("Deleted! success: {}", envelope.success);

    info!("Example completed successfully!");
    Ok(())
}
