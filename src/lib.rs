//! Async client for a namespaced key-value storage REST API
//!
//! This library is a thin layer over the remote HTTP API: it builds
//! namespaced URLs, serializes query parameters, attaches bearer-token
//! authentication, and normalizes responses. The remote's JSON envelope
//! (`success`, `errors`, `messages`, `result`, `result_info`) is returned
//! verbatim; retries, deadlines and pagination loops are left to the
//! caller.
//!
//! # Features
//! - List, get, set and delete operations scoped to a namespace
//! - Per-call namespace override
//! - Expiration as epoch seconds or duration strings ("10m", "2h")
//! - Bulk deletion of many keys in a single request
//! - Async/await API using tokio
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use kv_namespace_client::{Client, DeleteOptions, GetOptions, SetOptions, Ttl};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kv_namespace_client::Error> {
//!     let client = Client::new(
//!         "https://kv.example.com/v1",
//!         "your-account-id",
//!         "your-namespace-id",
//!         "your-token",
//!     )?;
//!
//!     // Store a value that expires in ten minutes
//!     client
//!         .set(
//!             "greeting",
//!             "Hello, World!",
//!             SetOptions {
//!                 expiration_ttl: Some(Ttl::from("10m")),
//!                 ..Default::default()
//!             },
//!         )
//!         .await?;
//!
//!     // Retrieve it
//!     let value = client.get("greeting", GetOptions::default()).await?;
//!     println!("Retrieved: {:?}", value);
//!
//!     // Delete it
//!     client.delete("greeting", DeleteOptions::default()).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod client;
pub mod duration;
pub mod error;
pub mod types;

pub use client::{Client, ClientConfig};
pub use duration::parse_duration;
pub use error::{Error, Result};
pub use types::*;
