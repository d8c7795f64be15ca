//! Data types for the namespaced KV client

use serde::{Deserialize, Serialize};

use crate::duration::parse_duration;
use crate::error::Result;

/// Uniform JSON response wrapper used by the remote API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the remote reported the call as successful
    pub success: bool,
    /// Error entries reported by the remote
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    /// Informational messages reported by the remote
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    /// Operation result payload, when present
    #[serde(default)]
    pub result: Option<T>,
    /// Pagination info, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_info: Option<ResultInfo>,
}

/// A single error or informational entry in an [`Envelope`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Numeric code assigned by the remote
    pub code: i64,
    /// Human-readable message
    pub message: String,
}

/// Pagination info returned alongside a key listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultInfo {
    /// Number of keys in this page
    pub count: u64,
    /// Opaque token for fetching the next page; absent on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// A single key record returned by a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyEntry {
    /// The key name
    pub name: String,
    /// Expiration as seconds since the Unix epoch, if the key expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u64>,
    /// Arbitrary metadata attached to the key at write time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Envelope returned by [`Client::list`](crate::Client::list)
pub type ListEnvelope = Envelope<Vec<KeyEntry>>;

/// Envelope returned by [`Client::set`](crate::Client::set) and
/// [`Client::delete`](crate::Client::delete)
pub type WriteEnvelope = Envelope<serde_json::Value>;

/// Options for [`Client::list`](crate::Client::list)
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Namespace id override; defaults to the client's configured namespace
    pub namespace_id: Option<String>,
    /// Maximum number of keys to return in one page
    pub limit: Option<u32>,
    /// Opaque pagination cursor from a previous page
    pub cursor: Option<String>,
    /// Restrict the listing to keys whose name begins with this prefix
    pub prefix: Option<String>,
}

/// Options for [`Client::get`](crate::Client::get)
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Namespace id override; defaults to the client's configured namespace
    pub namespace_id: Option<String>,
}

/// Options for [`Client::set`](crate::Client::set)
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// Namespace id override; defaults to the client's configured namespace
    pub namespace_id: Option<String>,
    /// Absolute expiration as seconds since the Unix epoch
    pub expiration: Option<u64>,
    /// Relative expiration; wins over `expiration` when both are given
    pub expiration_ttl: Option<Ttl>,
}

/// Options for [`Client::delete`](crate::Client::delete)
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    /// Namespace id override; defaults to the client's configured namespace
    pub namespace_id: Option<String>,
}

/// Relative expiration for a write, as raw seconds or a duration string
#[derive(Debug, Clone)]
pub enum Ttl {
    /// Time-to-live in whole seconds
    Seconds(u64),
    /// Duration string such as `"10m"`, parsed by
    /// [`parse_duration`](crate::parse_duration) before transmission
    Text(String),
}

impl Ttl {
    /// Resolve the TTL to a whole number of seconds.
    pub fn to_seconds(&self) -> Result<u64> {
        match self {
            Ttl::Seconds(secs) => Ok(*secs),
            Ttl::Text(text) => parse_duration(text),
        }
    }
}

impl From<u64> for Ttl {
    fn from(secs: u64) -> Self {
        Ttl::Seconds(secs)
    }
}

impl From<&str> for Ttl {
    fn from(text: &str) -> Self {
        Ttl::Text(text.to_string())
    }
}

impl From<String> for Ttl {
    fn from(text: String) -> Self {
        Ttl::Text(text)
    }
}

/// Key selector for [`Client::delete`](crate::Client::delete): one key or
/// a batch of keys
///
/// The remote caps a bulk request at 10,000 keys; the client does not
/// enforce the limit.
#[derive(Debug, Clone)]
pub enum DeleteKeys {
    /// Delete a single key
    One(String),
    /// Delete a batch of keys
    Many(Vec<String>),
}

impl DeleteKeys {
    /// Normalize to the list shape used by the bulk endpoint.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            DeleteKeys::One(key) => vec![key],
            DeleteKeys::Many(keys) => keys,
        }
    }
}

impl From<&str> for DeleteKeys {
    fn from(key: &str) -> Self {
        DeleteKeys::One(key.to_string())
    }
}

impl From<String> for DeleteKeys {
    fn from(key: String) -> Self {
        DeleteKeys::One(key)
    }
}

impl From<Vec<String>> for DeleteKeys {
    fn from(keys: Vec<String>) -> Self {
        DeleteKeys::Many(keys)
    }
}

impl From<Vec<&str>> for DeleteKeys {
    fn from(keys: Vec<&str>) -> Self {
        DeleteKeys::Many(keys.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for DeleteKeys {
    fn from(keys: &[&str]) -> Self {
        DeleteKeys::Many(keys.iter().map(|k| k.to_string()).collect())
    }
}
