//! HTTP client implementation for the namespaced KV storage API

use std::env;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client as HttpClient;
use hyper_util::rt::TokioExecutor;
use tracing::debug;
use url::form_urlencoded;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{Error, Result};
use crate::types::*;

/// Characters allowed unencoded in a URI path segment per RFC 3986.
/// Everything else (including `/`, spaces, `#`, `?`, `%`, non-ASCII) gets
/// percent-encoded: a key always occupies exactly one segment under
/// `/values/`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// Percent-encode a key for use in a URI path.
fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, PATH_SEGMENT).to_string()
}

/// Configuration options for the KV storage client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API endpoint base URL (default: http://localhost:3000)
    pub endpoint: String,
    /// Account id owning the namespaces
    pub account_id: String,
    /// Default namespace id for all operations
    pub namespace_id: String,
    /// Bearer token attached to every request
    pub token: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000".to_string(),
            account_id: String::new(),
            namespace_id: String::new(),
            token: String::new(),
        }
    }
}

impl ClientConfig {
    /// Build a configuration from environment variables.
    ///
    /// Reads `KV_ACCOUNT_ID`, `KV_NAMESPACE_ID` and `KV_API_TOKEN`
    /// (required), plus `KV_ENDPOINT` (optional, falls back to the
    /// default endpoint).
    pub fn from_env() -> Result<Self> {
        let endpoint = env::var("KV_ENDPOINT")
            .unwrap_or_else(|_| ClientConfig::default().endpoint);
        let account_id = env::var("KV_ACCOUNT_ID")
            .map_err(|_| Error::Config("KV_ACCOUNT_ID environment variable must be set".to_string()))?;
        let namespace_id = env::var("KV_NAMESPACE_ID")
            .map_err(|_| Error::Config("KV_NAMESPACE_ID environment variable must be set".to_string()))?;
        let token = env::var("KV_API_TOKEN")
            .map_err(|_| Error::Config("KV_API_TOKEN environment variable must be set".to_string()))?;

        Ok(Self {
            endpoint,
            account_id,
            namespace_id,
            token,
        })
    }
}

/// Build a rustls ClientConfig for https endpoints.
fn build_tls_config() -> Result<rustls::ClientConfig> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());

    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    Ok(rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| Error::Tls(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth())
}

type HttpsConnector = hyper_rustls::HttpsConnector<HttpConnector>;

/// Async client for a namespaced KV storage REST API
///
/// Every operation targets a namespace under one account and issues a
/// single HTTP request. The remote's response envelope is returned
/// verbatim: the client never inspects `success`/`errors`, and leaves
/// deadlines, retries and pagination loops to the caller.
///
/// # Example
/// ```rust,no_run
/// use kv_namespace_client::{Client, GetOptions, SetOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), kv_namespace_client::Error> {
///     let client = Client::new(
///         "https://kv.example.com/v1",
///         "023e105f4ecef8ad9ca31a8372d0c353",
///         "0f2ac74b498b48028cb68387c421e279",
///         "your-token",
///     )?;
///
///     let envelope = client.set("greeting", "hello", SetOptions::default()).await?;
///     assert!(envelope.success);
///
///     let value = client.get("greeting", GetOptions::default()).await?;
///     assert_eq!(value.as_deref(), Some("hello"));
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    http_client: HttpClient<HttpsConnector, Full<Bytes>>,
}

impl Client {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `endpoint` - API base URL (e.g., "https://kv.example.com/v1")
    /// * `account_id` - Account owning the namespaces
    /// * `namespace_id` - Default namespace for all operations
    /// * `token` - Bearer token used to authenticate every request
    ///
    /// # Errors
    /// Returns an error if the endpoint URL is invalid
    pub fn new(endpoint: &str, account_id: &str, namespace_id: &str, token: &str) -> Result<Self> {
        Self::with_config(ClientConfig {
            endpoint: endpoint.to_string(),
            account_id: account_id.to_string(),
            namespace_id: namespace_id.to_string(),
            token: token.to_string(),
        })
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        // Validate the endpoint URL early
        let _: Uri = config
            .endpoint
            .parse()
            .map_err(|e| Error::InvalidUrl(format!("Invalid endpoint URL: {}", e)))?;

        let tls_config = build_tls_config()?;

        let https_connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_all_versions()
            .build();

        let http_client = HttpClient::builder(TokioExecutor::new()).build(https_connector);

        Ok(Self {
            config: Arc::new(config),
            http_client,
        })
    }

    /// Create a client from environment variables.
    ///
    /// Explicit factory for the common "configure once from the
    /// environment" setup; see [`ClientConfig::from_env`] for the
    /// variables read.
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Get the endpoint base URL
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Get the default namespace id
    pub fn namespace_id(&self) -> &str {
        &self.config.namespace_id
    }

    /// Base path for a namespace, honoring a per-call override.
    ///
    /// The namespace id travels in the path only and is never serialized
    /// into the query string.
    fn namespace_path(&self, namespace_id: Option<&str>) -> String {
        format!(
            "/accounts/{}/storage/kv/namespaces/{}",
            self.config.account_id,
            namespace_id.unwrap_or(&self.config.namespace_id),
        )
    }

    /// Internal request method shared by all operations
    async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
        content_type: &str,
    ) -> Result<Response<Incoming>> {
        let url = format!("{}{}", self.config.endpoint, path_and_query);
        let uri: Uri = url
            .parse()
            .map_err(|e| Error::InvalidUrl(format!("Invalid request URL: {}", e)))?;

        let req = Request::builder()
            .method(method.clone())
            .uri(uri)
            .header("authorization", format!("Bearer {}", self.config.token))
            .header("content-type", content_type)
            .body(Full::new(body.unwrap_or_default()))
            .map_err(|e| Error::InvalidRequest(format!("Failed to build request: {}", e)))?;

        debug!("Sending request: {} {}", method, path_and_query);

        self.http_client
            .request(req)
            .await
            .map_err(|e| Error::Connection(format!("Request failed: {}", e)))
    }

    /// Read response body to bytes
    async fn read_body_to_bytes(body: Incoming) -> Result<Vec<u8>> {
        let collected = body
            .collect()
            .await
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        Ok(collected.to_bytes().to_vec())
    }

    /// List keys in a namespace.
    ///
    /// Serializes `limit`, `cursor` and `prefix` as query parameters and
    /// returns the remote envelope verbatim. No pagination loop is run:
    /// pass `result_info.cursor` back in to fetch the next page. Prefix
    /// filtering happens on the remote; the client does not filter
    /// locally.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use kv_namespace_client::{Client, ListOptions};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), kv_namespace_client::Error> {
    /// # let client = Client::new("http://localhost:3000", "acct", "ns", "token")?;
    /// let envelope = client
    ///     .list(ListOptions {
    ///         prefix: Some("user:".to_string()),
    ///         limit: Some(100),
    ///         ..Default::default()
    ///     })
    ///     .await?;
    /// for entry in envelope.result.unwrap_or_default() {
    ///     println!("{} (expires: {:?})", entry.name, entry.expiration);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self, options: ListOptions) -> Result<ListEnvelope> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(limit) = options.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(cursor) = &options.cursor {
            query.append_pair("cursor", cursor);
        }
        if let Some(prefix) = &options.prefix {
            query.append_pair("prefix", prefix);
        }
        let query = query.finish();

        let mut path = format!("{}/keys", self.namespace_path(options.namespace_id.as_deref()));
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query);
        }

        let response = self
            .request(Method::GET, &path, None, "application/json")
            .await?;
        let body_bytes = Self::read_body_to_bytes(response.into_body()).await?;
        let envelope: ListEnvelope = serde_json::from_slice(&body_bytes)?;
        Ok(envelope)
    }

    /// Read the value stored under `key`.
    ///
    /// The body is treated as a literal text payload and returned as-is,
    /// even when it happens to parse as JSON. Returns `None` when the key
    /// does not exist or the body is not representable as a string.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use kv_namespace_client::{Client, GetOptions};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), kv_namespace_client::Error> {
    /// # let client = Client::new("http://localhost:3000", "acct", "ns", "token")?;
    /// if let Some(value) = client.get("user:123", GetOptions::default()).await? {
    ///     println!("User data: {}", value);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get(&self, key: &str, options: GetOptions) -> Result<Option<String>> {
        let path = format!(
            "{}/values/{}",
            self.namespace_path(options.namespace_id.as_deref()),
            encode_key(key),
        );

        let response = self
            .request(Method::GET, &path, None, "application/json")
            .await?;
        let status = response.status();
        let body_bytes = Self::read_body_to_bytes(response.into_body()).await?;

        let text = match String::from_utf8(body_bytes) {
            Ok(text) => text,
            // Defensive branch: a value that is not representable as a
            // string maps to the absent sentinel.
            Err(_) => return Ok(None),
        };

        if !status.is_success() {
            // Missing keys come back as a failure envelope, not a value.
            if let Ok(envelope) = serde_json::from_str::<WriteEnvelope>(&text) {
                debug!("get {:?}: remote reported {:?}", key, envelope.errors);
            }
            return Ok(None);
        }

        // Diagnostic only: the raw string is returned either way.
        if serde_json::from_str::<serde_json::Value>(&text)
            .map(|v| v.is_object())
            .unwrap_or(false)
        {
            debug!("get {:?}: value parses as a JSON object, returning raw text", key);
        }

        Ok(Some(text))
    }

    /// Write `value` under `key`, optionally with an expiration.
    ///
    /// A text TTL such as `"10m"` is converted to whole seconds before
    /// transmission; when both `expiration` and `expiration_ttl` are
    /// given, only the TTL is sent. The value travels as a `text/plain`
    /// body and the remote envelope is returned verbatim.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use kv_namespace_client::{Client, SetOptions, Ttl};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), kv_namespace_client::Error> {
    /// # let client = Client::new("http://localhost:3000", "acct", "ns", "token")?;
    /// let envelope = client
    ///     .set(
    ///         "session:abc",
    ///         "opaque-session-state",
    ///         SetOptions {
    ///             expiration_ttl: Some(Ttl::from("10m")),
    ///             ..Default::default()
    ///         },
    ///     )
    ///     .await?;
    /// assert!(envelope.success);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set(&self, key: &str, value: &str, options: SetOptions) -> Result<WriteEnvelope> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(ttl) = &options.expiration_ttl {
            query.append_pair("expiration_ttl", &ttl.to_seconds()?.to_string());
        } else if let Some(expiration) = options.expiration {
            query.append_pair("expiration", &expiration.to_string());
        }
        let query = query.finish();

        let mut path = format!(
            "{}/values/{}",
            self.namespace_path(options.namespace_id.as_deref()),
            encode_key(key),
        );
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query);
        }

        let response = self
            .request(
                Method::PUT,
                &path,
                Some(Bytes::copy_from_slice(value.as_bytes())),
                "text/plain",
            )
            .await?;
        let body_bytes = Self::read_body_to_bytes(response.into_body()).await?;
        let envelope: WriteEnvelope = serde_json::from_slice(&body_bytes)?;
        Ok(envelope)
    }

    /// Delete one key or a batch of keys in a single bulk request.
    ///
    /// Accepts anything convertible into [`DeleteKeys`]: a single key or
    /// a list of keys, normalized internally to a JSON array body. The
    /// remote envelope is returned verbatim.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use kv_namespace_client::{Client, DeleteOptions};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), kv_namespace_client::Error> {
    /// # let client = Client::new("http://localhost:3000", "acct", "ns", "token")?;
    /// client.delete("old-key", DeleteOptions::default()).await?;
    /// client
    ///     .delete(vec!["stale:1", "stale:2"], DeleteOptions::default())
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn delete(
        &self,
        keys: impl Into<DeleteKeys>,
        options: DeleteOptions,
    ) -> Result<WriteEnvelope> {
        let keys = keys.into().into_vec();
        let body = serde_json::to_vec(&keys)?;

        let path = format!("{}/bulk", self.namespace_path(options.namespace_id.as_deref()));
        let response = self
            .request(Method::DELETE, &path, Some(Bytes::from(body)), "application/json")
            .await?;
        let body_bytes = Self::read_body_to_bytes(response.into_body()).await?;
        let envelope: WriteEnvelope = serde_json::from_slice(&body_bytes)?;
        Ok(envelope)
    }
}
