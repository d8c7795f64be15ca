//! In-process HTTP server used by the integration tests.
//!
//! Implements just enough of the remote KV REST surface (values, keys and
//! bulk endpoints plus the JSON envelope shapes) to exercise the client,
//! and records every request it sees so tests can assert on the exact
//! wire traffic. Keys used through the bulk endpoint must not need
//! percent-encoding; the store is keyed by request path.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

/// One request as observed by the server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Minimal stateful KV remote speaking the envelope protocol.
#[derive(Clone, Default)]
pub struct MockRemote {
    values: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockRemote {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> (Self, SocketAddr) {
        let remote = MockRemote::default();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server addr");

        let server = remote.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let server = server.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(server.clone(), req));
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        (remote, addr)
    }

    /// Snapshot of every request handled so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Insert a value directly, bypassing the HTTP surface.
    ///
    /// `encoded_key` must already be percent-encoded the way the client
    /// would encode it.
    pub fn seed_value(&self, account_id: &str, namespace_id: &str, encoded_key: &str, value: Vec<u8>) {
        let path = format!(
            "/accounts/{}/storage/kv/namespaces/{}/values/{}",
            account_id, namespace_id, encoded_key
        );
        self.values.lock().unwrap().insert(path, value);
    }
}

async fn handle(
    remote: MockRemote,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let (parts, body) = req.into_parts();
    let method = parts.method.clone();
    let path = parts.uri.path().to_string();
    let query = parts.uri.query().map(|q| q.to_string());
    let authorization = header_value(&parts.headers, "authorization");
    let content_type = header_value(&parts.headers, "content-type");
    let body = body.collect().await?.to_bytes().to_vec();

    remote.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: query.clone(),
        authorization,
        content_type,
        body: body.clone(),
    });

    let response = if method == Method::PUT && path.contains("/values/") {
        remote.values.lock().unwrap().insert(path, body);
        json_response(StatusCode::OK, success_envelope())
    } else if method == Method::GET && path.contains("/values/") {
        match remote.values.lock().unwrap().get(&path) {
            Some(value) => value_response(value.clone()),
            None => json_response(StatusCode::NOT_FOUND, not_found_envelope()),
        }
    } else if method == Method::GET && path.ends_with("/keys") {
        handle_list(&remote, &path, query.as_deref())
    } else if method == Method::DELETE && path.ends_with("/bulk") {
        handle_bulk_delete(&remote, &path, &body)
    } else {
        json_response(StatusCode::NOT_FOUND, not_found_envelope())
    };

    Ok(response)
}

fn handle_list(remote: &MockRemote, path: &str, query: Option<&str>) -> Response<Full<Bytes>> {
    let base = path.trim_end_matches("/keys");
    let values_prefix = format!("{}/values/", base);

    let mut limit = 1000usize;
    let mut prefix: Option<String> = None;
    if let Some(q) = query {
        for (k, v) in url::form_urlencoded::parse(q.as_bytes()) {
            match k.as_ref() {
                "limit" => {
                    if let Ok(n) = v.parse() {
                        limit = n;
                    }
                }
                "prefix" => prefix = Some(v.to_string()),
                _ => {}
            }
        }
    }

    let values = remote.values.lock().unwrap();
    let mut names: Vec<String> = values
        .keys()
        .filter_map(|k| k.strip_prefix(&values_prefix).map(str::to_string))
        .collect();
    drop(values);
    names.sort();

    if let Some(p) = &prefix {
        names.retain(|n| n.starts_with(p.as_str()));
    }
    let truncated = names.len() > limit;
    names.truncate(limit);

    let keys: Vec<serde_json::Value> = names
        .iter()
        .map(|n| serde_json::json!({ "name": n }))
        .collect();
    let mut result_info = serde_json::json!({ "count": keys.len() });
    if truncated {
        result_info["cursor"] = serde_json::json!("next-page-cursor");
    }

    json_response(
        StatusCode::OK,
        serde_json::json!({
            "success": true,
            "errors": [],
            "messages": [],
            "result": keys,
            "result_info": result_info,
        }),
    )
}

fn handle_bulk_delete(remote: &MockRemote, path: &str, body: &[u8]) -> Response<Full<Bytes>> {
    let keys: Vec<String> = match serde_json::from_slice(body) {
        Ok(keys) => keys,
        Err(_) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "success": false,
                    "errors": [{ "code": 10012, "message": "malformed bulk body" }],
                    "messages": [],
                    "result": null,
                }),
            );
        }
    };

    let base = path.trim_end_matches("/bulk");
    let mut values = remote.values.lock().unwrap();
    for key in &keys {
        values.remove(&format!("{}/values/{}", base, key));
    }

    json_response(StatusCode::OK, success_envelope())
}

fn header_value(headers: &hyper::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn success_envelope() -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": null,
    })
}

fn not_found_envelope() -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "errors": [{ "code": 10009, "message": "key not found" }],
        "messages": [],
        "result": null,
    })
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

fn value_response(value: Vec<u8>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/plain")
        .body(Full::new(Bytes::from(value)))
        .unwrap()
}
