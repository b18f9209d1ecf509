//! Outbound HTTP transports.
//!
//! Native builds talk to the content store through `reqwest` on tokio; the
//! Spin component uses the host's wasi-http outgoing handler. Both sit behind
//! [`Transport`] so the store client is the same on every target.

use std::sync::Arc;

use serde::Serialize;

use crate::error::StoreError;
#[cfg(target_arch = "wasm32")]
use crate::timeout::nanos;
use crate::timeout::TimeoutConfig;

/// A request to the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: http::Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl OutboundRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: http::Method::GET,
            url: url.into(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    /// A POST carrying `body` as JSON.
    pub fn post_json<T: Serialize>(url: impl Into<String>, body: &T) -> Result<Self, StoreError> {
        let mut request = Self::get(url);
        request.method = http::Method::POST;
        request.body = Some(serde_json::to_vec(body)?);
        Ok(request.header("Content-Type", "application/json"))
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add an `Authorization: Bearer` header when a token is present.
    pub fn bearer_auth(self, token: Option<&str>) -> Self {
        match token {
            Some(token) if !token.is_empty() => {
                self.header("Authorization", format!("Bearer {}", token))
            }
            _ => self,
        }
    }
}

/// Status and body of a store response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl OutboundResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response.
///
/// Implementations enforce their own deadline and map every failure to a
/// [`StoreError`]; non-2xx statuses are returned, not raised.
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<OutboundResponse, StoreError>;
}

/// The transport for the current target.
pub fn default_transport(timeout: TimeoutConfig) -> Result<Arc<dyn Transport>, StoreError> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Ok(Arc::new(ReqwestTransport::new(timeout)?))
    }
    #[cfg(target_arch = "wasm32")]
    {
        Ok(Arc::new(WasiTransport::new(timeout)))
    }
}

/// `reqwest` transport with a connect timeout, a client timeout and a
/// tokio deadline around the whole exchange.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: TimeoutConfig,
}

#[cfg(not(target_arch = "wasm32"))]
impl ReqwestTransport {
    pub fn new(timeout: TimeoutConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout.connect)
            .timeout(timeout.total)
            .user_agent(concat!("vitrin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self { client, timeout })
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<OutboundResponse, StoreError> {
        let total = self.timeout.total;
        let map_err = move |e: reqwest::Error| {
            if e.is_timeout() {
                StoreError::Timeout(total)
            } else {
                StoreError::Transport(e.to_string())
            }
        };

        let mut builder = self.client.request(request.method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        crate::timeout::with_deadline(total, async move {
            let response = builder.send().await.map_err(map_err)?;
            let status = response.status().as_u16();
            let body = response.bytes().await.map_err(map_err)?;
            Ok(OutboundResponse {
                status,
                body: body.to_vec(),
            })
        })
        .await
    }
}

/// wasi-http transport used inside the Spin component.
///
/// The host enforces the connect, first-byte and between-bytes limits from
/// [`TimeoutConfig`]; the body read loop also checks the total deadline
/// against the monotonic clock.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy)]
pub struct WasiTransport {
    timeout: TimeoutConfig,
}

#[cfg(target_arch = "wasm32")]
impl WasiTransport {
    pub fn new(timeout: TimeoutConfig) -> Self {
        Self { timeout }
    }

    fn options(&self) -> wasi::http::types::RequestOptions {
        let options = wasi::http::types::RequestOptions::new();
        // Limits the host cannot honour fall back to its defaults.
        let _ = options.set_connect_timeout(Some(nanos(self.timeout.connect)));
        let _ = options.set_first_byte_timeout(Some(nanos(self.timeout.total)));
        let _ = options.set_between_bytes_timeout(Some(nanos(self.timeout.total)));
        options
    }

    fn send_blocking(&self, request: OutboundRequest) -> Result<OutboundResponse, StoreError> {
        use wasi::clocks::monotonic_clock;
        use wasi::http::outgoing_handler;
        use wasi::http::types::{Fields, Method, OutgoingBody, OutgoingRequest, Scheme};
        use wasi::io::streams::StreamError;

        let total = self.timeout.total;
        let started = monotonic_clock::now();
        let fail = |what: &str| StoreError::Transport(format!("{} for {}", what, request.url));

        let uri: http::Uri = request
            .url
            .parse()
            .map_err(|e: http::uri::InvalidUri| StoreError::Transport(e.to_string()))?;

        let headers = Fields::new();
        for (key, value) in &request.headers {
            headers
                .append(&key.to_lowercase(), &value.as_bytes().to_vec())
                .map_err(|_| fail("rejected header"))?;
        }

        let outgoing = OutgoingRequest::new(headers);
        let method = match request.method {
            http::Method::GET => Method::Get,
            http::Method::POST => Method::Post,
            http::Method::PUT => Method::Put,
            http::Method::PATCH => Method::Patch,
            http::Method::DELETE => Method::Delete,
            ref other => Method::Other(other.to_string()),
        };
        let scheme = match uri.scheme_str() {
            Some("http") => Scheme::Http,
            _ => Scheme::Https,
        };
        outgoing
            .set_method(&method)
            .and_then(|_| outgoing.set_scheme(Some(&scheme)))
            .and_then(|_| outgoing.set_authority(uri.authority().map(|a| a.as_str())))
            .and_then(|_| {
                outgoing.set_path_with_query(uri.path_and_query().map(|p| p.as_str()))
            })
            .map_err(|_| fail("invalid request target"))?;

        let body = outgoing.body().map_err(|_| fail("request body unavailable"))?;
        let pending = outgoing_handler::handle(outgoing, Some(self.options()))
            .map_err(|code| error_from_code(&code, total))?;

        {
            let stream = body.write().map_err(|_| fail("request body unavailable"))?;
            for chunk in request.body.as_deref().unwrap_or_default().chunks(4096) {
                stream
                    .blocking_write_and_flush(chunk)
                    .map_err(|_| fail("request body write failed"))?;
            }
        }
        OutgoingBody::finish(body, None).map_err(|code| error_from_code(&code, total))?;

        pending.subscribe().block();
        let response = match pending.get() {
            Some(Ok(Ok(response))) => response,
            Some(Ok(Err(code))) => return Err(error_from_code(&code, total)),
            Some(Err(())) | None => return Err(fail("response already taken")),
        };

        let status = response.status();
        let incoming = response.consume().map_err(|_| fail("response body unavailable"))?;
        let stream = incoming.stream().map_err(|_| fail("response body unavailable"))?;
        let mut bytes = Vec::new();
        loop {
            if monotonic_clock::now().saturating_sub(started) > nanos(total) {
                return Err(StoreError::Timeout(total));
            }
            match stream.blocking_read(64 * 1024) {
                Ok(chunk) => bytes.extend_from_slice(&chunk),
                Err(StreamError::Closed) => break,
                Err(StreamError::LastOperationFailed(err)) => {
                    return Err(match wasi::http::types::http_error_code(&err) {
                        Some(code) => error_from_code(&code, total),
                        None => StoreError::Transport(err.to_debug_string()),
                    });
                }
            }
        }

        Ok(OutboundResponse {
            status,
            body: bytes,
        })
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait::async_trait(?Send)]
impl Transport for WasiTransport {
    async fn send(&self, request: OutboundRequest) -> Result<OutboundResponse, StoreError> {
        self.send_blocking(request)
    }
}

/// Map a wasi-http failure onto the store taxonomy.
#[cfg(target_arch = "wasm32")]
fn error_from_code(code: &wasi::http::types::ErrorCode, total: std::time::Duration) -> StoreError {
    use wasi::http::types::ErrorCode;

    match code {
        ErrorCode::ConnectionTimeout
        | ErrorCode::ConnectionReadTimeout
        | ErrorCode::ConnectionWriteTimeout
        | ErrorCode::HttpResponseTimeout => StoreError::Timeout(total),
        other => StoreError::Transport(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_json_sets_content_type() {
        let request =
            OutboundRequest::post_json("https://x.test/mutate", &serde_json::json!({"a": 1}))
                .unwrap()
                .bearer_auth(Some("secret"));

        assert_eq!(request.method, http::Method::POST);
        assert_eq!(request.body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
        assert!(request
            .headers
            .contains(&("Content-Type".to_string(), "application/json".to_string())));
        assert!(request
            .headers
            .contains(&("Authorization".to_string(), "Bearer secret".to_string())));
    }

    #[test]
    fn test_bearer_auth_skips_empty_token() {
        let request = OutboundRequest::get("https://x.test").bearer_auth(Some(""));
        assert!(!request.headers.iter().any(|(k, _)| k == "Authorization"));
        let request = OutboundRequest::get("https://x.test").bearer_auth(None);
        assert_eq!(request.headers.len(), 1);
    }

    #[cfg(target_arch = "wasm32")]
    #[test]
    fn test_wasi_timeouts_map_to_store_timeout() {
        use std::time::Duration;
        use wasi::http::types::ErrorCode;

        let total = Duration::from_secs(8);
        for code in [
            ErrorCode::ConnectionTimeout,
            ErrorCode::ConnectionReadTimeout,
            ErrorCode::HttpResponseTimeout,
        ] {
            assert_eq!(error_from_code(&code, total), StoreError::Timeout(total));
        }
        assert!(matches!(
            error_from_code(&ErrorCode::ConnectionRefused, total),
            StoreError::Transport(_)
        ));
    }
}
