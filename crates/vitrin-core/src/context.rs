//! Request context with typed parameters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::lifecycle::TimingContext;

/// Header used to propagate a caller-supplied request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Unique request identifier for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        static SEQUENCE: AtomicU32 = AtomicU32::new(0);

        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);

        Self(format!("{:x}-{:x}", nanos, seq))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Query string parameters.
pub type QueryParams = HashMap<String, String>;

/// HTTP headers, keyed by lower-cased name.
pub type Headers = HashMap<String, String>;

/// Typed request context passed to storefront handlers.
#[derive(Debug)]
pub struct RequestContext {
    /// Unique request identifier.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: http::Method,
    /// Request path, without the query string.
    pub path: String,
    /// Query string parameters (percent-decoded).
    pub query: QueryParams,
    /// HTTP headers.
    pub headers: Headers,
    /// Timing context for observability.
    pub timing: TimingContext,
}

impl RequestContext {
    /// Create a new request context.
    pub fn new(method: http::Method, path_and_query: &str) -> Self {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, qs)) => (path, parse_query_string(qs)),
            None => (path_and_query, HashMap::new()),
        };

        Self {
            request_id: RequestId::generate(),
            method,
            path: path.to_string(),
            query,
            headers: HashMap::new(),
            timing: TimingContext::new(),
        }
    }

    /// Build a context from an `http::Request`.
    ///
    /// A valid `x-request-id` header is reused so that callers can correlate
    /// their own logs with ours.
    pub fn from_http<B>(req: &http::Request<B>) -> Self {
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        let mut ctx = Self::new(req.method().clone(), path_and_query);

        for (name, value) in req.headers() {
            if let Ok(value) = value.to_str() {
                ctx.headers.insert(name.as_str().to_lowercase(), value.to_string());
            }
        }

        if let Some(id) = ctx.header(REQUEST_ID_HEADER) {
            if is_valid_request_id(id) {
                ctx.request_id = RequestId::from_string(id);
            }
        }

        ctx
    }

    /// Get a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(|s| s.as_str())
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Path split into non-empty segments.
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }
}

fn is_valid_request_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Parse a URL query string into decoded key/value pairs.
///
/// Later occurrences of a key overwrite earlier ones. A key without `=`
/// maps to the empty string.
pub fn parse_query_string(qs: &str) -> QueryParams {
    let mut params = HashMap::new();

    for pair in qs.split('&').filter(|p| !p.is_empty()) {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("");
        params.insert(percent_decode(key), percent_decode(value));
    }

    params
}

/// Decode `%XX` escapes and `+` as space. Invalid escapes are kept verbatim
/// and invalid UTF-8 is replaced.
pub fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Percent-encode a value for use in a query string.
pub fn percent_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char)
            }
            _ => result.push_str(&format!("%{:02X}", byte)),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_context_splits_path_and_query() {
        let ctx = RequestContext::new(http::Method::GET, "/search?q=%C3%A7anta&page=2");
        assert_eq!(ctx.path, "/search");
        assert_eq!(ctx.query_param("q"), Some("çanta"));
        assert_eq!(ctx.query_param("page"), Some("2"));
        assert_eq!(ctx.segments(), vec!["search"]);
    }

    #[test]
    fn test_key_without_value_is_empty() {
        let params = parse_query_string("q&x=1");
        assert_eq!(params.get("q").map(String::as_str), Some(""));
        assert_eq!(params.get("x").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_percent_decode_plus_and_invalid_escape() {
        assert_eq!(percent_decode("bez+%C3%A7anta"), "bez çanta");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn test_percent_encode_utf8() {
        assert_eq!(percent_encode("çanta 1"), "%C3%A7anta%201");
    }

    #[test]
    fn test_from_http_reuses_request_id() {
        let req = http::Request::builder()
            .uri("/products/featured")
            .header("X-Request-Id", "abc-123")
            .body(())
            .unwrap();
        let ctx = RequestContext::from_http(&req);
        assert_eq!(ctx.request_id.as_str(), "abc-123");
        assert_eq!(ctx.header("x-request-id"), Some("abc-123"));
        assert_eq!(ctx.path, "/products/featured");
    }

    #[test]
    fn test_from_http_rejects_odd_request_id() {
        let req = http::Request::builder()
            .uri("/")
            .header("x-request-id", "bad id with spaces")
            .body(())
            .unwrap();
        let ctx = RequestContext::from_http(&req);
        assert_ne!(ctx.request_id.as_str(), "bad id with spaces");
    }
}
