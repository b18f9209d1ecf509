//! Content store error types.

use std::time::Duration;

use thiserror::Error;

/// Longest response body excerpt kept on an [`StoreError::Http`].
const BODY_EXCERPT_CHARS: usize = 512;

/// Errors from talking to the content store.
///
/// These carry internal detail for logs. They must be mapped to a
/// user-facing error before crossing an HTTP boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Content store request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Content store returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid content store response: {0}")]
    Decode(String),

    #[error("Content store rejected query: {0}")]
    Query(String),

    #[error("Writes require an API token")]
    MissingToken,
}

impl StoreError {
    /// Build an HTTP error, keeping only the start of the body.
    pub fn http(status: u16, body: &[u8]) -> Self {
        let body = String::from_utf8_lossy(body);
        StoreError::Http {
            status,
            body: body.chars().take(BODY_EXCERPT_CHARS).collect(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, StoreError::Timeout(_))
    }

    /// HTTP status, if the store answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_truncates_body() {
        let body = "x".repeat(2_000);
        let err = StoreError::http(502, body.as_bytes());
        match &err {
            StoreError::Http { status, body } => {
                assert_eq!(*status, 502);
                assert_eq!(body.len(), BODY_EXCERPT_CHARS);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_decode_from_serde() {
        let err: StoreError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, StoreError::Decode(_)));
        assert!(!err.is_timeout());
    }
}
