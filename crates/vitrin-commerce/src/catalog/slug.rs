//! URL slugs.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;

/// A URL slug, stored by the content store as `{ "current": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug {
    pub current: String,
}

impl Slug {
    /// Parse a slug taken from a request path.
    ///
    /// Only lower-case ASCII letters, digits and single hyphens are
    /// accepted, so a parsed slug is always safe to place in a URL.
    pub fn parse(s: &str) -> Result<Self, CommerceError> {
        if is_url_safe(s) {
            Ok(Self {
                current: s.to_string(),
            })
        } else {
            Err(CommerceError::InvalidSlug(s.to_string()))
        }
    }

    /// Get the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.current
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.current)
    }
}

/// Check `[a-z0-9]+(-[a-z0-9]+)*`.
pub fn is_url_safe(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 200
        && !s.starts_with('-')
        && !s.ends_with('-')
        && !s.contains("--")
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
