//! Request handlers.
//!
//! Handlers take the injected [`AppState`](crate::AppState), the parsed
//! request context and a request-scoped logger, and return either a response
//! or an [`ApiError`] for the router to render.

pub mod catalog;
pub mod content;
pub mod forms;
pub mod search;

use serde::de::DeserializeOwned;
use vitrin_commerce::catalog::Slug;

use crate::{ApiError, Body};

pub type HandlerResult = Result<http::Response<Body>, ApiError>;

/// Parse a path slug. Anything that is not URL-safe cannot exist.
pub(crate) fn path_slug(raw: &str) -> Result<Slug, ApiError> {
    Slug::parse(raw).map_err(|_| ApiError::NotFound)
}

/// Decode a JSON request body.
pub(crate) fn json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}
