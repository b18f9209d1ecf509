//! The content store abstraction.

use serde::de::DeserializeOwned;
use serde_json::Value;
use vitrin_commerce::DocumentQuery;

use crate::error::StoreError;

/// A document store answering structured queries.
///
/// Reads return the raw JSON result: an array for listings, an object or
/// `null` for single-document queries.
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait ContentStore: Send + Sync {
    /// Run a read query. May be served from a cache or CDN.
    async fn fetch(&self, query: &DocumentQuery) -> Result<Value, StoreError>;

    /// Run a read query against the origin, bypassing any cache.
    async fn fetch_fresh(&self, query: &DocumentQuery) -> Result<Value, StoreError> {
        self.fetch(query).await
    }

    /// Create a document and return it as stored.
    async fn create(&self, document: Value) -> Result<Value, StoreError>;
}

/// Fetch a listing and deserialize each document.
///
/// Documents that fail to deserialize (a negative price, a missing slug)
/// are skipped with a warning instead of failing the whole listing.
pub async fn fetch_many<T: DeserializeOwned>(
    store: &dyn ContentStore,
    query: &DocumentQuery,
) -> Result<Vec<T>, StoreError> {
    let items = match store.fetch(query).await? {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(StoreError::Decode(format!(
                "expected an array for {} listing, got {}",
                query.doc_type,
                type_name(&other)
            )))
        }
    };

    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(doc_type = query.doc_type, error = %e, "skipping malformed document");
                None
            }
        })
        .collect();

    if parsed.len() < total {
        tracing::debug!(
            doc_type = query.doc_type,
            kept = parsed.len(),
            total,
            "listing contained malformed documents"
        );
    }
    Ok(parsed)
}

/// Fetch a single document; `null` becomes `None`.
pub async fn fetch_one<T: DeserializeOwned>(
    store: &dyn ContentStore,
    query: &DocumentQuery,
) -> Result<Option<T>, StoreError> {
    match store.fetch(query).await? {
        Value::Null => Ok(None),
        value => Ok(Some(serde_json::from_value(value)?)),
    }
}

/// Whether a query matches any document, read from the origin.
pub async fn exists(store: &dyn ContentStore, query: &DocumentQuery) -> Result<bool, StoreError> {
    Ok(match store.fetch_fresh(query).await? {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        _ => true,
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
