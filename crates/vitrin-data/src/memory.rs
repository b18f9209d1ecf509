//! In-memory content store.
//!
//! Evaluates [`DocumentQuery`] values directly against JSON documents, with
//! the same reference, matching and top-level projection semantics as the
//! remote store. Used for local development and tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value};
use vitrin_commerce::DocumentQuery;

use crate::error::StoreError;
use crate::store::ContentStore;

#[derive(Debug, Default)]
pub struct MemoryContentStore {
    documents: Mutex<Vec<Value>>,
    failing: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
    next_id: AtomicUsize,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with documents.
    pub fn with_documents(documents: Vec<Value>) -> Self {
        let store = Self::new();
        *store.lock() = documents;
        store
    }

    /// Add a document.
    pub fn insert(&self, document: Value) {
        self.lock().push(document);
    }

    /// Make every subsequent call fail with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of read queries received.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of create calls received.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Stored documents of one type, unresolved.
    pub fn documents_of_type(&self, doc_type: &str) -> Vec<Value> {
        self.lock()
            .iter()
            .filter(|d| d.get("_type").and_then(Value::as_str) == Some(doc_type))
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Value>> {
        self.documents.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Transport("memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }

    /// Evaluate a query against the current documents.
    pub fn evaluate(&self, query: &DocumentQuery) -> Value {
        let documents = self.lock();
        let mut hits: Vec<Value> = documents
            .iter()
            .map(|doc| resolve_references(doc, &documents))
            .filter(|doc| query.matches(doc))
            .collect();
        drop(documents);

        hits.sort_by(|a, b| query.sort.compare(a, b));

        let mut hits = hits.into_iter().map(|doc| query.apply_projection(doc));
        if query.single {
            hits.next().unwrap_or(Value::Null)
        } else {
            Value::Array(hits.collect())
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl ContentStore for MemoryContentStore {
    async fn fetch(&self, query: &DocumentQuery) -> Result<Value, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.evaluate(query))
    }

    async fn create(&self, mut document: Value) -> Result<Value, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let fields = document
            .as_object_mut()
            .ok_or_else(|| StoreError::Query("documents must be JSON objects".to_string()))?;
        if !fields.contains_key("_type") {
            return Err(StoreError::Query("documents need a _type".to_string()));
        }
        if !fields.contains_key("_id") {
            let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            fields.insert("_id".to_string(), Value::String(format!("mem-{}", n)));
        }

        self.insert(document.clone());
        Ok(document)
    }
}

/// Replace top-level `{ "_ref": id }` values (and arrays of them) with the
/// referenced document. Dangling references become `null`.
fn resolve_references(doc: &Value, all: &[Value]) -> Value {
    let Some(fields) = doc.as_object() else {
        return doc.clone();
    };

    let resolved: Map<String, Value> = fields
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Array(items) => Value::Array(
                    items
                        .iter()
                        .map(|item| dereference(item, all).unwrap_or_else(|| item.clone()))
                        .collect(),
                ),
                other => dereference(other, all).unwrap_or_else(|| other.clone()),
            };
            (key.clone(), value)
        })
        .collect();

    Value::Object(resolved)
}

/// `Some(target)` if `value` is a reference, `Some(null)` if it dangles.
fn dereference(value: &Value, all: &[Value]) -> Option<Value> {
    let id = value.get("_ref")?.as_str()?;
    Some(
        all.iter()
            .find(|d| d.get("_id").and_then(Value::as_str) == Some(id))
            .cloned()
            .unwrap_or(Value::Null),
    )
}
