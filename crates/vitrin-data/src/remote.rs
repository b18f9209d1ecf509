//! HTTP content store client.
//!
//! Queries go out as `GET {query_url}?query=<groq>&$param=<json>`; values
//! from user input only ever travel as parameters. Creates are sent as a
//! single-mutation transaction and are never retried.

use std::sync::Arc;

use serde_json::{json, Value};
use vitrin_commerce::{DocumentQuery, GroqQuery};
use vitrin_core::{percent_encode, StoreConfig};

use crate::error::StoreError;
use crate::retry::RetryPolicy;
use crate::store::ContentStore;
use crate::timeout::{pause, TimeoutConfig};
use crate::transport::{default_transport, OutboundRequest, OutboundResponse, Transport};

/// Content store reached over HTTP.
#[derive(Clone)]
pub struct HttpContentStore {
    config: StoreConfig,
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for HttpContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpContentStore")
            .field("project_id", &self.config.project_id)
            .field("dataset", &self.config.dataset)
            .field("use_cdn", &self.config.use_cdn)
            .field("retry", &self.retry)
            .finish()
    }
}

impl HttpContentStore {
    /// Create a client using the target's default transport.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let transport = default_transport(TimeoutConfig::from_total(config.timeout()))?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client over an explicit transport.
    pub fn with_transport(config: StoreConfig, transport: Arc<dyn Transport>) -> Self {
        let retry = RetryPolicy::new(config.max_retries);
        Self {
            config,
            transport,
            retry,
        }
    }

    /// Override the retry policy for reads.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Full query URL with the GROQ text and every parameter encoded.
    pub fn query_url(&self, groq: &GroqQuery, fresh: bool) -> Result<String, StoreError> {
        let mut url = format!(
            "{}?query={}",
            self.config.query_url(fresh),
            percent_encode(&groq.query)
        );
        for (name, value) in &groq.params {
            let encoded = serde_json::to_string(value)?;
            url.push_str(&format!("&${}={}", name, percent_encode(&encoded)));
        }
        Ok(url)
    }

    async fn run_query(&self, query: &DocumentQuery, fresh: bool) -> Result<Value, StoreError> {
        let groq = query.to_groq();
        let url = self.query_url(&groq, fresh)?;
        let token = self.config.token.as_deref();

        let mut attempt = 0;
        loop {
            let request = OutboundRequest::get(url.clone()).bearer_auth(token);
            let result = match self.transport.send(request).await {
                Ok(response) => decode_query_response(response),
                Err(e) => Err(e),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if self.retry.should_retry(&e, attempt) => {
                    let delay = self.retry.backoff.delay_for_attempt(attempt);
                    tracing::warn!(
                        doc_type = query.doc_type,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying content store read"
                    );
                    pause(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl ContentStore for HttpContentStore {
    async fn fetch(&self, query: &DocumentQuery) -> Result<Value, StoreError> {
        self.run_query(query, false).await
    }

    async fn fetch_fresh(&self, query: &DocumentQuery) -> Result<Value, StoreError> {
        self.run_query(query, true).await
    }

    async fn create(&self, document: Value) -> Result<Value, StoreError> {
        let token = self
            .config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(StoreError::MissingToken)?;

        let url = format!(
            "{}?returnIds=true&returnDocuments=true",
            self.config.mutate_url()
        );
        let body = json!({ "mutations": [{ "create": document }] });
        let request = OutboundRequest::post_json(url, &body)?.bearer_auth(Some(token));

        let response = self.transport.send(request).await?;
        decode_mutation_response(response)
    }
}

fn decode_query_response(response: OutboundResponse) -> Result<Value, StoreError> {
    if response.status == 400 {
        let body: Value = serde_json::from_slice(&response.body).unwrap_or(Value::Null);
        if let Some(description) = body
            .pointer("/error/description")
            .and_then(Value::as_str)
        {
            return Err(StoreError::Query(description.to_string()));
        }
    }
    if !response.is_success() {
        return Err(StoreError::http(response.status, &response.body));
    }

    let mut body: Value = serde_json::from_slice(&response.body)?;
    match body.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(StoreError::Decode("response has no `result` field".to_string())),
    }
}

fn decode_mutation_response(response: OutboundResponse) -> Result<Value, StoreError> {
    if !response.is_success() {
        return Err(StoreError::http(response.status, &response.body));
    }

    let body: Value = serde_json::from_slice(&response.body)?;
    let first = body
        .pointer("/results/0")
        .ok_or_else(|| StoreError::Decode("mutation response has no results".to_string()))?;

    match first.get("document") {
        Some(document) if !document.is_null() => Ok(document.clone()),
        _ => Ok(json!({ "_id": first.get("id").cloned().unwrap_or(Value::Null) })),
    }
}
