//! Where the search view gets its results from.

use vitrin_commerce::search::SearchResult;

use super::ViewError;

/// Something that answers a search term with results.
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, term: &str) -> Result<Vec<SearchResult>, ViewError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use http_backend::HttpSearchBackend;

#[cfg(not(target_arch = "wasm32"))]
mod http_backend {
    use std::time::Duration;

    use vitrin_commerce::search::SearchResult;

    use super::{SearchBackend, ViewError};

    /// Calls `GET {endpoint}?q=` on the storefront.
    #[derive(Debug, Clone)]
    pub struct HttpSearchBackend {
        client: reqwest::Client,
        endpoint: String,
        timeout: Duration,
    }

    impl HttpSearchBackend {
        pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ViewError> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| ViewError::Network(e.to_string()))?;
            Ok(Self {
                client,
                endpoint: endpoint.into(),
                timeout,
            })
        }

        /// The GET request for `term`, query string encoded by reqwest.
        pub fn request_for(&self, term: &str) -> Result<reqwest::Request, ViewError> {
            self.client
                .get(&self.endpoint)
                .query(&[("q", term)])
                .header(reqwest::header::ACCEPT, "application/json")
                .build()
                .map_err(|e| ViewError::Network(e.to_string()))
        }

        async fn request(&self, term: &str) -> Result<Vec<SearchResult>, ViewError> {
            let request = self.request_for(term)?;
            let response = self
                .client
                .execute(request)
                .await
                .map_err(|e| self.classify(e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ViewError::Status(status.as_u16()));
            }

            let body = response.bytes().await.map_err(|e| self.classify(e))?;
            serde_json::from_slice(&body).map_err(|e| ViewError::Decode(e.to_string()))
        }

        fn classify(&self, err: reqwest::Error) -> ViewError {
            if err.is_timeout() {
                ViewError::Timeout(self.timeout)
            } else {
                ViewError::Network(err.to_string())
            }
        }
    }

    #[async_trait::async_trait]
    impl SearchBackend for HttpSearchBackend {
        async fn search(&self, term: &str) -> Result<Vec<SearchResult>, ViewError> {
            tokio::time::timeout(self.timeout, self.request(term))
                .await
                .map_err(|_| ViewError::Timeout(self.timeout))?
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_url_encodes_term() {
            let backend =
                HttpSearchBackend::new("http://localhost:3000/api/search", Duration::from_secs(8))
                    .unwrap();
            let request = backend.request_for("bez çanta & co").unwrap();
            assert_eq!(
                request.url().as_str(),
                "http://localhost:3000/api/search?q=bez+%C3%A7anta+%26+co"
            );
            assert_eq!(request.method(), reqwest::Method::GET);
        }
    }
}
