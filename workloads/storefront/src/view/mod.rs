//! Search results view.
//!
//! [`SearchState`] models the debounced search box. On native targets
//! [`SearchView`] drives it: input is debounced, one request is issued per
//! settled term, and responses for superseded terms are dropped. The
//! [`render`] module turns any state into HTML.

mod backend;
pub mod render;
mod state;

#[cfg(not(target_arch = "wasm32"))]
mod controller;

use std::time::Duration;

pub use backend::*;
pub use state::SearchState;

#[cfg(not(target_arch = "wasm32"))]
pub use controller::SearchView;

/// Client-side failures of a search request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("search endpoint returned status {0}")]
    Status(u16),

    #[error("malformed search response: {0}")]
    Decode(String),
}

impl ViewError {
    /// Message shown in the results area.
    pub fn user_message(&self) -> &'static str {
        match self {
            ViewError::Network(_) => {
                "Bağlantı hatası. Lütfen internet bağlantınızı kontrol edip tekrar deneyin."
            }
            ViewError::Timeout(_) => "Arama çok uzun sürdü. Lütfen tekrar deneyin.",
            ViewError::Status(_) | ViewError::Decode(_) => {
                "Arama sırasında bir hata oluştu. Lütfen daha sonra tekrar deneyin."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_hide_details() {
        let err = ViewError::Status(502);
        assert!(!err.user_message().contains("502"));
        assert!(ViewError::Network("dns".into()).user_message().contains("Bağlantı"));
        assert_ne!(
            ViewError::Timeout(Duration::from_secs(8)).user_message(),
            ViewError::Decode("x".into()).user_message()
        );
    }
}
