//! Vitrin storefront component.
//!
//! Serves the JSON API behind the shop (search, newsletter, contact,
//! catalog and blog reads) and the server-rendered search page. Every
//! route reads from an injected [`ContentStore`](vitrin_data::ContentStore),
//! so the same router runs as a Spin component against the hosted content
//! store and in tests against `MemoryContentStore`.
//!
//! | Route | Method |
//! |---|---|
//! | `/search?q=` | GET |
//! | `/arama-sonuclari?q=` | GET (HTML) |
//! | `/subscribe` | POST |
//! | `/contact` | POST |
//! | `/products`, `/products/featured`, `/products/{slug}` | GET |
//! | `/categories`, `/categories/{slug}` | GET |
//! | `/blog`, `/blog/{slug}` | GET |
//! | `/slides` | GET |
//!
//! Every route is also mounted under `/api`.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod view;

#[cfg(target_arch = "wasm32")]
mod component;

/// Request and response body type.
pub type Body = Vec<u8>;

/// Workload name attached to every log entry.
pub const WORKLOAD: &str = "storefront";

pub use error::{html_response, json_error, json_response, ApiError, Operation};
pub use router::{handle, Route};
pub use state::AppState;
