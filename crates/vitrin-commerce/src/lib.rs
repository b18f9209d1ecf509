//! Storefront domain types and logic for Vitrin.
//!
//! This crate provides the read-side model of a content-store backed shop:
//!
//! - **Catalog**: Products, categories, image references
//! - **Content**: Blog posts, authors, hero slides
//! - **Search**: Term normalization, structured filters, document queries
//! - **Forms**: Newsletter subscriptions and contact messages
//!
//! Queries are built as structured [`DocumentQuery`] values. They render to
//! parameterized GROQ for the remote store and can be evaluated directly
//! against JSON documents by in-memory stores.
//!
//! # Example
//!
//! ```rust
//! use vitrin_commerce::search::{product_search, SearchTerm};
//!
//! let term = SearchTerm::parse("  Bez ÇANTA!! ").unwrap();
//! assert_eq!(term.normalized(), "bez çanta");
//! assert_eq!(term.folded(), "bez canta");
//!
//! let groq = product_search(&term).to_groq();
//! assert!(groq.query.contains("match $term"));
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod content;
pub mod forms;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;
pub use search::{DocumentQuery, GroqQuery};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{AssetRef, Category, ImageRef, Product, Slug, StockLevel};

    // Content
    pub use crate::content::{Author, Post, SliderItem};

    // Forms
    pub use crate::forms::{ContactMessage, ContactRequest, EmailAddress, SubscribeRequest, Subscription};

    // Search
    pub use crate::search::{DocumentQuery, Field, Filter, GroqQuery, SearchResult, SearchTerm};
}
