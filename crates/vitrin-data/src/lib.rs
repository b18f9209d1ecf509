//! Content store access for Vitrin.
//!
//! This crate provides:
//! - `ContentStore` - async trait over a document store, plus typed helpers
//! - `HttpContentStore` - GROQ over HTTP with timeouts and read retries
//! - `MemoryContentStore` - in-process store with the same query semantics
//! - `Transport` - reqwest on native targets, Spin outbound HTTP on wasm32
//! - `ImageUrlBuilder` - asset reference to CDN URL resolution

mod error;
mod image;
mod memory;
mod remote;
mod retry;
mod store;
mod timeout;
mod transport;

pub use error::*;
pub use image::*;
pub use memory::*;
pub use remote::*;
pub use retry::*;
pub use store::*;
pub use timeout::*;
pub use transport::*;
