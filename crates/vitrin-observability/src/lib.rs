//! Observability for the Vitrin storefront.
//!
//! This crate provides:
//! - `init` - Process-wide `tracing` subscriber setup
//! - `StructuredLogger` - Request-scoped structured logging

mod logging;
mod subscriber;

pub use logging::*;
pub use subscriber::*;

// Re-export RequestId from vitrin-core for convenience
pub use vitrin_core::RequestId;
