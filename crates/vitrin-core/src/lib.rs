//! Core abstractions shared by every Vitrin crate.
//!
//! This crate provides the fundamental types:
//! - `RequestContext` - Typed view over an incoming HTTP request
//! - `RequestId` - Correlation identifier for logs and responses
//! - `TimingContext` - Per-request timing marks
//! - `AppConfig` / `StoreConfig` - Deployment configuration

mod config;
mod context;
mod lifecycle;

pub use config::*;
pub use context::*;
pub use lifecycle::*;
