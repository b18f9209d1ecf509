//! Catalog module.
//!
//! Contains the read-only product and category documents owned by the
//! content store, plus the queries that fetch them.

mod category;
mod image;
mod product;
pub mod queries;
mod slug;

pub use category::Category;
pub use image::{AssetRef, ImageRef};
pub use product::{Product, StockLevel};
pub use slug::Slug;
