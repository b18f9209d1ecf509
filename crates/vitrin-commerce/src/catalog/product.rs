//! Product documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Category, ImageRef, Slug};
use crate::ids::ProductId;
use crate::money::{self, Money};

/// Stock above this count is shown simply as "in stock".
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// A catalog product as returned by the content store.
///
/// Owned and mutated exclusively by the content store. Fields missing from
/// a query projection deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Document ID.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unique URL slug.
    pub slug: Slug,
    /// Non-negative price.
    #[serde(with = "money::decimal")]
    pub price: Money,
    /// Ordered gallery; the first image is the thumbnail.
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ImageRef>,
    /// Dereferenced category, if the product has one.
    #[serde(default)]
    pub category: Option<Category>,
    /// Units on hand.
    #[serde(default, deserialize_with = "lenient_count")]
    pub stock: u32,
    /// Shown on the home page.
    #[serde(default, rename = "isFeatured")]
    pub featured: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-text material/size details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Care instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub care: Option<String>,
}

/// Coarse stock state for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    InStock,
    Low(u32),
    OutOfStock,
}

impl StockLevel {
    /// Classify a stock count.
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => StockLevel::OutOfStock,
            n if n <= LOW_STOCK_THRESHOLD => StockLevel::Low(n),
            _ => StockLevel::InStock,
        }
    }

    /// CSS modifier class.
    pub fn css_class(&self) -> &'static str {
        match self {
            StockLevel::InStock => "in-stock",
            StockLevel::Low(_) => "low-stock",
            StockLevel::OutOfStock => "out-of-stock",
        }
    }

    /// Turkish label.
    pub fn label(&self) -> String {
        match self {
            StockLevel::InStock => "Stokta".to_string(),
            StockLevel::Low(n) => format!("Son {} ürün", n),
            StockLevel::OutOfStock => "Tükendi".to_string(),
        }
    }
}

impl Product {
    /// First image that actually points at an asset.
    pub fn first_image(&self) -> Option<&ImageRef> {
        self.images.iter().find(|img| img.asset.is_some())
    }

    /// Title of the dereferenced category.
    pub fn category_title(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.title.as_str())
    }

    /// Stock display state.
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::from_count(self.stock)
    }

    /// Whether the product is published at `now`. Products without a
    /// publish date are treated as published.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.published_at.map_or(true, |at| at <= now)
    }

    /// Storefront path for the detail page.
    pub fn path(&self) -> String {
        format!("/urunler/{}", self.slug)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Stock counts sometimes arrive as floats or null from hand-edited
/// documents.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(match value {
        Some(n) if n.is_finite() && n > 0.0 => n.min(u32::MAX as f64) as u32,
        _ => 0,
    })
}
