//! Product categories.

use serde::{Deserialize, Serialize};

use super::Slug;
use crate::ids::CategoryId;

/// A product category.
///
/// Products hold a weak reference to at most one category; the content
/// store dereferences it in query projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub title: String,
    pub slug: Slug,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    /// Storefront path for this category's listing page.
    pub fn path(&self) -> String {
        format!("/kategoriler/{}", self.slug)
    }
}
