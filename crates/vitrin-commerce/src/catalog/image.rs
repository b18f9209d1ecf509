//! Image references.

use serde::{Deserialize, Serialize};

/// Reference to a binary asset held by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// Opaque asset reference, e.g. `image-<id>-800x600-jpg`.
    #[serde(rename = "_ref")]
    pub reference: String,
}

/// An image field: an asset reference plus optional alt text.
///
/// The asset may be missing on half-edited documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl ImageRef {
    /// Create an image reference for an asset.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            asset: Some(AssetRef {
                reference: reference.into(),
            }),
            alt: None,
        }
    }

    /// Set alt text.
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// The asset reference, if any.
    pub fn reference(&self) -> Option<&str> {
        self.asset.as_ref().map(|a| a.reference.as_str())
    }
}
