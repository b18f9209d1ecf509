//! Per-component state handed to every handler.

use std::sync::Arc;

use anyhow::Context;
use vitrin_core::AppConfig;
use vitrin_data::{ContentStore, HttpContentStore, ImageUrlBuilder};

use crate::view::render::Thumbnail;

/// Explicitly constructed dependencies for the router.
///
/// The content store is injected, so tests and local development can swap
/// in a `MemoryContentStore`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub config: Arc<AppConfig>,
    pub images: ImageUrlBuilder,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ContentStore>) -> Self {
        let images = ImageUrlBuilder::new(&config.store);
        Self {
            store,
            config: Arc::new(config),
            images,
        }
    }

    /// Build state backed by the HTTP content store.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let store = HttpContentStore::new(config.store.clone())
            .context("Failed to create content store client")?;
        Ok(Self::new(config, Arc::new(store)))
    }

    /// Card thumbnail size.
    pub fn thumbnail(&self) -> Thumbnail {
        Thumbnail {
            width: self.config.search.thumbnail_width,
            height: self.config.search.thumbnail_height,
        }
    }
}
