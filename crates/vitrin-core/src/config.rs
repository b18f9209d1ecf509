//! Storefront configuration.
//!
//! Configuration is read from a TOML (or JSON) file and then overridden by
//! `VITRIN_*` environment variables, so that secrets such as the API token
//! never need to live in the file.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration errors detected by [`AppConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("store.project_id must not be empty")]
    MissingProjectId,

    #[error("store.dataset must not be empty")]
    MissingDataset,

    #[error("store.timeout_ms must be between 1000 and 60000, got {0}")]
    TimeoutOutOfRange(u64),

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
}

/// Top-level storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Content store connection.
    #[serde(default)]
    pub store: StoreConfig,

    /// Search behavior.
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            Self::from_toml_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Parse config from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from an optional file, apply process environment overrides and
    /// validate.
    pub fn resolve(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `VITRIN_*` overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("VITRIN_PROJECT_ID") {
            self.store.project_id = v;
        }
        if let Some(v) = lookup("VITRIN_DATASET") {
            self.store.dataset = v;
        }
        if let Some(v) = lookup("VITRIN_API_VERSION") {
            self.store.api_version = v;
        }
        if let Some(v) = lookup("VITRIN_API_TOKEN") {
            self.store.token = if v.is_empty() { None } else { Some(v) };
        }
        if let Some(v) = lookup("VITRIN_TIMEOUT_MS") {
            self.store.timeout_ms = v.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "VITRIN_TIMEOUT_MS".to_string(),
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("VITRIN_LOG_FORMAT") {
            self.logging.format = v;
        }
        Ok(())
    }

    /// Check invariants the rest of the system relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.project_id.trim().is_empty() {
            return Err(ConfigError::MissingProjectId);
        }
        if self.store.dataset.trim().is_empty() {
            return Err(ConfigError::MissingDataset);
        }
        if !(1_000..=60_000).contains(&self.store.timeout_ms) {
            return Err(ConfigError::TimeoutOutOfRange(self.store.timeout_ms));
        }
        Ok(())
    }
}

/// Content store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project identifier on the content platform.
    #[serde(default)]
    pub project_id: String,

    /// Dataset name (e.g. "production").
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Dated API version, e.g. "2025-06-30".
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Serve reads from the edge CDN.
    #[serde(default = "default_true")]
    pub use_cdn: bool,

    /// Bearer token. Required for writes.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Deadline for a single outbound request.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries for idempotent reads.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Host serving image assets.
    #[serde(default = "default_image_host")]
    pub image_host: String,
}

fn default_dataset() -> String {
    "production".to_string()
}

fn default_api_version() -> String {
    "2025-06-30".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    8_000
}

fn default_max_retries() -> u32 {
    1
}

fn default_image_host() -> String {
    "cdn.sanity.io".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: default_dataset(),
            api_version: default_api_version(),
            use_cdn: true,
            token: None,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            image_host: default_image_host(),
        }
    }
}

impl StoreConfig {
    /// Request deadline as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base URL for GROQ queries. `fresh` bypasses the CDN.
    pub fn query_url(&self, fresh: bool) -> String {
        let host = if self.use_cdn && !fresh { "apicdn" } else { "api" };
        format!(
            "https://{}.{}.sanity.io/v{}/data/query/{}",
            self.project_id, host, self.api_version, self.dataset
        )
    }

    /// URL for document mutations. Never served by the CDN.
    pub fn mutate_url(&self) -> String {
        format!(
            "https://{}.api.sanity.io/v{}/data/mutate/{}",
            self.project_id, self.api_version, self.dataset
        )
    }
}

/// Search tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Input quiescence before a client request fires.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Thumbnail width used by result cards.
    #[serde(default = "default_thumb_width")]
    pub thumbnail_width: u32,

    /// Thumbnail height used by result cards.
    #[serde(default = "default_thumb_height")]
    pub thumbnail_height: u32,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_thumb_width() -> u32 {
    400
}

fn default_thumb_height() -> u32 {
    300
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            thumbnail_width: default_thumb_width(),
            thumbnail_height: default_thumb_height(),
        }
    }
}

impl SearchConfig {
    /// Debounce interval as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// "json" or "human".
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            level: default_log_level(),
        }
    }
}
