//! Spin HTTP component entry point.

use anyhow::Context;
use spin_sdk::http_component;
use vitrin_core::AppConfig;
use vitrin_observability::LogFormat;

use crate::{router, AppState, Body};

#[http_component]
async fn handle_storefront(req: http::Request<Body>) -> anyhow::Result<http::Response<Body>> {
    let config = AppConfig::resolve(None).context("Invalid storefront configuration")?;
    vitrin_observability::init(
        LogFormat::from_name(&config.logging.format),
        &config.logging.level,
    );

    let state = AppState::from_config(config)?;
    Ok(router::handle(&state, req).await)
}
