//! `GET /search` and the server-rendered search page.

use chrono::Utc;
use http::StatusCode;
use vitrin_commerce::catalog::Product;
use vitrin_commerce::search::{product_search, SearchResult, SearchTerm};
use vitrin_commerce::CommerceError;
use vitrin_core::RequestContext;
use vitrin_data::{fetch_many, ContentStore};
use vitrin_observability::StructuredLogger;

use super::HandlerResult;
use crate::view::render::render_page;
use crate::view::SearchState;
use crate::{html_response, json_response, ApiError, AppState, Operation};

/// Search products by name, description or category title.
///
/// A term that sanitizes to nothing returns no results without touching
/// the store. Products scheduled for later publication are left out, as
/// they are from catalog reads.
pub async fn run_search(
    store: &dyn ContentStore,
    raw: &str,
) -> Result<Vec<SearchResult>, ApiError> {
    let term = match SearchTerm::parse(raw) {
        Ok(term) => term,
        Err(CommerceError::EmptyQuery) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let products: Vec<Product> = fetch_many(store, &product_search(&term))
        .await
        .map_err(|e| ApiError::backend(Operation::Search, e))?;

    let now = Utc::now();
    Ok(products
        .iter()
        .filter(|p| p.is_published(now))
        .map(SearchResult::from)
        .collect())
}

/// `GET /search?q=`
pub async fn search(
    state: &AppState,
    ctx: &RequestContext,
    logger: &StructuredLogger,
) -> HandlerResult {
    let raw = match ctx.query_param("q") {
        Some(q) if !q.is_empty() => q,
        _ => return Err(ApiError::MissingQuery),
    };

    let results = run_search(state.store.as_ref(), raw).await?;

    logger
        .info_builder("search completed")
        .field("term", raw.trim())
        .field_i64("results", results.len() as i64)
        .emit();

    Ok(json_response(StatusCode::OK, &results))
}

/// `GET /arama-sonuclari?q=`: the search page as HTML.
///
/// Backend failures render the error state rather than an error status.
pub async fn search_page(
    state: &AppState,
    ctx: &RequestContext,
    logger: &StructuredLogger,
) -> HandlerResult {
    let term = ctx.query_param("q").unwrap_or_default().trim().to_string();

    let view = match run_search(state.store.as_ref(), &term).await {
        Ok(results) => SearchState::Success { term, results },
        Err(err @ ApiError::Backend { .. }) => {
            logger
                .error_builder("search page backend failure")
                .field("error", err.to_string())
                .emit();
            SearchState::Error {
                term,
                message: err.public_message(),
            }
        }
        Err(err) => return Err(err),
    };

    let html = render_page(&view, &state.images, state.thumbnail());
    Ok(html_response(StatusCode::OK, html))
}
