//! Request routing.

use http::{header, HeaderValue, Method};
use vitrin_core::{RequestContext, REQUEST_ID_HEADER};
use vitrin_observability::StructuredLogger;

use crate::handlers::{self, HandlerResult};
use crate::{ApiError, AppState, Body, WORKLOAD};

/// A resolved storefront route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    Search,
    SearchPage,
    Subscribe,
    Contact,
    Products,
    FeaturedProducts,
    Product(&'a str),
    Categories,
    Category(&'a str),
    Posts,
    Post(&'a str),
    Slides,
}

impl<'a> Route<'a> {
    /// Match path segments. A leading `api` segment is ignored.
    pub fn resolve(segments: &[&'a str]) -> Option<Self> {
        let segments = match segments {
            ["api", rest @ ..] => rest,
            all => all,
        };

        let route = match segments {
            ["search"] => Route::Search,
            ["arama-sonuclari"] => Route::SearchPage,
            ["subscribe"] => Route::Subscribe,
            ["contact"] => Route::Contact,
            ["products"] => Route::Products,
            ["products", "featured"] => Route::FeaturedProducts,
            ["products", slug] => Route::Product(*slug),
            ["categories"] => Route::Categories,
            ["categories", slug] => Route::Category(*slug),
            ["blog"] => Route::Posts,
            ["blog", slug] => Route::Post(*slug),
            ["slides"] => Route::Slides,
            _ => return None,
        };
        Some(route)
    }

    pub fn method(&self) -> Method {
        match self {
            Route::Subscribe | Route::Contact => Method::POST,
            _ => Method::GET,
        }
    }
}

/// Handle one request end to end. Never fails: every error becomes a
/// JSON error response.
pub async fn handle(state: &AppState, req: http::Request<Body>) -> http::Response<Body> {
    let mut ctx = RequestContext::from_http(&req);
    let logger = StructuredLogger::for_request(&ctx, WORKLOAD);

    let outcome = dispatch(state, &ctx, req.body(), &logger).await;
    ctx.timing.mark("handled");

    let mut response = match outcome {
        Ok(response) => response,
        Err(err) => {
            log_failure(&logger, &err);
            err.into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(ctx.request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
        .headers_mut()
        .entry(header::CACHE_CONTROL)
        .or_insert(HeaderValue::from_static("no-store"));

    logger
        .info_builder("request completed")
        .field("method", ctx.method.as_str())
        .field_i64("status", i64::from(response.status().as_u16()))
        .duration_ms(
            "handler_ms",
            ctx.timing.since_start("handled").unwrap_or_default(),
        )
        .duration_ms("duration_ms", ctx.timing.elapsed())
        .emit();

    response
}

async fn dispatch(
    state: &AppState,
    ctx: &RequestContext,
    body: &[u8],
    logger: &StructuredLogger,
) -> HandlerResult {
    let segments = ctx.segments();
    let route = Route::resolve(&segments).ok_or(ApiError::NotFound)?;

    let allowed = route.method();
    if ctx.method != allowed && !(allowed == Method::GET && ctx.method == Method::HEAD) {
        return Err(ApiError::MethodNotAllowed {
            allow: if allowed == Method::POST { "POST" } else { "GET, HEAD" },
        });
    }

    match route {
        Route::Search => handlers::search::search(state, ctx, logger).await,
        Route::SearchPage => handlers::search::search_page(state, ctx, logger).await,
        Route::Subscribe => handlers::forms::subscribe(state, body, logger).await,
        Route::Contact => handlers::forms::contact(state, body, logger).await,
        Route::Products => handlers::catalog::products(state).await,
        Route::FeaturedProducts => handlers::catalog::featured(state).await,
        Route::Product(slug) => handlers::catalog::product(state, slug).await,
        Route::Categories => handlers::catalog::categories(state).await,
        Route::Category(slug) => handlers::catalog::category(state, slug).await,
        Route::Posts => handlers::content::posts(state).await,
        Route::Post(slug) => handlers::content::post(state, slug).await,
        Route::Slides => handlers::content::slides(state).await,
    }
}

fn log_failure(logger: &StructuredLogger, err: &ApiError) {
    match err {
        ApiError::Backend { op, source } => logger
            .error_builder("backend call failed")
            .field("operation", op.name())
            .field("error", source.to_string())
            .field_bool("timeout", source.is_timeout())
            .emit(),
        ApiError::NotFound => logger.debug("no such resource"),
        other => logger
            .warn_builder("request rejected")
            .field("code", other.code())
            .field("reason", other.to_string())
            .emit(),
    }
}
