//! Blog and hero slider endpoints.

use http::StatusCode;
use serde_json::{json, Value};
use vitrin_commerce::content::{self, Post, SliderItem};
use vitrin_data::{fetch_many, fetch_one, StoreError};

use super::{path_slug, HandlerResult};
use crate::{json_response, ApiError, AppState, Operation};

/// Characters of body text shown in a post excerpt.
pub const EXCERPT_CHARS: usize = 160;

fn backend(e: StoreError) -> ApiError {
    ApiError::backend(Operation::Catalog, e)
}

/// `GET /blog`: newest first.
pub async fn posts(state: &AppState) -> HandlerResult {
    let posts: Vec<Post> = fetch_many(state.store.as_ref(), &content::all_posts())
        .await
        .map_err(backend)?;
    let summaries: Vec<Value> = posts.iter().map(post_summary).collect();
    Ok(json_response(StatusCode::OK, &summaries))
}

/// `GET /blog/{slug}`
pub async fn post(state: &AppState, slug: &str) -> HandlerResult {
    let slug = path_slug(slug)?;
    let post: Post = fetch_one(state.store.as_ref(), &content::post_by_slug(&slug))
        .await
        .map_err(backend)?
        .ok_or(ApiError::NotFound)?;

    let mut body = serde_json::to_value(&post)
        .map_err(|e| backend(StoreError::Decode(e.to_string())))?;
    if let Value::Object(fields) = &mut body {
        fields.insert("excerpt".into(), json!(post.excerpt(EXCERPT_CHARS)));
        fields.insert("publishedLabel".into(), json!(post.published_label()));
        fields.insert("path".into(), json!(post.path()));
    }
    Ok(json_response(StatusCode::OK, &body))
}

/// `GET /slides`: ordered by position.
pub async fn slides(state: &AppState) -> HandlerResult {
    let slides: Vec<SliderItem> = fetch_many(state.store.as_ref(), &content::slider_items())
        .await
        .map_err(backend)?;
    Ok(json_response(StatusCode::OK, &slides))
}

fn post_summary(post: &Post) -> Value {
    json!({
        "_id": post.id,
        "title": post.title,
        "slug": post.slug,
        "mainImage": post.main_image,
        "publishedAt": post.published_at,
        "publishedLabel": post.published_label(),
        "author": post.author.as_ref().map(|a| a.name.as_str()),
        "excerpt": post.excerpt(EXCERPT_CHARS),
        "path": post.path(),
    })
}
