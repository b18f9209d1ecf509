//! Product and category endpoints.

use chrono::Utc;
use http::StatusCode;
use serde_json::{json, Value};
use vitrin_commerce::catalog::{queries, Category, Product};
use vitrin_data::{fetch_many, fetch_one, StoreError};

use super::{path_slug, HandlerResult};
use crate::{json_response, ApiError, AppState, Operation};

fn backend(e: StoreError) -> ApiError {
    ApiError::backend(Operation::Catalog, e)
}

/// `GET /products`: published products as cards.
pub async fn products(state: &AppState) -> HandlerResult {
    let now = Utc::now();
    let products: Vec<Product> = fetch_many(state.store.as_ref(), &queries::all_products())
        .await
        .map_err(backend)?;
    let published: Vec<Product> = products.into_iter().filter(|p| p.is_published(now)).collect();
    Ok(json_response(StatusCode::OK, &published))
}

/// `GET /products/featured`
pub async fn featured(state: &AppState) -> HandlerResult {
    let now = Utc::now();
    let products: Vec<Product> = fetch_many(state.store.as_ref(), &queries::featured_products())
        .await
        .map_err(backend)?;
    let published: Vec<Product> = products.into_iter().filter(|p| p.is_published(now)).collect();
    Ok(json_response(StatusCode::OK, &published))
}

/// `GET /products/{slug}` with the stock label alongside the document.
pub async fn product(state: &AppState, slug: &str) -> HandlerResult {
    let slug = path_slug(slug)?;
    let product = fetch_one::<Product>(state.store.as_ref(), &queries::product_by_slug(&slug))
        .await
        .map_err(backend)?
        .filter(|p| p.is_published(Utc::now()))
        .ok_or(ApiError::NotFound)?;

    let stock = product.stock_level();
    let mut body = serde_json::to_value(&product)
        .map_err(|e| backend(StoreError::Decode(e.to_string())))?;
    if let Value::Object(fields) = &mut body {
        fields.insert("stockLabel".into(), json!(stock.label()));
        fields.insert("stockClass".into(), json!(stock.css_class()));
        fields.insert("path".into(), json!(product.path()));
    }
    Ok(json_response(StatusCode::OK, &body))
}

/// `GET /categories`
pub async fn categories(state: &AppState) -> HandlerResult {
    let categories: Vec<Category> = fetch_many(state.store.as_ref(), &queries::all_categories())
        .await
        .map_err(backend)?;
    Ok(json_response(StatusCode::OK, &categories))
}

/// `GET /categories/{slug}`: the category, its products and the full
/// category list for navigation, fetched concurrently.
pub async fn category(state: &AppState, slug: &str) -> HandlerResult {
    let slug = path_slug(slug)?;
    let store = state.store.as_ref();

    let category_query = queries::category_by_slug(&slug);
    let products_query = queries::products_in_category(&slug);
    let all_query = queries::all_categories();

    let (category, products, all) = futures::try_join!(
        fetch_one::<Category>(store, &category_query),
        fetch_many::<Product>(store, &products_query),
        fetch_many::<Category>(store, &all_query),
    )
    .map_err(backend)?;

    let category = category.ok_or(ApiError::NotFound)?;
    let now = Utc::now();
    let products: Vec<Product> = products.into_iter().filter(|p| p.is_published(now)).collect();

    Ok(json_response(
        StatusCode::OK,
        &json!({
            "category": category,
            "products": products,
            "allCategories": all,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use vitrin_core::AppConfig;
    use vitrin_data::MemoryContentStore;

    fn body(response: &http::Response<crate::Body>) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    fn state() -> (Arc<MemoryContentStore>, AppState) {
        let store = Arc::new(MemoryContentStore::with_documents(vec![
            json!({ "_id": "c1", "_type": "category", "title": "Çantalar", "slug": { "current": "cantalar" } }),
            json!({ "_id": "c2", "_type": "category", "title": "Aksesuar", "slug": { "current": "aksesuar" } }),
            json!({
                "_id": "p1", "_type": "product", "name": "Bez Çanta", "slug": { "current": "bez-canta" },
                "price": 249.9, "stock": 3, "isFeatured": true,
                "category": { "_type": "reference", "_ref": "c1" }
            }),
            json!({
                "_id": "p2", "_type": "product", "name": "Anahtarlık", "slug": { "current": "anahtarlik" },
                "price": 59, "stock": 40, "publishedAt": "2999-01-01T00:00:00Z",
                "category": { "_type": "reference", "_ref": "c2" }
            }),
        ]));
        let state = AppState::new(AppConfig::default(), store.clone());
        (store, state)
    }

    #[tokio::test]
    async fn test_listing_hides_unpublished() {
        let (_, state) = state();
        let response = products(&state).await.unwrap();
        let items = body(&response);
        assert_eq!(items.as_array().unwrap().len(), 1);
        assert_eq!(items[0]["name"], "Bez Çanta");
        assert_eq!(items[0]["category"]["title"], "Çantalar");
    }

    #[tokio::test]
    async fn test_featured() {
        let (_, state) = state();
        let items = body(&featured(&state).await.unwrap());
        assert_eq!(items.as_array().unwrap().len(), 1);
        assert_eq!(items[0]["_id"], "p1");
    }

    #[tokio::test]
    async fn test_product_detail_has_stock_label() {
        let (_, state) = state();
        let detail = body(&product(&state, "bez-canta").await.unwrap());
        assert_eq!(detail["stockLabel"], "Son 3 ürün");
        assert_eq!(detail["path"], "/urunler/bez-canta");
        assert_eq!(detail["price"], 249.9);
    }

    #[tokio::test]
    async fn test_missing_or_unsafe_slug_is_not_found() {
        let (store, state) = state();
        assert!(matches!(product(&state, "yok").await, Err(ApiError::NotFound)));
        assert!(matches!(product(&state, "anahtarlik").await, Err(ApiError::NotFound)));

        let reads = store.read_count();
        assert!(matches!(product(&state, "Bez Çanta").await, Err(ApiError::NotFound)));
        assert_eq!(store.read_count(), reads);
    }

    #[tokio::test]
    async fn test_category_page() {
        let (_, state) = state();
        let page = body(&category(&state, "cantalar").await.unwrap());
        assert_eq!(page["category"]["title"], "Çantalar");
        assert_eq!(page["products"].as_array().unwrap().len(), 1);
        assert_eq!(page["allCategories"][0]["title"], "Aksesuar");

        assert!(matches!(category(&state, "yok").await, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn test_categories_sorted_by_title() {
        let (_, state) = state();
        let items = body(&categories(&state).await.unwrap());
        assert_eq!(items[0]["title"], "Aksesuar");
        assert_eq!(items[1]["title"], "Çantalar");
    }
}
