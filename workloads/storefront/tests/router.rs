//! End-to-end router tests against the in-memory content store.
//!
//! Each test builds an `AppState` around a seeded `MemoryContentStore` and
//! drives `storefront::handle` with plain `http::Request`s.
use std::sync::Arc;

use http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use storefront::{handle, AppState, Body};
use vitrin_core::{AppConfig, StoreConfig};
use vitrin_data::MemoryContentStore;

fn seeded_store() -> Arc<MemoryContentStore> {
    Arc::new(MemoryContentStore::with_documents(vec![
        json!({ "_id": "c1", "_type": "category", "title": "Çantalar", "slug": { "current": "cantalar" } }),
        json!({
            "_id": "p1", "_type": "product", "name": "Bez Çanta Modeli",
            "slug": { "current": "bez-canta-modeli" }, "price": 249.9,
            "images": [{ "_type": "image", "asset": { "_ref": "image-a1b2-800x600-jpg" } }],
            "category": { "_type": "reference", "_ref": "c1" }
        }),
        json!({
            "_id": "p2", "_type": "product", "name": "Deri Cüzdan",
            "slug": { "current": "deri-cuzdan" }, "price": 399
        }),
    ]))
}

fn app(store: Arc<MemoryContentStore>) -> AppState {
    let config = AppConfig {
        store: StoreConfig {
            project_id: "abc123".into(),
            ..StoreConfig::default()
        },
        ..AppConfig::default()
    };
    AppState::new(config, store)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Vec::new())
        .unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(serde_json::to_vec(&body).unwrap())
        .unwrap()
}

fn json_body(response: &http::Response<Body>) -> Value {
    serde_json::from_slice(response.body()).unwrap()
}

#[tokio::test]
async fn test_search_without_q_is_bad_request() {
    let store = seeded_store();
    let state = app(store.clone());

    for uri in ["/search", "/search?q=", "/api/search?page=2"] {
        let response = handle(&state, get(uri)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(json_body(&response)["error"], "missing_query");
    }
    assert_eq!(store.read_count(), 0);
}

#[tokio::test]
async fn test_blank_search_returns_empty_without_store_call() {
    let store = seeded_store();
    let state = app(store.clone());

    let response = handle(&state, get("/search?q=%20%20%20")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(&response), json!([]));
    assert_eq!(store.read_count(), 0);
}

#[tokio::test]
async fn test_search_matches_turkish_term() {
    let state = app(seeded_store());

    let response = handle(&state, get("/api/search?q=%C3%A7anta")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let results = json_body(&response);
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Bez Çanta Modeli");
    assert_eq!(results[0]["categoryName"], "Çantalar");
    assert_eq!(results[0]["price"], 249.9);
}

#[tokio::test]
async fn test_search_backend_failure_is_redacted() {
    let store = seeded_store();
    store.set_failing(true);
    let state = app(store);

    let response = handle(&state, get("/search?q=canta")).await;
    let raw = String::from_utf8(response.body().clone()).unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!raw.contains("offline"));
    assert_eq!(json_body(&response)["message"], "Arama sırasında bir hata oluştu.");
}

#[tokio::test]
async fn test_subscribe_then_duplicate_conflicts() {
    let store = seeded_store();
    let state = app(store.clone());

    let first = handle(&state, post("/subscribe", json!({ "email": "ayse@example.com" }))).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert!(json_body(&first)["id"].is_string());

    let second = handle(&state, post("/api/subscribe", json!({ "email": "ayse@example.com" }))).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(&second)["error"], "already_subscribed");

    assert_eq!(store.documents_of_type("newsletter").len(), 1);
}

#[tokio::test]
async fn test_subscribe_rejects_bad_input() {
    let state = app(seeded_store());

    let invalid = handle(&state, post("/subscribe", json!({ "email": "ayse" }))).await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&invalid)["message"], "Geçerli bir e-posta adresi giriniz.");

    let malformed = Request::builder()
        .method(Method::POST)
        .uri("/subscribe")
        .body(b"not json".to_vec())
        .unwrap();
    assert_eq!(handle(&state, malformed).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_subscribe_backend_failure() {
    let store = seeded_store();
    store.set_failing(true);
    let state = app(store);

    let response = handle(&state, post("/subscribe", json!({ "email": "ayse@example.com" }))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(&response)["error"], "backend_failure");
}

#[tokio::test]
async fn test_contact_round_trip() {
    let store = seeded_store();
    let state = app(store.clone());

    let missing = handle(&state, post("/contact", json!({ "name": "Ayşe", "email": "a@b.co" }))).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let ok = handle(
        &state,
        post(
            "/contact",
            json!({ "name": "Ayşe", "email": "a@b.co", "message": "Kargo ne zaman gelir?" }),
        ),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(store.documents_of_type("contactForm").len(), 1);
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let state = app(seeded_store());

    let missing = handle(&state, get("/nowhere")).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let wrong = handle(&state, get("/subscribe")).await;
    assert_eq!(wrong.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(wrong.headers()["allow"], "POST");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let state = app(seeded_store());
    let request = Request::builder()
        .uri("/products")
        .header("x-request-id", "req-123")
        .body(Vec::new())
        .unwrap();

    let response = handle(&state, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn test_search_page_renders_cards() {
    let state = app(seeded_store());

    let response = handle(&state, get("/arama-sonuclari?q=%C3%A7anta")).await;
    let html = String::from_utf8(response.body().clone()).unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(html.contains("Bez Çanta Modeli"));
    assert!(html.contains("249.90 TL"));
    assert!(html.contains("https://cdn.sanity.io/images/abc123/production/a1b2-800x600.jpg?w=400"));
    assert!(!html.contains("Deri Cüzdan"));
}

#[tokio::test]
async fn test_product_detail_and_not_found() {
    let state = app(seeded_store());

    let found = handle(&state, get("/products/bez-canta-modeli")).await;
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(json_body(&found)["category"]["title"], "Çantalar");

    let missing = handle(&state, get("/products/yok")).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_scheduled_product_hidden_from_search_and_listing() {
    let store = seeded_store();
    store.insert(json!({
        "_id": "p9", "_type": "product", "name": "Gizli Çanta",
        "slug": { "current": "gizli-canta" }, "price": 99,
        "publishedAt": "2999-01-01T00:00:00Z", "secretField": "x"
    }));
    let state = app(store);

    let listing = json_body(&handle(&state, get("/products")).await);
    let ids: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["_id"].as_str())
        .collect();
    assert_eq!(ids, vec!["p1", "p2"]);
    assert!(listing[0].get("_type").is_none());

    let hits = json_body(&handle(&state, get("/search?q=%C3%A7anta")).await);
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["_id"], "p1");

    let detail = handle(&state, get("/products/gizli-canta")).await;
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unaccented_search_does_not_fold_store_text() {
    let state = app(seeded_store());

    let response = handle(&state, get("/search?q=canta")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(&response), json!([]));
}
