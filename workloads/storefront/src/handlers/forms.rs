//! `POST /subscribe` and `POST /contact`.

use chrono::Utc;
use http::StatusCode;
use serde_json::{json, Value};
use vitrin_commerce::forms::{ContactRequest, SubscribeRequest};
use vitrin_data::exists;
use vitrin_observability::StructuredLogger;

use super::{json_body, HandlerResult};
use crate::{json_response, ApiError, AppState, Operation};

pub const SUBSCRIBED_MESSAGE: &str = "E-bülten aboneliğiniz başarıyla alındı!";
pub const CONTACT_SENT_MESSAGE: &str = "Mesajınız başarıyla gönderildi, teşekkür ederiz!";

/// Create a `newsletter` document unless the address is already subscribed.
///
/// The duplicate check and the create are two calls; a concurrent request
/// for the same address can slip between them.
pub async fn subscribe(state: &AppState, body: &[u8], logger: &StructuredLogger) -> HandlerResult {
    let request: SubscribeRequest = json_body(body)?;
    let subscription = request.validate(Utc::now())?;
    let store = state.store.as_ref();

    let already = exists(store, &subscription.existing())
        .await
        .map_err(|e| ApiError::backend(Operation::Subscribe, e))?;
    if already {
        logger.info("subscription rejected: address already subscribed");
        return Err(ApiError::Conflict);
    }

    let created = store
        .create(subscription.to_document())
        .await
        .map_err(|e| ApiError::backend(Operation::Subscribe, e))?;
    let id = document_id(&created);

    logger
        .info_builder("newsletter subscription created")
        .field("document_id", id.as_str().unwrap_or_default())
        .emit();

    Ok(json_response(
        StatusCode::OK,
        &json!({ "message": SUBSCRIBED_MESSAGE, "id": id }),
    ))
}

/// Store a `contactForm` document.
pub async fn contact(state: &AppState, body: &[u8], logger: &StructuredLogger) -> HandlerResult {
    let request: ContactRequest = json_body(body)?;
    let message = request.validate(Utc::now())?;

    let created = state
        .store
        .create(message.to_document())
        .await
        .map_err(|e| ApiError::backend(Operation::Contact, e))?;

    logger
        .info_builder("contact message stored")
        .field("document_id", document_id(&created).as_str().unwrap_or_default())
        .field_i64("message_chars", message.message.chars().count() as i64)
        .emit();

    Ok(json_response(
        StatusCode::OK,
        &json!({ "message": CONTACT_SENT_MESSAGE }),
    ))
}

fn document_id(document: &Value) -> Value {
    document.get("_id").cloned().unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use vitrin_core::{AppConfig, RequestId};
    use vitrin_data::MemoryContentStore;

    fn setup() -> (Arc<MemoryContentStore>, AppState, StructuredLogger) {
        let store = Arc::new(MemoryContentStore::new());
        let state = AppState::new(AppConfig::default(), store.clone());
        let logger = StructuredLogger::new(RequestId::generate());
        (store, state, logger)
    }

    #[tokio::test]
    async fn test_subscribe_stores_lowercased_address() {
        let (store, state, logger) = setup();

        let response = subscribe(&state, br#"{"email":" Ayse@Example.COM "}"#, &logger)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let docs = store.documents_of_type("newsletter");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["email"], "ayse@example.com");
        assert!(docs[0]["subscribedAt"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_subscribe_twice_conflicts() {
        let (store, state, logger) = setup();
        let body = br#"{"email":"ayse@example.com"}"#;

        subscribe(&state, body, &logger).await.unwrap();
        let err = subscribe(&state, br#"{"email":"AYSE@example.com"}"#, &logger)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Conflict));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_store() {
        let (store, state, logger) = setup();
        for body in [
            &br#"{"email":"not-an-email"}"#[..],
            br#"{}"#,
            br#"{"email":"a@b"}"#,
        ] {
            let err = subscribe(&state, body, &logger).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(store.read_count() + store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_contact_requires_all_fields() {
        let (store, state, logger) = setup();

        let err = contact(&state, r#"{"name":"Ayşe","email":"a@b.co","message":"  "}"#.as_bytes(), &logger)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.write_count(), 0);

        contact(
            &state,
            r#"{"name":"Ayşe","email":"a@b.co","message":"Merhaba"}"#.as_bytes(),
            &logger,
        )
        .await
        .unwrap();

        let docs = store.documents_of_type("contactForm");
        assert_eq!(docs[0]["fullName"], "Ayşe");
        assert_eq!(docs[0]["subject"], "Website İletişim Formu");
    }

    #[tokio::test]
    async fn test_contact_backend_failure() {
        let (store, state, logger) = setup();
        store.set_failing(true);

        let err = contact(
            &state,
            r#"{"name":"Ayşe","email":"a@b.co","message":"Merhaba"}"#.as_bytes(),
            &logger,
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.public_message().contains("Mesaj"));
    }
}
