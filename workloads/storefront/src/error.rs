//! HTTP error mapping.
//!
//! Every failure leaves the handler as an [`ApiError`], which maps to one
//! status code and a `{"error": code, "message": text}` body. Store errors
//! are logged in full and never echoed to the client.

use http::{header, StatusCode};
use serde::Serialize;
use vitrin_commerce::CommerceError;
use vitrin_data::StoreError;

use crate::Body;

/// The operation a backend call belonged to; picks the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    Subscribe,
    Contact,
    Catalog,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::Subscribe => "subscribe",
            Operation::Contact => "contact",
            Operation::Catalog => "catalog",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing query parameter `q`")]
    MissingQuery,

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("validation failed: {0}")]
    Validation(#[from] CommerceError),

    #[error("email already subscribed")]
    Conflict,

    #[error("not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed { allow: &'static str },

    #[error("{} backend failure: {source}", .op.name())]
    Backend { op: Operation, source: StoreError },
}

impl ApiError {
    pub fn backend(op: Operation, source: StoreError) -> Self {
        ApiError::Backend { op, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingQuery | ApiError::MalformedBody(_) | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Backend { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingQuery => "missing_query",
            ApiError::MalformedBody(_) | ApiError::Validation(_) => "validation_failed",
            ApiError::Conflict => "already_subscribed",
            ApiError::NotFound => "not_found",
            ApiError::MethodNotAllowed { .. } => "method_not_allowed",
            ApiError::Backend {
                op: Operation::Search,
                ..
            } => "search_backend_failure",
            ApiError::Backend { .. } => "backend_failure",
        }
    }

    /// Message safe to show a visitor. Never includes store details.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::MissingQuery => "Arama terimi (q) gereklidir.".to_string(),
            ApiError::MalformedBody(_) => "İstek gövdesi geçerli bir JSON nesnesi olmalıdır.".to_string(),
            ApiError::Validation(err) => validation_message(err),
            ApiError::Conflict => "Bu e-posta adresi zaten abone.".to_string(),
            ApiError::NotFound => "Aradığınız sayfa bulunamadı.".to_string(),
            ApiError::MethodNotAllowed { .. } => "Bu yöntem desteklenmiyor.".to_string(),
            ApiError::Backend { op, .. } => match op {
                Operation::Search => "Arama sırasında bir hata oluştu.",
                Operation::Subscribe => "Abonelik işlemi sırasında bir hata oluştu.",
                Operation::Contact => "Mesaj gönderilirken sunucu tarafında bir hata oluştu.",
                Operation::Catalog => "İçerik yüklenirken bir hata oluştu.",
            }
            .to_string(),
        }
    }

    /// Render as a JSON error response.
    pub fn into_response(self) -> http::Response<Body> {
        let mut response = json_error(self.status(), self.code(), self.public_message());
        if let ApiError::MethodNotAllowed { allow } = self {
            response
                .headers_mut()
                .insert(header::ALLOW, header::HeaderValue::from_static(allow));
        }
        response
    }
}

fn validation_message(err: &CommerceError) -> String {
    match err {
        CommerceError::InvalidEmail(_) => "Geçerli bir e-posta adresi giriniz.".to_string(),
        CommerceError::MissingField(field) => {
            format!("Lütfen tüm gerekli alanları doldurun ({}).", field)
        }
        CommerceError::FieldTooLong { field, max } => {
            format!("{} alanı en fazla {} karakter olabilir.", field, max)
        }
        _ => "Gönderilen veriler geçersiz.".to_string(),
    }
}

/// `{"error": code, "message": message}` with the given status.
pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> http::Response<Body> {
    json_response(
        status,
        &serde_json::json!({
            "error": code,
            "message": message.into(),
        }),
    )
}

/// Serialize `value` as the JSON body of a response.
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> http::Response<Body> {
    match serde_json::to_vec(value) {
        Ok(body) => with_body(status, "application/json; charset=utf-8", body),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response");
            with_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "application/json; charset=utf-8",
                r#"{"error":"internal","message":"Beklenmeyen bir hata oluştu."}"#.as_bytes().to_vec(),
            )
        }
    }
}

/// An HTML response.
pub fn html_response(status: StatusCode, html: String) -> http::Response<Body> {
    with_body(status, "text/html; charset=utf-8", html.into_bytes())
}

fn with_body(status: StatusCode, content_type: &'static str, body: Body) -> http::Response<Body> {
    let mut response = http::Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, header::HeaderValue::from_static(content_type));
    response
}
