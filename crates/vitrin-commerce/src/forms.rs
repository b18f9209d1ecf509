//! Newsletter and contact form submissions.
//!
//! Requests are deserialized leniently (every field optional) and then
//! validated into typed values; only validated values can be turned into
//! store documents.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::CommerceError;
use crate::search::{DocumentQuery, Field, Filter};

/// Longest accepted email address.
pub const MAX_EMAIL_CHARS: usize = 254;

/// Longest accepted contact message.
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// Longest accepted contact name.
pub const MAX_NAME_CHARS: usize = 200;

/// Subject stamped on every contact message.
pub const CONTACT_SUBJECT: &str = "Website İletişim Formu";

/// A validated, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate an email address.
    ///
    /// Requires exactly one `@`, a non-empty local part and a domain with
    /// a dot that neither starts nor ends the domain.
    pub fn parse(raw: &str) -> Result<Self, CommerceError> {
        let email = raw.trim();
        let invalid = || CommerceError::InvalidEmail(email.to_string());

        if email.is_empty() || email.chars().count() > MAX_EMAIL_CHARS {
            return Err(invalid());
        }
        if email.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let mut parts = email.split('@');
        let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) => (local, domain),
            _ => return Err(invalid()),
        };

        if local.is_empty()
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
            || domain.contains("..")
        {
            return Err(invalid());
        }

        Ok(Self(email.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of `POST /subscribe`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
}

impl SubscribeRequest {
    /// Validate into a subscription stamped with `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<Subscription, CommerceError> {
        let email = self
            .email
            .as_deref()
            .ok_or(CommerceError::MissingField("email"))?;
        Ok(Subscription::new(EmailAddress::parse(email)?, now))
    }
}

/// A newsletter subscription ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub email: EmailAddress,
    pub subscribed_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(email: EmailAddress, subscribed_at: DateTime<Utc>) -> Self {
        Self {
            email,
            subscribed_at,
        }
    }

    /// Query for an existing subscription with the same address.
    pub fn existing(&self) -> DocumentQuery {
        subscriber_lookup(&self.email)
    }

    /// The `newsletter` document to create.
    pub fn to_document(&self) -> Value {
        json!({
            "_type": "newsletter",
            "email": self.email.as_str(),
            "subscribedAt": timestamp(self.subscribed_at),
        })
    }
}

/// `*[_type == "newsletter" && email == $email][0]`
pub fn subscriber_lookup(email: &EmailAddress) -> DocumentQuery {
    DocumentQuery::new("newsletter")
        .with_filter(Filter::equals(Field::EMAIL, "email", email.as_str()))
        .first()
}

/// Body of `POST /contact`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactRequest {
    /// Validate into a contact message stamped with `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<ContactMessage, CommerceError> {
        let name = required("name", self.name.as_deref(), MAX_NAME_CHARS)?;
        let email = required("email", self.email.as_deref(), MAX_EMAIL_CHARS)?;
        let message = required("message", self.message.as_deref(), MAX_MESSAGE_CHARS)?;

        Ok(ContactMessage {
            full_name: name,
            email: EmailAddress::parse(&email)?,
            message,
            sent_at: now,
        })
    }
}

fn required(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<String, CommerceError> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(CommerceError::MissingField(field));
    }
    if value.chars().count() > max {
        return Err(CommerceError::FieldTooLong { field, max });
    }
    Ok(value.to_string())
}

/// A validated contact message.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactMessage {
    pub full_name: String,
    pub email: EmailAddress,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

impl ContactMessage {
    /// The `contactForm` document to create.
    pub fn to_document(&self) -> Value {
        json!({
            "_type": "contactForm",
            "fullName": self.full_name,
            "email": self.email.as_str(),
            "message": self.message,
            "subject": CONTACT_SUBJECT,
            "sentAt": timestamp(self.sent_at),
        })
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2025-05-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_email_validation() {
        assert_eq!(
            EmailAddress::parse("  Ali@Example.COM ").unwrap().as_str(),
            "ali@example.com"
        );
        for bad in ["", "ali", "@example.com", "ali@", "ali@example", "a@b@c.com", "ali @x.com", "ali@.com", "ali@x..com"] {
            assert!(EmailAddress::parse(bad).is_err(), "{bad} should be rejected");
        }
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(EmailAddress::parse(&long).is_err());
    }

    #[test]
    fn test_subscription_document() {
        let request: SubscribeRequest =
            serde_json::from_str(r#"{"email":"Ayse@Ornek.com.tr"}"#).unwrap();
        let sub = request.validate(now()).unwrap();
        let doc = sub.to_document();

        assert_eq!(doc["_type"], "newsletter");
        assert_eq!(doc["email"], "ayse@ornek.com.tr");
        assert_eq!(doc["subscribedAt"], "2025-05-01T12:00:00.000Z");

        let groq = sub.existing().to_groq();
        assert_eq!(
            groq.query,
            r#"*[_type == "newsletter" && email == $email][0]"#
        );
        assert_eq!(groq.params["email"], "ayse@ornek.com.tr");
    }

    #[test]
    fn test_subscribe_missing_email() {
        let request: SubscribeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(
            request.validate(now()),
            Err(CommerceError::MissingField("email"))
        );
    }

    #[test]
    fn test_contact_document() {
        let request = ContactRequest {
            name: Some(" Ali Veli ".into()),
            email: Some("ali@example.com".into()),
            message: Some("Merhaba".into()),
        };
        let doc = request.validate(now()).unwrap().to_document();

        assert_eq!(doc["_type"], "contactForm");
        assert_eq!(doc["fullName"], "Ali Veli");
        assert_eq!(doc["subject"], CONTACT_SUBJECT);
        assert_eq!(doc["sentAt"], "2025-05-01T12:00:00.000Z");
    }

    #[test]
    fn test_contact_validation_errors() {
        let base = ContactRequest {
            name: Some("Ali".into()),
            email: Some("ali@example.com".into()),
            message: Some("Merhaba".into()),
        };

        let missing = ContactRequest {
            message: Some("   ".into()),
            ..base.clone()
        };
        assert_eq!(
            missing.validate(now()),
            Err(CommerceError::MissingField("message"))
        );

        let too_long = ContactRequest {
            message: Some("x".repeat(MAX_MESSAGE_CHARS + 1)),
            ..base.clone()
        };
        assert!(matches!(
            too_long.validate(now()),
            Err(CommerceError::FieldTooLong { field: "message", .. })
        ));

        let bad_email = ContactRequest {
            email: Some("not-an-email".into()),
            ..base
        };
        assert!(matches!(
            bad_email.validate(now()),
            Err(CommerceError::InvalidEmail(_))
        ));
    }
}
