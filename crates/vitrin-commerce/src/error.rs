//! Commerce error types.

use thiserror::Error;

/// Errors raised by domain validation and query construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Search input was empty after trimming and sanitizing.
    #[error("Search term is empty")]
    EmptyQuery,

    /// Slug contains characters outside `[a-z0-9-]`.
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    /// Email address failed validation.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// A required form field was missing or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A form field exceeded its length limit.
    #[error("Field {field} exceeds {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    /// A price was negative or not a finite number.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
}

impl CommerceError {
    /// Whether this error came from user-submitted form input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CommerceError::InvalidEmail(_)
                | CommerceError::MissingField(_)
                | CommerceError::FieldTooLong { .. }
        )
    }
}
