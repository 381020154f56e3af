//! Error types for API operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Error taxonomy for the platform API client.
///
/// Variants map onto the categories the UI layer handles differently:
/// credential failures go back to the login form, validation payloads go
/// back to the submitting form field-by-field, authorization failures
/// trigger redirects, and transport failures are surfaced verbatim.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// The server rejected an email/password pair.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The server (or a local pre-check) rejected input fields.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Authentication required or expired beyond recovery.
    ///
    /// Surfaced only after the transparent refresh attempt (if any) has
    /// already failed.
    #[error("Not authenticated")]
    Unauthorized,

    /// Authenticated but not allowed to perform the operation.
    #[error("Forbidden")]
    Forbidden,

    /// Requested resource not found.
    #[error("Resource not found")]
    NotFound,

    /// Any other non-success response from the API.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or the server's `detail` message when present.
        message: String,
    },

    /// Network-level failure: the exchange never completed.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The response arrived but could not be decoded.
    #[error("Failed to parse response: {0}")]
    ParseFailed(String),
}

impl ApiError {
    /// Returns `true` if this error is due to invalid user input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ladrillo_client::ApiError;
    /// assert!(ApiError::InvalidCredentials.is_user_error());
    /// assert!(!ApiError::Unauthorized.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::Validation(_))
    }

    /// Returns `true` if this error means the session is no longer valid.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::InvalidCredentials)
    }
}

/// Field-level validation messages, as served by the API.
///
/// The wire shape is a JSON object mapping field names to lists of
/// messages (`{"email": ["already registered"]}`). Ordering is kept
/// stable so "the first field error" is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationErrors {
    /// Messages keyed by field name.
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Build a single-field error (used for local pre-checks).
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), vec![message.into()]);
        Self { fields }
    }

    /// The first message of the first field, the one forms display.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.fields
            .values()
            .find_map(|messages| messages.first())
            .map(String::as_str)
    }

    /// Whether any message is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse the DRF-style wire shape, returning `None` when the body is
    /// not an object of message lists.
    #[must_use]
    pub fn from_body(body: &serde_json::Value) -> Option<Self> {
        let object = body.as_object()?;
        let mut fields = BTreeMap::new();

        for (field, value) in object {
            let messages: Vec<String> = match value {
                serde_json::Value::String(message) => vec![message.clone()],
                serde_json::Value::Array(items) => items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
                _ => return None,
            };
            fields.insert(field.clone(), messages);
        }

        if fields.is_empty() {
            None
        } else {
            Some(Self { fields })
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}
