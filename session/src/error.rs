//! Error types for session operations.

use ladrillo_client::{ApiError, ValidationErrors};
use ladrillo_runtime::StoreError;
use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Error taxonomy for the session store.
///
/// Collapses the API error space into the categories the UI layer
/// handles: credential failures return to the login form, validation
/// payloads return to the submitting form, an expired session triggers
/// the login redirect, and network failures are surfaced verbatim.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    /// The server rejected an email/password pair.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Rejected input fields (server-side, or the local
    /// password-confirmation pre-check).
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The session is no longer valid and could not be refreshed.
    #[error("Session expired")]
    SessionExpired,

    /// The exchange never completed.
    #[error("Network failure: {0}")]
    Network(String),

    /// Any other API failure, preserved for display.
    #[error(transparent)]
    Gateway(ApiError),

    /// The store runtime could not complete the operation.
    #[error("Session store unavailable: {0}")]
    Runtime(String),
}

impl SessionError {
    /// Returns `true` if this error is due to invalid user input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::Validation(_))
    }

    /// The first field-level message, when one exists.
    ///
    /// Forms display exactly this string.
    #[must_use]
    pub fn first_field_message(&self) -> Option<&str> {
        match self {
            Self::Validation(errors) => errors.first_message(),
            _ => None,
        }
    }
}

impl From<ApiError> for SessionError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::InvalidCredentials => Self::InvalidCredentials,
            ApiError::Validation(errors) => Self::Validation(errors),
            ApiError::Unauthorized => Self::SessionExpired,
            ApiError::RequestFailed(message) => Self::Network(message),
            other => Self::Gateway(other),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(error: StoreError) -> Self {
        Self::Runtime(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_mapping() {
        assert_eq!(
            SessionError::from(ApiError::InvalidCredentials),
            SessionError::InvalidCredentials
        );
        assert_eq!(
            SessionError::from(ApiError::Unauthorized),
            SessionError::SessionExpired
        );
        assert!(matches!(
            SessionError::from(ApiError::RequestFailed("connection reset".to_string())),
            SessionError::Network(_)
        ));
        assert!(matches!(
            SessionError::from(ApiError::NotFound),
            SessionError::Gateway(ApiError::NotFound)
        ));
    }

    #[test]
    fn test_first_field_message() {
        let error =
            SessionError::Validation(ValidationErrors::single("email", "already registered"));
        assert_eq!(error.first_field_message(), Some("already registered"));
        assert!(error.is_user_error());
        assert!(SessionError::SessionExpired.first_field_message().is_none());
    }
}
