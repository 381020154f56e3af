//! Authentication and profile endpoints.

use super::{Api, parse, paths};
use crate::error::{ApiError, Result};
use crate::tokens::{TokenPair, TokenStore};
use crate::transport::{ApiRequest, HttpTransport};
use crate::types::User;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Registration payload.
///
/// The password-confirmation equality check is performed by the session
/// store before the payload is ever sent; the server repeats it
/// authoritatively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Login email.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Password confirmation (must equal `password`).
    pub password_confirm: String,
    /// First name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Combined registration response: the created user plus a token pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// The created user.
    pub user: User,
    /// Freshly issued tokens.
    pub tokens: TokenPair,
}

/// Profile update payload (PATCH semantics: absent fields are untouched).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New first name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Authentication and profile endpoints.
pub struct AuthEndpoints<'a, T: HttpTransport, K: TokenStore> {
    pub(crate) api: &'a Api<T, K>,
}

impl<T: HttpTransport, K: TokenStore> AuthEndpoints<'_, T, K> {
    /// Exchange credentials for a token pair.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidCredentials`] when the server rejects the pair;
    /// transport errors otherwise.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair> {
        let request = ApiRequest::post(paths::AUTH_LOGIN)
            .with_body(json!({ "email": email, "password": password }));

        match self.api.request(request).await {
            Ok(body) => parse(body),
            // The login endpoint answers 401 for a bad pair; everywhere
            // else 401 means a dead session.
            Err(ApiError::Unauthorized) => Err(ApiError::InvalidCredentials),
            Err(other) => Err(other),
        }
    }

    /// Create an account. The response carries the user and both tokens.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] with field-level messages on rejected
    /// input (duplicate email, weak password, mismatched confirmation).
    pub async fn register(&self, payload: &RegisterRequest) -> Result<RegisterResponse> {
        let body =
            serde_json::to_value(payload).map_err(|e| ApiError::ParseFailed(e.to_string()))?;
        let response = self
            .api
            .request(ApiRequest::post(paths::AUTH_REGISTER).with_body(body))
            .await?;
        parse(response)
    }

    /// Invalidate a refresh token server-side.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors; callers performing a local
    /// logout treat them as best-effort.
    pub async fn logout(&self, refresh: &str) -> Result<()> {
        self.api
            .request(ApiRequest::post(paths::AUTH_LOGOUT).with_body(json!({ "refresh": refresh })))
            .await?;
        Ok(())
    }

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] once the transparent refresh has already
    /// failed; transport errors otherwise.
    pub async fn me(&self) -> Result<User> {
        let response = self.api.request(ApiRequest::get(paths::AUTH_ME)).await?;
        parse(response)
    }

    /// Update the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] on rejected fields; transport errors
    /// otherwise.
    pub async fn update_me(&self, update: &ProfileUpdate) -> Result<User> {
        let body =
            serde_json::to_value(update).map_err(|e| ApiError::ParseFailed(e.to_string()))?;
        let response = self
            .api
            .request(ApiRequest::patch(paths::AUTH_ME).with_body(body))
            .await?;
        parse(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::testing::{api_without_tokens, response};
    use serde_json::json;

    #[tokio::test]
    async fn login_maps_unauthorized_to_invalid_credentials() {
        let (api, _transport) =
            api_without_tokens(vec![response(401, json!({"detail": "No active account"}))]);

        let result = api.auth().login("a@b.com", "wrong").await;

        assert!(matches!(result, Err(ApiError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_returns_token_pair() {
        let (api, transport) = api_without_tokens(vec![response(
            200,
            json!({"access": "a1", "refresh": "r1"}),
        )]);

        let pair = api.auth().login("a@b.com", "secret").await.unwrap();

        assert_eq!(pair.access, "a1");
        assert_eq!(pair.refresh, "r1");
        let requests = transport.requests();
        assert_eq!(requests[0].body.as_ref().unwrap()["email"], json!("a@b.com"));
    }

    #[tokio::test]
    async fn register_surfaces_field_errors() {
        let (api, _transport) = api_without_tokens(vec![response(
            400,
            json!({"email": ["already registered"]}),
        )]);

        let payload = RegisterRequest {
            email: "a@b.com".to_string(),
            password: "Xx12345!".to_string(),
            password_confirm: "Xx12345!".to_string(),
            first_name: None,
            last_name: None,
            phone: None,
        };
        let result = api.auth().register(&payload).await;

        let Err(ApiError::Validation(errors)) = result else {
            unreachable!("expected validation error");
        };
        assert_eq!(errors.first_message(), Some("already registered"));
    }

    #[test]
    fn register_request_omits_absent_optionals() {
        let payload = RegisterRequest {
            email: "a@b.com".to_string(),
            password: "pw".to_string(),
            password_confirm: "pw".to_string(),
            first_name: None,
            last_name: None,
            phone: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("first_name").is_none());
        assert!(value.get("phone").is_none());
    }
}
