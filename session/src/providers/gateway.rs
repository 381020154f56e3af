//! Auth gateway trait.

use ladrillo_client::api::{ProfileUpdate, RegisterRequest, RegisterResponse};
use ladrillo_client::types::User;
use ladrillo_client::{ApiError, TokenPair};

/// The authentication endpoints the session store depends on.
///
/// This trait abstracts over the HTTP client so reducer flows run at
/// memory speed in tests. The production implementation is
/// [`super::ApiAuthGateway`]; the transparent token refresh lives below
/// this seam, inside the transport protocol.
///
/// Token persistence is deliberately *not* part of the gateway: the
/// session store owns when tokens are written and purged.
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a token pair.
    ///
    /// # Errors
    ///
    /// `ApiError::InvalidCredentials` when the server rejects the pair.
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<TokenPair, ApiError>> + Send;

    /// Create an account, returning the user and tokens in one response.
    ///
    /// # Errors
    ///
    /// `ApiError::Validation` with field-level messages on rejected input.
    fn register(
        &self,
        payload: &RegisterRequest,
    ) -> impl std::future::Future<Output = Result<RegisterResponse, ApiError>> + Send;

    /// Invalidate a refresh token server-side.
    ///
    /// # Errors
    ///
    /// Transport and API errors; logout callers treat them as best-effort.
    fn logout(
        &self,
        refresh: &str,
    ) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// `ApiError::Unauthorized` once the transparent refresh has already
    /// failed.
    fn fetch_profile(&self) -> impl std::future::Future<Output = Result<User, ApiError>> + Send;

    /// Update the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// `ApiError::Validation` on rejected fields.
    fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> impl std::future::Future<Output = Result<User, ApiError>> + Send;
}
