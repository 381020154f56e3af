//! Production auth gateway backed by the platform API client.

use super::AuthGateway;
use ladrillo_client::api::{ProfileUpdate, RegisterRequest, RegisterResponse};
use ladrillo_client::types::User;
use ladrillo_client::{Api, ApiError, HttpTransport, TokenPair, TokenStore};

/// [`AuthGateway`] implementation over [`Api`].
pub struct ApiAuthGateway<T, K>
where
    T: HttpTransport,
    K: TokenStore,
{
    api: Api<T, K>,
}

impl<T, K> ApiAuthGateway<T, K>
where
    T: HttpTransport,
    K: TokenStore,
{
    /// Wrap an API client.
    #[must_use]
    pub const fn new(api: Api<T, K>) -> Self {
        Self { api }
    }

    /// The wrapped API client.
    #[must_use]
    pub const fn api(&self) -> &Api<T, K> {
        &self.api
    }
}

impl<T, K> Clone for ApiAuthGateway<T, K>
where
    T: HttpTransport,
    K: TokenStore,
{
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
        }
    }
}

impl<T, K> AuthGateway for ApiAuthGateway<T, K>
where
    T: HttpTransport,
    K: TokenStore,
{
    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        self.api.auth().login(email, password).await
    }

    async fn register(&self, payload: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.api.auth().register(payload).await
    }

    async fn logout(&self, refresh: &str) -> Result<(), ApiError> {
        self.api.auth().logout(refresh).await
    }

    async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.api.auth().me().await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.api.auth().update_me(update).await
    }
}
