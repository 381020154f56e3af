//! The API facade.
//!
//! [`Api`] owns the transport and the token store, attaches the bearer
//! token to every request, and implements the refresh-once protocol.
//! Typed endpoint groups hang off it, one per API resource.
//!
//! ## Refresh-once protocol
//!
//! For each request the flow is a single explicit state check, not hidden
//! interception:
//!
//! 1. Attach the persisted access token, if any, and execute.
//! 2. On an authorization failure where a bearer was attached: read the
//!    refresh token. Absent → propagate the original failure.
//! 3. Exchange it at `/auth/refresh/`. Failure → purge both tokens,
//!    flip the session-expired signal, report `Unauthorized`.
//! 4. Persist the new access token and replay the original request once.
//!    The replay's outcome is final, whatever it is.

use crate::error::{ApiError, Result, ValidationErrors};
use crate::tokens::TokenStore;
use crate::transport::{ApiRequest, HttpResponse, HttpTransport};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::watch;

pub mod auth;
pub mod investments;
pub mod kyc;
pub mod leads;
pub mod payments;
pub mod projects;
pub mod reservations;
pub mod statistics;

pub use auth::{AuthEndpoints, ProfileUpdate, RegisterRequest, RegisterResponse};
pub use investments::InvestmentEndpoints;
pub use kyc::KycEndpoints;
pub use leads::LeadEndpoints;
pub use payments::PaymentEndpoints;
pub use projects::ProjectEndpoints;
pub use reservations::{ReservationEndpoints, ReservationRequest};
pub use statistics::StatisticsEndpoints;

/// Endpoint paths of the platform API.
pub mod paths {
    /// Login endpoint.
    pub const AUTH_LOGIN: &str = "/auth/login/";
    /// Registration endpoint.
    pub const AUTH_REGISTER: &str = "/auth/register/";
    /// Logout endpoint.
    pub const AUTH_LOGOUT: &str = "/auth/logout/";
    /// Profile endpoint (GET/PATCH).
    pub const AUTH_ME: &str = "/auth/me/";
    /// Token refresh endpoint.
    pub const AUTH_REFRESH: &str = "/auth/refresh/";
}

/// The platform API client.
///
/// Cheap to clone; clones share the transport, the token store and the
/// session-expired signal.
pub struct Api<T, K>
where
    T: HttpTransport,
    K: TokenStore,
{
    transport: Arc<T>,
    tokens: Arc<K>,
    session_expired: Arc<watch::Sender<bool>>,
}

impl<T, K> Api<T, K>
where
    T: HttpTransport,
    K: TokenStore,
{
    /// Create a client over a transport and a token store.
    #[must_use]
    pub fn new(transport: T, tokens: K) -> Self {
        let (session_expired, _) = watch::channel(false);
        Self {
            transport: Arc::new(transport),
            tokens: Arc::new(tokens),
            session_expired: Arc::new(session_expired),
        }
    }

    /// Shared handle to the token store.
    #[must_use]
    pub fn token_store(&self) -> Arc<K> {
        Arc::clone(&self.tokens)
    }

    /// Observe the session-expired signal.
    ///
    /// Flips to `true` when a refresh attempt fails and the tokens are
    /// purged; the embedding application maps this to a hard navigation
    /// to the login page. Reset to `false` is not needed — a new login
    /// replaces the whole client state the observer cares about.
    #[must_use]
    pub fn session_expired(&self) -> watch::Receiver<bool> {
        self.session_expired.subscribe()
    }

    /// Authentication and profile endpoints.
    #[must_use]
    pub const fn auth(&self) -> AuthEndpoints<'_, T, K> {
        AuthEndpoints { api: self }
    }

    /// Project catalogue endpoints.
    #[must_use]
    pub const fn projects(&self) -> ProjectEndpoints<'_, T, K> {
        ProjectEndpoints { api: self }
    }

    /// Reservation endpoints.
    #[must_use]
    pub const fn reservations(&self) -> ReservationEndpoints<'_, T, K> {
        ReservationEndpoints { api: self }
    }

    /// KYC endpoints.
    #[must_use]
    pub const fn kyc(&self) -> KycEndpoints<'_, T, K> {
        KycEndpoints { api: self }
    }

    /// Investment endpoints.
    #[must_use]
    pub const fn investments(&self) -> InvestmentEndpoints<'_, T, K> {
        InvestmentEndpoints { api: self }
    }

    /// Payment-proof endpoints.
    #[must_use]
    pub const fn payments(&self) -> PaymentEndpoints<'_, T, K> {
        PaymentEndpoints { api: self }
    }

    /// Lead-management endpoints.
    #[must_use]
    pub const fn leads(&self) -> LeadEndpoints<'_, T, K> {
        LeadEndpoints { api: self }
    }

    /// Statistics endpoints.
    #[must_use]
    pub const fn statistics(&self) -> StatisticsEndpoints<'_, T, K> {
        StatisticsEndpoints { api: self }
    }

    /// Execute a request with the bearer/refresh-once protocol.
    pub(crate) async fn request(&self, request: ApiRequest) -> Result<serde_json::Value> {
        let bearer = self.tokens.access_token();
        let had_bearer = bearer.is_some();

        let response = self
            .transport
            .execute(request.clone().with_bearer(bearer))
            .await?;

        // Refresh applies only when an access token was actually sent;
        // an anonymous 401 (e.g. bad login credentials) propagates as-is.
        if response.status == 401 && had_bearer {
            return self.refresh_and_replay(request, response).await;
        }

        into_result(response)
    }

    /// One refresh attempt, one replay. Never recurses.
    async fn refresh_and_replay(
        &self,
        original: ApiRequest,
        failed: HttpResponse,
    ) -> Result<serde_json::Value> {
        let Some(refresh) = self.tokens.refresh_token() else {
            return into_result(failed);
        };

        metrics::counter!("client.refresh.attempts").increment(1);
        tracing::debug!(path = %original.path, "access token rejected, refreshing");

        let refresh_request = ApiRequest::post(paths::AUTH_REFRESH)
            .with_body(serde_json::json!({ "refresh": refresh }));

        let refreshed = match self.transport.execute(refresh_request).await {
            Ok(response) if response.is_success() => response,
            Ok(_) | Err(_) => {
                self.expire_session();
                return Err(ApiError::Unauthorized);
            },
        };

        let Some(access) = refreshed.body.get("access").and_then(serde_json::Value::as_str)
        else {
            self.expire_session();
            return Err(ApiError::Unauthorized);
        };

        self.tokens.store_access(access);
        metrics::counter!("client.refresh.success").increment(1);

        // Replay exactly once; a second authorization failure propagates.
        let replay = self
            .transport
            .execute(original.with_bearer(Some(access.to_string())))
            .await?;
        into_result(replay)
    }

    fn expire_session(&self) {
        metrics::counter!("client.refresh.failures").increment(1);
        tracing::warn!("token refresh failed, clearing session");
        self.tokens.clear();
        let _ = self.session_expired.send(true);
    }
}

impl<T, K> Clone for Api<T, K>
where
    T: HttpTransport,
    K: TokenStore,
{
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            tokens: Arc::clone(&self.tokens),
            session_expired: Arc::clone(&self.session_expired),
        }
    }
}

/// Convert a completed exchange into the typed error taxonomy.
fn into_result(response: HttpResponse) -> Result<serde_json::Value> {
    if response.is_success() {
        return Ok(response.body);
    }

    Err(error_from_response(&response))
}

fn error_from_response(response: &HttpResponse) -> ApiError {
    match response.status {
        400 | 422 => ValidationErrors::from_body(&response.body).map_or_else(
            || ApiError::Api {
                status: response.status,
                message: detail_message(&response.body),
            },
            ApiError::Validation,
        ),
        401 => ApiError::Unauthorized,
        403 => ApiError::Forbidden,
        404 => ApiError::NotFound,
        status => ApiError::Api {
            status,
            message: detail_message(&response.body),
        },
    }
}

fn detail_message(body: &serde_json::Value) -> String {
    body.get("detail")
        .and_then(serde_json::Value::as_str)
        .map_or_else(|| body.to_string(), str::to_string)
}

/// Deserialize a response body into a DTO.
pub(crate) fn parse<D: DeserializeOwned>(value: serde_json::Value) -> Result<D> {
    serde_json::from_value(value).map_err(|e| ApiError::ParseFailed(e.to_string()))
}

/// Deserialize a list response, unwrapping the pagination envelope when
/// present (the API serves both `[...]` and `{"results": [...]}`).
pub(crate) fn parse_list<D: DeserializeOwned>(value: serde_json::Value) -> Result<Vec<D>> {
    let items = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut object) => object
            .remove("results")
            .ok_or_else(|| ApiError::ParseFailed("missing results array".to_string()))?,
        other => {
            return Err(ApiError::ParseFailed(format!(
                "expected a list, got {other}"
            )));
        },
    };

    parse(items)
}
