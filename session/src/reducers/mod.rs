//! Session reducer.
//!
//! Pure business logic for the session lifecycle:
//!
//! ```text
//! 1. Login → gateway login → tokens persisted → TokensStored
//! 2. TokensStored → profile fetch → ProfileLoaded | SessionCleared
//! 3. Register → local confirmation check → gateway register →
//!    RegisterSucceeded | RegisterFailed
//! 4. Logout → best-effort server call, unconditional local purge → LoggedOut
//! 5. FetchUser → no token: settle logged-out, no network;
//!    token: profile fetch → ProfileLoaded | SessionCleared
//! ```

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::error::SessionError;
use crate::providers::AuthGateway;
use crate::state::SessionState;
use ladrillo_client::{TokenStore, ValidationErrors};
use ladrillo_core::effect::{Effect, Effects};
use ladrillo_core::reducer::Reducer;
use ladrillo_core::smallvec;
use std::marker::PhantomData;
use uuid::Uuid;

/// Session reducer.
///
/// Stateless itself; generic over the environment's providers so effect
/// futures can take owned handles.
#[derive(Debug)]
pub struct SessionReducer<G, K>
where
    G: AuthGateway + Clone + Send + Sync + 'static,
    K: TokenStore + Clone + Send + Sync + 'static,
{
    _providers: PhantomData<fn() -> (G, K)>,
}

impl<G, K> SessionReducer<G, K>
where
    G: AuthGateway + Clone + Send + Sync + 'static,
    K: TokenStore + Clone + Send + Sync + 'static,
{
    /// Create a new session reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _providers: PhantomData,
        }
    }
}

impl<G, K> Default for SessionReducer<G, K>
where
    G: AuthGateway + Clone + Send + Sync + 'static,
    K: TokenStore + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G, K> Clone for SessionReducer<G, K>
where
    G: AuthGateway + Clone + Send + Sync + 'static,
    K: TokenStore + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// Fetch the profile and settle the session on the outcome.
///
/// Shared by the login flow and `FetchUser`. A failure here means the
/// access token was rejected *after* the transport's refresh attempt, so
/// the session is beyond recovery and the tokens are purged with it.
fn load_profile<G, K>(gateway: G, tokens: K, correlation_id: Uuid) -> Effect<SessionAction>
where
    G: AuthGateway + Send + Sync + 'static,
    K: TokenStore + Send + Sync + 'static,
{
    Effect::future(async move {
        match gateway.fetch_profile().await {
            Ok(user) => Some(SessionAction::ProfileLoaded {
                correlation_id,
                user,
            }),
            Err(error) => {
                tokens.clear();
                Some(SessionAction::SessionCleared {
                    correlation_id,
                    error: Some(error.into()),
                })
            },
        }
    })
}

impl<G, K> Reducer for SessionReducer<G, K>
where
    G: AuthGateway + Clone + Send + Sync + 'static,
    K: TokenStore + Clone + Send + Sync + 'static,
{
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment<G, K>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Login
            // ═══════════════════════════════════════════════════════════════
            SessionAction::Login {
                correlation_id,
                email,
                password,
            } => {
                tracing::debug!(%correlation_id, "login requested");
                // Prior session state stays untouched until the new
                // session is confirmed.
                let gateway = env.gateway.clone();
                let tokens = env.tokens.clone();

                smallvec![Effect::future(async move {
                    match gateway.login(&email, &password).await {
                        Ok(pair) => {
                            tokens.store_pair(&pair);
                            Some(SessionAction::TokensStored { correlation_id })
                        },
                        Err(error) => Some(SessionAction::LoginFailed {
                            correlation_id,
                            error: error.into(),
                        }),
                    }
                })]
            },

            SessionAction::TokensStored { correlation_id } => {
                smallvec![load_profile(
                    env.gateway.clone(),
                    env.tokens.clone(),
                    correlation_id
                )]
            },

            SessionAction::LoginFailed { correlation_id, .. } => {
                tracing::debug!(%correlation_id, "login rejected");
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════════
            // Registration
            // ═══════════════════════════════════════════════════════════════
            SessionAction::Register {
                correlation_id,
                payload,
            } => {
                // Local confirmation check saves the round trip for the
                // one mismatch the client can detect itself.
                if payload.password != payload.password_confirm {
                    let error = SessionError::Validation(ValidationErrors::single(
                        "password_confirm",
                        "passwords do not match",
                    ));
                    return smallvec![Effect::future(async move {
                        Some(SessionAction::RegisterFailed {
                            correlation_id,
                            error,
                        })
                    })];
                }

                tracing::debug!(%correlation_id, "registration requested");
                let gateway = env.gateway.clone();
                let tokens = env.tokens.clone();

                smallvec![Effect::future(async move {
                    match gateway.register(&payload).await {
                        Ok(response) => {
                            tokens.store_pair(&response.tokens);
                            Some(SessionAction::RegisterSucceeded {
                                correlation_id,
                                user: response.user,
                            })
                        },
                        Err(error) => Some(SessionAction::RegisterFailed {
                            correlation_id,
                            error: error.into(),
                        }),
                    }
                })]
            },

            SessionAction::RegisterSucceeded { user, .. } => {
                // The register response already carried the user; no
                // extra profile fetch.
                state.user = Some(user);
                state.is_loading = false;
                smallvec![]
            },

            SessionAction::RegisterFailed { correlation_id, .. } => {
                tracing::debug!(%correlation_id, "registration rejected");
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════════
            // Logout
            // ═══════════════════════════════════════════════════════════════
            SessionAction::Logout { correlation_id } => {
                let gateway = env.gateway.clone();
                let tokens = env.tokens.clone();

                smallvec![Effect::future(async move {
                    if let Some(refresh) = tokens.refresh_token() {
                        // Best-effort server-side invalidation; a network
                        // failure must not leave dead tokens behind.
                        if let Err(error) = gateway.logout(&refresh).await {
                            tracing::debug!(%error, "server logout failed, clearing locally");
                        }
                    }
                    tokens.clear();
                    Some(SessionAction::LoggedOut { correlation_id })
                })]
            },

            SessionAction::LoggedOut { .. } => {
                state.user = None;
                state.is_loading = false;
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════════
            // Profile
            // ═══════════════════════════════════════════════════════════════
            SessionAction::FetchUser { correlation_id } => {
                if env.tokens.access_token().is_none() {
                    // Terminal without a network call.
                    state.user = None;
                    state.is_loading = false;
                    return smallvec![Effect::future(async move {
                        Some(SessionAction::SessionCleared {
                            correlation_id,
                            error: None,
                        })
                    })];
                }

                state.is_loading = true;
                smallvec![load_profile(
                    env.gateway.clone(),
                    env.tokens.clone(),
                    correlation_id
                )]
            },

            SessionAction::UpdateProfile {
                correlation_id,
                update,
            } => {
                let gateway = env.gateway.clone();

                smallvec![Effect::future(async move {
                    match gateway.update_profile(&update).await {
                        Ok(user) => Some(SessionAction::ProfileLoaded {
                            correlation_id,
                            user,
                        }),
                        Err(error) => Some(SessionAction::ProfileUpdateFailed {
                            correlation_id,
                            error: error.into(),
                        }),
                    }
                })]
            },

            SessionAction::ProfileLoaded { user, .. } => {
                // Last-write-wins: overlapping fetches all represent
                // current truth, so the later resolution stands.
                state.user = Some(user);
                state.is_loading = false;
                smallvec![]
            },

            SessionAction::ProfileUpdateFailed { correlation_id, .. } => {
                tracing::debug!(%correlation_id, "profile update rejected");
                smallvec![]
            },

            SessionAction::SessionCleared { error, .. } => {
                if let Some(error) = &error {
                    tracing::debug!(%error, "session cleared");
                }
                state.user = None;
                state.is_loading = false;
                smallvec![]
            },
        }
    }
}
