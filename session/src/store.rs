//! The session store facade.
//!
//! Wraps the runtime [`Store`] behind the operation surface the UI layer
//! consumes: each operation sends a command action and awaits its own
//! terminal event, matched by correlation id so overlapping operations
//! never steal each other's results.

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::error::{Result, SessionError};
use crate::providers::AuthGateway;
use crate::reducers::SessionReducer;
use crate::state::SessionState;
use ladrillo_client::TokenStore;
use ladrillo_client::api::{ProfileUpdate, RegisterRequest};
use ladrillo_client::types::User;
use ladrillo_runtime::Store;
use std::time::Duration;
use uuid::Uuid;

/// Default time to wait for an operation's terminal event.
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// The session store.
///
/// Single source of truth for "who is logged in", plus the token
/// lifecycle. Callers mutate the session only through these operations;
/// route guards and page code read it through [`SessionStore::snapshot`].
pub struct SessionStore<G, K>
where
    G: AuthGateway + Clone + Send + Sync + 'static,
    K: TokenStore + Clone + Send + Sync + 'static,
{
    store: Store<SessionState, SessionAction, SessionEnvironment<G, K>, SessionReducer<G, K>>,
    operation_timeout: Duration,
}

impl<G, K> SessionStore<G, K>
where
    G: AuthGateway + Clone + Send + Sync + 'static,
    K: TokenStore + Clone + Send + Sync + 'static,
{
    /// Create a session store over the given environment.
    #[must_use]
    pub fn new(environment: SessionEnvironment<G, K>) -> Self {
        Self {
            store: Store::new(SessionState::default(), SessionReducer::new(), environment),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Set the per-operation timeout.
    #[must_use]
    pub const fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Log in with credentials.
    ///
    /// On success both tokens are persisted and the profile is loaded.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidCredentials`] when the server rejects the
    /// pair; prior session state is untouched on any failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let correlation_id = Uuid::new_v4();
        let terminal = self
            .store
            .send_and_wait_for(
                SessionAction::Login {
                    correlation_id,
                    email: email.to_string(),
                    password: password.to_string(),
                },
                move |action| {
                    action.correlation_id() == correlation_id
                        && matches!(
                            action,
                            SessionAction::ProfileLoaded { .. }
                                | SessionAction::SessionCleared { .. }
                                | SessionAction::LoginFailed { .. }
                        )
                },
                self.operation_timeout,
            )
            .await?;

        match terminal {
            SessionAction::ProfileLoaded { user, .. } => Ok(user),
            SessionAction::LoginFailed { error, .. } => Err(error),
            SessionAction::SessionCleared { error, .. } => {
                Err(error.unwrap_or(SessionError::SessionExpired))
            },
            _ => Err(SessionError::Runtime("unexpected terminal action".to_string())),
        }
    }

    /// Register a new account.
    ///
    /// The password-confirmation check runs locally first; on success the
    /// server's combined response populates the session directly.
    ///
    /// # Errors
    ///
    /// [`SessionError::Validation`] with field-level messages.
    pub async fn register(&self, payload: RegisterRequest) -> Result<User> {
        let correlation_id = Uuid::new_v4();
        let terminal = self
            .store
            .send_and_wait_for(
                SessionAction::Register {
                    correlation_id,
                    payload,
                },
                move |action| {
                    action.correlation_id() == correlation_id
                        && matches!(
                            action,
                            SessionAction::RegisterSucceeded { .. }
                                | SessionAction::RegisterFailed { .. }
                        )
                },
                self.operation_timeout,
            )
            .await?;

        match terminal {
            SessionAction::RegisterSucceeded { user, .. } => Ok(user),
            SessionAction::RegisterFailed { error, .. } => Err(error),
            _ => Err(SessionError::Runtime("unexpected terminal action".to_string())),
        }
    }

    /// Log out.
    ///
    /// Local state and tokens are cleared even when the server call
    /// fails; the result is always the logged-out state.
    ///
    /// # Errors
    ///
    /// Only [`SessionError::Runtime`] when the store itself is
    /// unavailable.
    pub async fn logout(&self) -> Result<()> {
        let correlation_id = Uuid::new_v4();
        self.store
            .send_and_wait_for(
                SessionAction::Logout { correlation_id },
                move |action| {
                    action.correlation_id() == correlation_id
                        && matches!(action, SessionAction::LoggedOut { .. })
                },
                self.operation_timeout,
            )
            .await?;
        Ok(())
    }

    /// Load the profile for the persisted access token.
    ///
    /// Idempotent and safe to call on every protected-page mount. A dead
    /// or absent token settles the logged-out state without error;
    /// overlapping calls are last-write-wins.
    ///
    /// # Errors
    ///
    /// Only [`SessionError::Runtime`] when the store itself is
    /// unavailable.
    pub async fn fetch_user(&self) -> Result<Option<User>> {
        let correlation_id = Uuid::new_v4();
        let terminal = self
            .store
            .send_and_wait_for(
                SessionAction::FetchUser { correlation_id },
                move |action| {
                    action.correlation_id() == correlation_id
                        && matches!(
                            action,
                            SessionAction::ProfileLoaded { .. }
                                | SessionAction::SessionCleared { .. }
                        )
                },
                self.operation_timeout,
            )
            .await?;

        match terminal {
            SessionAction::ProfileLoaded { user, .. } => Ok(Some(user)),
            _ => Ok(None),
        }
    }

    /// Update profile fields.
    ///
    /// # Errors
    ///
    /// [`SessionError::Validation`] on rejected fields; session state is
    /// untouched on failure.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
        let correlation_id = Uuid::new_v4();
        let terminal = self
            .store
            .send_and_wait_for(
                SessionAction::UpdateProfile {
                    correlation_id,
                    update,
                },
                move |action| {
                    action.correlation_id() == correlation_id
                        && matches!(
                            action,
                            SessionAction::ProfileLoaded { .. }
                                | SessionAction::ProfileUpdateFailed { .. }
                        )
                },
                self.operation_timeout,
            )
            .await?;

        match terminal {
            SessionAction::ProfileLoaded { user, .. } => Ok(user),
            SessionAction::ProfileUpdateFailed { error, .. } => Err(error),
            _ => Err(SessionError::Runtime("unexpected terminal action".to_string())),
        }
    }

    /// A snapshot of the current session state.
    pub async fn snapshot(&self) -> SessionState {
        self.store.state(Clone::clone).await
    }

    /// Whether a user is currently present.
    pub async fn is_authenticated(&self) -> bool {
        self.store.state(SessionState::is_authenticated).await
    }
}

impl<G, K> Clone for SessionStore<G, K>
where
    G: AuthGateway + Clone + Send + Sync + 'static,
    K: TokenStore + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            operation_timeout: self.operation_timeout,
        }
    }
}
