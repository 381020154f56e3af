//! Session actions.
//!
//! Actions follow the command/event split: commands express caller intent
//! (`Login`, `Logout`, …), events record the outcome of the async work
//! the commands triggered (`ProfileLoaded`, `SessionCleared`, …).
//!
//! Every action carries a correlation id so a caller awaiting a terminal
//! event can ignore events belonging to overlapping operations.

use crate::error::SessionError;
use ladrillo_client::api::{ProfileUpdate, RegisterRequest};
use ladrillo_client::types::User;
use uuid::Uuid;

/// Session action.
///
/// This enum represents all possible inputs to the session reducer.
/// Actions are the **only** way to communicate with the session store;
/// the reducer is a pure function: `(State, Action, Env) → (State, Effects)`.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════════
    /// Exchange credentials for a session.
    ///
    /// # Flow
    ///
    /// 1. Gateway login → tokens persisted → `TokensStored`
    /// 2. Profile fetch → `ProfileLoaded` (or `SessionCleared` on failure)
    Login {
        /// Correlation ID for request tracing.
        correlation_id: Uuid,
        /// Login email.
        email: String,
        /// Password.
        password: String,
    },

    /// Create an account.
    ///
    /// The password-confirmation equality check happens locally before
    /// any network call; a mismatch produces `RegisterFailed` directly.
    Register {
        /// Correlation ID for request tracing.
        correlation_id: Uuid,
        /// Registration payload.
        payload: RegisterRequest,
    },

    /// End the session.
    ///
    /// The server call is best-effort; local state and tokens are cleared
    /// unconditionally.
    Logout {
        /// Correlation ID for request tracing.
        correlation_id: Uuid,
    },

    /// Load the profile for the persisted access token.
    ///
    /// With no persisted token this settles immediately (no network call)
    /// in the logged-out state. Idempotent and safe to send on every
    /// protected-page mount.
    FetchUser {
        /// Correlation ID for request tracing.
        correlation_id: Uuid,
    },

    /// Update profile fields.
    UpdateProfile {
        /// Correlation ID for request tracing.
        correlation_id: Uuid,
        /// Fields to change.
        update: ProfileUpdate,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════════
    /// A login's token pair has been persisted; the profile fetch starts.
    TokensStored {
        /// Correlation ID of the originating login.
        correlation_id: Uuid,
    },

    /// Login rejected; prior session state is untouched.
    LoginFailed {
        /// Correlation ID of the originating login.
        correlation_id: Uuid,
        /// Why the login failed.
        error: SessionError,
    },

    /// Registration completed; the server returned user and tokens in one
    /// response, so no extra profile fetch is needed.
    RegisterSucceeded {
        /// Correlation ID of the originating registration.
        correlation_id: Uuid,
        /// The created user.
        user: User,
    },

    /// Registration rejected (locally or by the server).
    RegisterFailed {
        /// Correlation ID of the originating registration.
        correlation_id: Uuid,
        /// Field-level or transport failure.
        error: SessionError,
    },

    /// A profile fetch (or profile update) succeeded.
    ProfileLoaded {
        /// Correlation ID of the originating command.
        correlation_id: Uuid,
        /// The authenticated user.
        user: User,
    },

    /// A profile update failed; session state is untouched.
    ProfileUpdateFailed {
        /// Correlation ID of the originating update.
        correlation_id: Uuid,
        /// Why the update failed.
        error: SessionError,
    },

    /// The session settled in the logged-out state.
    ///
    /// Produced when no token is persisted, or when a profile fetch
    /// failed beyond recovery (tokens already purged by the effect).
    SessionCleared {
        /// Correlation ID of the originating command.
        correlation_id: Uuid,
        /// The failure that ended the session, if any.
        error: Option<SessionError>,
    },

    /// Logout settled; local state and tokens are gone.
    LoggedOut {
        /// Correlation ID of the originating logout.
        correlation_id: Uuid,
    },
}

impl SessionAction {
    /// The correlation id this action belongs to.
    #[must_use]
    pub const fn correlation_id(&self) -> Uuid {
        match self {
            Self::Login { correlation_id, .. }
            | Self::Register { correlation_id, .. }
            | Self::Logout { correlation_id }
            | Self::FetchUser { correlation_id }
            | Self::UpdateProfile { correlation_id, .. }
            | Self::TokensStored { correlation_id }
            | Self::LoginFailed { correlation_id, .. }
            | Self::RegisterSucceeded { correlation_id, .. }
            | Self::RegisterFailed { correlation_id, .. }
            | Self::ProfileLoaded { correlation_id, .. }
            | Self::ProfileUpdateFailed { correlation_id, .. }
            | Self::SessionCleared { correlation_id, .. }
            | Self::LoggedOut { correlation_id } => *correlation_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_id_is_uniform() {
        let id = Uuid::new_v4();
        let action = SessionAction::FetchUser { correlation_id: id };
        assert_eq!(action.correlation_id(), id);

        let action = SessionAction::SessionCleared {
            correlation_id: id,
            error: None,
        };
        assert_eq!(action.correlation_id(), id);
    }
}
