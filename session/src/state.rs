//! Session state types.
//!
//! All types are `Clone` to support the functional architecture pattern.

use ladrillo_client::types::{Role, User};
use serde::{Deserialize, Serialize};

/// Root session state.
///
/// The single source of truth for "who is logged in". Authentication is
/// derived from the presence of a user, so the two can never disagree.
///
/// # Examples
///
/// ```
/// # use ladrillo_session::SessionState;
/// let state = SessionState::default();
/// assert!(state.is_loading);
/// assert!(!state.is_authenticated());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Current user (if logged in).
    pub user: Option<User>,

    /// Whether a profile fetch is in flight.
    ///
    /// Starts `true`: until the first `fetch_user` settles, the client
    /// does not yet know whether a persisted token is live.
    pub is_loading: bool,
}

impl SessionState {
    /// `true` iff a user is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The current user's role, when authenticated.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_is_derived_from_user() {
        let mut state = SessionState::default();
        assert!(!state.is_authenticated());
        assert!(state.role().is_none());

        state.user = Some(crate::mocks::investor_user("a@b.com"));
        assert!(state.is_authenticated());
        assert_eq!(state.role(), Some(Role::Investor));
    }

    #[test]
    fn test_initial_state_is_loading() {
        assert!(SessionState::default().is_loading);
    }
}
