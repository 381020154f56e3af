//! Route guards.
//!
//! A page declares which roles may see it; the guard turns the current
//! session state into a rendering decision. Guards never mutate the
//! session beyond the idempotent `fetch_user` they run on mount.

use crate::constants::routes;
use crate::providers::AuthGateway;
use crate::state::SessionState;
use crate::store::SessionStore;
use ladrillo_client::TokenStore;
use ladrillo_client::types::Role;

/// The roles a page requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleSet {
    /// Any authenticated user may render (investor pages).
    AnyAuthenticated,
    /// Only the listed roles may render (back-office pages).
    OneOf(Vec<Role>),
}

impl RoleSet {
    /// The back-office requirement: admins and executives.
    #[must_use]
    pub fn back_office() -> Self {
        Self::OneOf(vec![Role::Admin, Role::Executive])
    }

    /// Whether the given role satisfies the requirement.
    #[must_use]
    pub fn allows(&self, role: Role) -> bool {
        match self {
            Self::AnyAuthenticated => true,
            Self::OneOf(roles) => roles.contains(&role),
        }
    }
}

/// What the page should do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// The profile fetch is still in flight; show a loading indicator.
    Loading,
    /// The user may see the page.
    Render,
    /// Not authenticated; navigate to the login page.
    RedirectToLogin,
    /// Authenticated but the role is outside the required set; navigate
    /// to the role-appropriate default page.
    RedirectToDefault,
}

impl GuardDecision {
    /// Whether page content may be rendered.
    ///
    /// `false` during loading and during both redirect transitions, so
    /// unauthorized content never flashes.
    #[must_use]
    pub const fn should_render(&self) -> bool {
        matches!(self, Self::Render)
    }

    /// The navigation target, when the decision is a redirect.
    #[must_use]
    pub const fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Self::RedirectToLogin => Some(routes::LOGIN),
            Self::RedirectToDefault => Some(routes::DASHBOARD),
            Self::Loading | Self::Render => None,
        }
    }
}

/// A route guard for one page (or page group).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    required: RoleSet,
}

impl RouteGuard {
    /// Create a guard with the given role requirement.
    #[must_use]
    pub const fn new(required: RoleSet) -> Self {
        Self { required }
    }

    /// Guard for investor pages (any authenticated user).
    #[must_use]
    pub const fn authenticated() -> Self {
        Self::new(RoleSet::AnyAuthenticated)
    }

    /// Guard for back-office pages (admins and executives).
    #[must_use]
    pub fn back_office() -> Self {
        Self::new(RoleSet::back_office())
    }

    /// Decide from a session snapshot.
    #[must_use]
    pub fn evaluate(&self, state: &SessionState) -> GuardDecision {
        if state.is_loading {
            return GuardDecision::Loading;
        }

        match state.role() {
            None => GuardDecision::RedirectToLogin,
            Some(role) if !self.required.allows(role) => GuardDecision::RedirectToDefault,
            Some(_) => GuardDecision::Render,
        }
    }

    /// Run the mount-time check: refresh the session, then decide.
    ///
    /// `fetch_user` is idempotent and settles the loading flag, so the
    /// returned decision is never [`GuardDecision::Loading`] unless the
    /// store itself is unavailable.
    pub async fn resolve<G, K>(&self, store: &SessionStore<G, K>) -> GuardDecision
    where
        G: AuthGateway + Clone + Send + Sync + 'static,
        K: TokenStore + Clone + Send + Sync + 'static,
    {
        if let Err(error) = store.fetch_user().await {
            tracing::warn!(%error, "session refresh failed during guard check");
        }
        self.evaluate(&store.snapshot().await)
    }
}
