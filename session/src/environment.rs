//! Session environment.
//!
//! This module defines the environment type for dependency injection
//! in the session reducer.

use crate::providers::AuthGateway;
use ladrillo_client::TokenStore;

/// Session environment.
///
/// Contains the external dependencies the session reducer needs. Both
/// providers are `Clone` because effect futures take owned handles.
///
/// # Type Parameters
///
/// - `G`: Auth gateway (the HTTP surface)
/// - `K`: Token store (the durable cookie-equivalent)
#[derive(Clone)]
pub struct SessionEnvironment<G, K>
where
    G: AuthGateway + Clone,
    K: TokenStore + Clone,
{
    /// Auth gateway.
    pub gateway: G,

    /// Durable token store.
    ///
    /// Written only by session effects and the transport's refresh
    /// protocol; never by callers.
    pub tokens: K,
}

impl<G, K> SessionEnvironment<G, K>
where
    G: AuthGateway + Clone,
    K: TokenStore + Clone,
{
    /// Create a new session environment.
    #[must_use]
    pub const fn new(gateway: G, tokens: K) -> Self {
        Self { gateway, tokens }
    }
}
