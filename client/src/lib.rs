//! # Ladrillo Client
//!
//! Typed HTTP client for the Ladrillo crowdfunding platform API.
//!
//! This crate is the single place where the platform's REST contract is
//! spelled out: endpoint paths, request payloads, response DTOs, the error
//! taxonomy, and the bearer-token protocol with its single transparent
//! refresh-and-replay.
//!
//! ## Layers
//!
//! - [`transport`]: one HTTP exchange, no auth logic ([`HttpTransport`]
//!   trait, reqwest implementation)
//! - [`tokens`]: durable token persistence ([`TokenStore`] trait, memory
//!   and JSON-file implementations)
//! - [`api`]: the [`Api`] facade — attaches the bearer token, runs the
//!   refresh-once protocol, and exposes one typed endpoint group per
//!   resource
//!
//! ## Token refresh
//!
//! Every authenticated request that fails with an authorization error is
//! retried at most once: the refresh token is exchanged for a new access
//! token and the original request is replayed with it. A failed refresh
//! purges both tokens atomically and flips the session-expired signal that
//! the embedding application maps to a navigation to the login page.
//!
//! ## Example
//!
//! ```ignore
//! use ladrillo_client::{Api, ApiConfig, ReqwestTransport, tokens::MemoryTokenStore};
//! use ladrillo_core::SystemClock;
//!
//! let config = ApiConfig::from_env();
//! let transport = ReqwestTransport::new(&config)?;
//! let api = Api::new(transport, MemoryTokenStore::new(SystemClock));
//!
//! let projects = api.projects().list(None).await?;
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod tokens;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use api::Api;
pub use config::ApiConfig;
pub use error::{ApiError, Result, ValidationErrors};
pub use tokens::{TokenPair, TokenStore};
pub use transport::{HttpTransport, ReqwestTransport};
