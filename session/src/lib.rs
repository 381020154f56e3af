//! # Ladrillo Session
//!
//! Session store and route guards for the Ladrillo client.
//!
//! ## Architecture
//!
//! The session lifecycle is implemented as a reducer and effects:
//!
//! ```text
//! Action → Reducer → (State, Effects) → Effect Execution → More Actions
//! ```
//!
//! [`SessionStore`] wraps the runtime store behind the operation surface
//! pages consume (`login`, `register`, `logout`, `fetch_user`,
//! `update_profile`), and [`RouteGuard`] turns session snapshots into
//! rendering decisions.
//!
//! ## Example: login
//!
//! ```rust,ignore
//! use ladrillo_session::*;
//!
//! let environment = SessionEnvironment::new(gateway, tokens);
//! let session = SessionStore::new(environment);
//!
//! session.login("ada@example.com", "secret").await?;
//! assert!(session.is_authenticated().await);
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod constants;
pub mod environment;
pub mod error;
pub mod guard;
pub mod providers;
pub mod reducers;
pub mod state;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use actions::SessionAction;
pub use environment::SessionEnvironment;
pub use error::{Result, SessionError};
pub use guard::{GuardDecision, RoleSet, RouteGuard};
pub use reducers::SessionReducer;
pub use state::SessionState;
pub use store::SessionStore;
