//! # Ladrillo Cache
//!
//! Server-state cache for the Ladrillo client: a keyed cache of
//! server-fetched resources that pages read via declarative queries and
//! refresh via explicit invalidation after writes.
//!
//! ## Protocol
//!
//! - [`QueryClient::query`] returns the cached value immediately and
//!   triggers a fetch only when the key is uncached or stale with nothing
//!   in flight; concurrent subscribers coalesce onto one request.
//! - [`QueryClient::mutate`] runs a write exactly once and, on success,
//!   invalidates the affected keys. No optimistic updates: views show
//!   only confirmed server state.
//! - Invalidation is prefix-matched over structured [`QueryKey`]s;
//!   subscribed keys re-fetch immediately, unsubscribed ones lazily.
//! - A failed re-fetch preserves last-known-good data and records the
//!   error alongside it.
//!
//! ## Example
//!
//! ```ignore
//! use ladrillo_cache::{QueryClient, keys};
//!
//! let cache = QueryClient::new();
//! let pending = cache.query(keys::pending_kyc(), fetch_pending_kyc);
//!
//! cache.mutate(review_submission(id), &[
//!     keys::pending_kyc(),
//!     keys::platform_statistics(),
//! ]).await?;
//! ```

pub mod client;
pub mod entry;
pub mod key;

// Re-export main types for convenience
pub use client::{FetchFn, FetchFuture, QueryClient, Subscription};
pub use entry::QuerySnapshot;
pub use key::{QueryKey, keys};
