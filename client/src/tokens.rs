//! Durable token persistence.
//!
//! Tokens survive process restarts the way browser cookies survive page
//! reloads: a small per-origin store holds the access/refresh pair with
//! their expirations, and expired tokens read back as absent.
//!
//! All token mutation goes through the session operations and the
//! transport's refresh protocol; nothing else writes here.

use chrono::{DateTime, Utc};
use ladrillo_core::environment::Clock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Access/refresh token pair as issued by login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token (~1 day).
    pub access: String,
    /// Longer-lived refresh token (~7 days).
    pub refresh: String,
}

/// A persisted token with its client-side expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredToken {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredTokens {
    access: Option<StoredToken>,
    refresh: Option<StoredToken>,
}

impl StoredTokens {
    fn live(token: &Option<StoredToken>, now: DateTime<Utc>) -> Option<String> {
        token
            .as_ref()
            .filter(|stored| stored.expires_at > now)
            .map(|stored| stored.value.clone())
    }
}

/// Durable, per-origin token store (cookie-equivalent).
///
/// # Contract
///
/// - Reads always reflect the most recent in-process write, even when
///   durable persistence fails.
/// - Expired tokens are reported as absent.
/// - `clear` removes both tokens atomically: a reader never observes a
///   refresh token without its access token having been purged too.
pub trait TokenStore: Send + Sync {
    /// The access token, if present and unexpired.
    fn access_token(&self) -> Option<String>;

    /// The refresh token, if present and unexpired.
    fn refresh_token(&self) -> Option<String>;

    /// Persist a freshly issued pair, replacing any previous tokens.
    fn store_pair(&self, pair: &TokenPair);

    /// Replace only the access token (after a successful refresh).
    fn store_access(&self, access: &str);

    /// Purge both tokens.
    fn clear(&self);
}

impl<K: TokenStore + ?Sized> TokenStore for Arc<K> {
    fn access_token(&self) -> Option<String> {
        (**self).access_token()
    }

    fn refresh_token(&self) -> Option<String> {
        (**self).refresh_token()
    }

    fn store_pair(&self, pair: &TokenPair) {
        (**self).store_pair(pair);
    }

    fn store_access(&self, access: &str) {
        (**self).store_access(access);
    }

    fn clear(&self) {
        (**self).clear();
    }
}

/// In-memory token store.
///
/// Used in tests and in embeddings that do their own persistence.
#[derive(Debug, Clone)]
pub struct MemoryTokenStore<C: Clock = ladrillo_core::SystemClock> {
    inner: Arc<Mutex<StoredTokens>>,
    clock: C,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
}

impl<C: Clock> MemoryTokenStore<C> {
    /// Create an empty store with the default expirations (1 day access,
    /// 7 days refresh).
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoredTokens::default())),
            clock,
            access_ttl: chrono::Duration::days(1),
            refresh_ttl: chrono::Duration::days(7),
        }
    }

    /// Set the persisted token lifetimes.
    #[must_use]
    pub fn with_ttls(mut self, access: chrono::Duration, refresh: chrono::Duration) -> Self {
        self.access_ttl = access;
        self.refresh_ttl = refresh;
        self
    }
}

impl Default for MemoryTokenStore<ladrillo_core::SystemClock> {
    fn default() -> Self {
        Self::new(ladrillo_core::SystemClock)
    }
}

impl<C: Clock> TokenStore for MemoryTokenStore<C> {
    fn access_token(&self) -> Option<String> {
        let guard = self.inner.lock().ok()?;
        StoredTokens::live(&guard.access, self.clock.now())
    }

    fn refresh_token(&self) -> Option<String> {
        let guard = self.inner.lock().ok()?;
        StoredTokens::live(&guard.refresh, self.clock.now())
    }

    fn store_pair(&self, pair: &TokenPair) {
        let now = self.clock.now();
        if let Ok(mut guard) = self.inner.lock() {
            guard.access = Some(StoredToken {
                value: pair.access.clone(),
                expires_at: now + self.access_ttl,
            });
            guard.refresh = Some(StoredToken {
                value: pair.refresh.clone(),
                expires_at: now + self.refresh_ttl,
            });
        }
    }

    fn store_access(&self, access: &str) {
        let now = self.clock.now();
        if let Ok(mut guard) = self.inner.lock() {
            guard.access = Some(StoredToken {
                value: access.to_string(),
                expires_at: now + self.access_ttl,
            });
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = StoredTokens::default();
        }
    }
}

/// JSON-file-backed token store.
///
/// The in-memory view is authoritative; every mutation is flushed to the
/// file, and a write failure is logged without failing the operation
/// (matching cookie semantics, where persistence is best-effort).
#[derive(Debug)]
pub struct FileTokenStore<C: Clock = ladrillo_core::SystemClock> {
    path: PathBuf,
    inner: Mutex<StoredTokens>,
    clock: C,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
}

impl<C: Clock> FileTokenStore<C> {
    /// Open (or create) a token file at `path`.
    ///
    /// A missing or unreadable file starts the store empty; a corrupt file
    /// is discarded on the next write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, clock: C) -> Self {
        let path = path.into();
        let stored = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        Self {
            path,
            inner: Mutex::new(stored),
            clock,
            access_ttl: chrono::Duration::days(1),
            refresh_ttl: chrono::Duration::days(7),
        }
    }

    /// Set the persisted token lifetimes.
    #[must_use]
    pub fn with_ttls(mut self, access: chrono::Duration, refresh: chrono::Duration) -> Self {
        self.access_ttl = access;
        self.refresh_ttl = refresh;
        self
    }

    fn persist(&self, stored: &StoredTokens) {
        match serde_json::to_string_pretty(stored) {
            Ok(serialized) => {
                if let Err(io_error) = std::fs::write(&self.path, serialized) {
                    tracing::warn!(path = %self.path.display(), %io_error, "token file write failed");
                }
            },
            Err(serde_error) => {
                tracing::warn!(%serde_error, "token serialization failed");
            },
        }
    }
}

impl<C: Clock> TokenStore for FileTokenStore<C> {
    fn access_token(&self) -> Option<String> {
        let guard = self.inner.lock().ok()?;
        StoredTokens::live(&guard.access, self.clock.now())
    }

    fn refresh_token(&self) -> Option<String> {
        let guard = self.inner.lock().ok()?;
        StoredTokens::live(&guard.refresh, self.clock.now())
    }

    fn store_pair(&self, pair: &TokenPair) {
        let now = self.clock.now();
        if let Ok(mut guard) = self.inner.lock() {
            guard.access = Some(StoredToken {
                value: pair.access.clone(),
                expires_at: now + self.access_ttl,
            });
            guard.refresh = Some(StoredToken {
                value: pair.refresh.clone(),
                expires_at: now + self.refresh_ttl,
            });
            self.persist(&guard);
        }
    }

    fn store_access(&self, access: &str) {
        let now = self.clock.now();
        if let Ok(mut guard) = self.inner.lock() {
            guard.access = Some(StoredToken {
                value: access.to_string(),
                expires_at: now + self.access_ttl,
            });
            self.persist(&guard);
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = StoredTokens::default();
            self.persist(&guard);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use ladrillo_core::SystemClock;

    fn pair() -> TokenPair {
        TokenPair {
            access: "access-1".to_string(),
            refresh: "refresh-1".to_string(),
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new(SystemClock);
        assert!(store.access_token().is_none());

        store.store_pair(&pair());
        assert_eq!(store.access_token().as_deref(), Some("access-1"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));

        store.store_access("access-2");
        assert_eq!(store.access_token().as_deref(), Some("access-2"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));

        store.clear();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn test_expired_tokens_read_as_absent() {
        // Zero TTLs expire the pair immediately.
        let store = MemoryTokenStore::new(SystemClock)
            .with_ttls(chrono::Duration::zero(), chrono::Duration::zero());

        store.store_pair(&pair());
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = std::env::temp_dir().join(format!("ladrillo-tokens-{}.json", uuid::Uuid::new_v4()));

        {
            let store = FileTokenStore::open(&path, SystemClock);
            store.store_pair(&pair());
        }

        let reopened = FileTokenStore::open(&path, SystemClock);
        assert_eq!(reopened.access_token().as_deref(), Some("access-1"));
        assert_eq!(reopened.refresh_token().as_deref(), Some("refresh-1"));

        reopened.clear();
        let cleared = FileTokenStore::open(&path, SystemClock);
        assert!(cleared.refresh_token().is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let path = std::env::temp_dir().join(format!("ladrillo-tokens-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::open(&path, SystemClock);
        assert!(store.access_token().is_none());

        let _ = std::fs::remove_file(&path);
    }
}
