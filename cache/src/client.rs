//! The query client.
//!
//! Read-through cache keyed by [`QueryKey`], with request coalescing,
//! subscriber counting and explicit invalidation. All cache writes happen
//! inside `query`/`mutate`/`invalidate`; page code never assigns entries
//! directly.

use crate::entry::QuerySnapshot;
use crate::key::QueryKey;
use futures::future::BoxFuture;
use ladrillo_client::ApiError;
use ladrillo_core::environment::{Clock, SystemClock};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// The future a fetch function produces.
pub type FetchFuture = BoxFuture<'static, Result<serde_json::Value, ApiError>>;

/// A re-runnable fetch function for one key.
///
/// Stored with the entry so invalidation can re-trigger the fetch without
/// the original subscriber's involvement.
pub type FetchFn = Arc<dyn Fn() -> FetchFuture + Send + Sync>;

struct Entry {
    snapshot: watch::Sender<QuerySnapshot>,
    subscribers: usize,
    in_flight: bool,
    fetcher: Option<FetchFn>,
}

impl Entry {
    fn new() -> Self {
        let (snapshot, _) = watch::channel(QuerySnapshot::default());
        Self {
            snapshot,
            subscribers: 0,
            in_flight: false,
            fetcher: None,
        }
    }
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    clock: Arc<dyn Clock>,
}

/// Keyed cache of server-fetched resources.
///
/// Cheap to clone; clones share the same entries.
///
/// # Runtime
///
/// Fetches run in spawned tasks, so the client must live inside a tokio
/// runtime (the UI event loop).
///
/// # Example
///
/// ```ignore
/// let cache = QueryClient::new();
/// let api = api.clone();
///
/// let mut pending = cache.query(keys::pending_kyc(), Arc::new(move || {
///     let api = api.clone();
///     Box::pin(async move {
///         let list = api.kyc().pending().await?;
///         serde_json::to_value(list).map_err(|e| ApiError::ParseFailed(e.to_string()))
///     })
/// }));
///
/// cache
///     .mutate(api.kyc().review(id, ReviewAction::Approve, None), &[
///         keys::pending_kyc(),
///         keys::platform_statistics(),
///     ])
///     .await?;
/// // `pending` re-fetches and observes the shorter list.
/// ```
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl QueryClient {
    /// Create an empty cache using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty cache with an injected clock (tests).
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                clock,
            }),
        }
    }

    /// Subscribe to a key, fetching when needed.
    ///
    /// Returns immediately with a [`Subscription`] whose first snapshot is
    /// the current cached value (possibly stale, possibly empty). A fetch
    /// is triggered only when the key has no in-flight request and is
    /// either uncached or stale; concurrent subscribers to the same key
    /// share one underlying request and one cached result.
    ///
    /// The fetch function is retained for the entry, replacing any
    /// previously registered one, and is re-run on invalidation.
    pub fn query(&self, key: QueryKey, fetch: FetchFn) -> Subscription {
        let Ok(mut entries) = self.inner.entries.lock() else {
            // Poisoned lock: hand back a detached subscription rather
            // than propagate the panic into page code.
            let (sender, receiver) = watch::channel(QuerySnapshot::default());
            drop(sender);
            return Subscription {
                key,
                receiver,
                inner: Arc::clone(&self.inner),
            };
        };

        let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
        entry.subscribers += 1;
        entry.fetcher = Some(Arc::clone(&fetch));
        let receiver = entry.snapshot.subscribe();

        let current = entry.snapshot.borrow().clone();
        let needs_fetch = !current.has_data() || current.is_stale;

        if entry.in_flight {
            metrics::counter!("cache.fetch.coalesced").increment(1);
            tracing::debug!(%key, "fetch already in flight, coalescing");
        } else if needs_fetch {
            Self::start_fetch(&self.inner, &key, entry);
        }

        Subscription {
            key,
            receiver,
            inner: Arc::clone(&self.inner),
        }
    }

    /// A read-only peek at a key's current snapshot.
    #[must_use]
    pub fn snapshot(&self, key: &QueryKey) -> Option<QuerySnapshot> {
        let entries = self.inner.entries.lock().ok()?;
        entries.get(key).map(|entry| entry.snapshot.borrow().clone())
    }

    /// Run a write operation exactly once; on success invalidate the
    /// given keys.
    ///
    /// No cache entry is touched speculatively: on failure the error is
    /// surfaced to the caller (field-level validation payloads intact) and
    /// subscribed views keep showing confirmed server state.
    ///
    /// # Errors
    ///
    /// Whatever the operation itself returns; the operation is never
    /// retried.
    pub async fn mutate<T, F>(&self, operation: F, invalidates: &[QueryKey]) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let output = operation.await?;
        self.invalidate(invalidates);
        Ok(output)
    }

    /// Mark every entry under the given prefixes stale.
    ///
    /// Subscribed entries re-fetch immediately; unsubscribed ones re-fetch
    /// lazily on their next subscription.
    pub fn invalidate(&self, prefixes: &[QueryKey]) {
        let Ok(mut entries) = self.inner.entries.lock() else {
            return;
        };

        for (key, entry) in entries.iter_mut() {
            if !prefixes.iter().any(|prefix| key.matches_prefix(prefix)) {
                continue;
            }

            metrics::counter!("cache.invalidations").increment(1);
            tracing::debug!(%key, "invalidated");
            entry
                .snapshot
                .send_modify(|snapshot| snapshot.is_stale = true);

            if entry.subscribers > 0 && !entry.in_flight && entry.fetcher.is_some() {
                Self::start_fetch(&self.inner, key, entry);
            }
        }
    }

    /// Drop entries that no component references.
    ///
    /// In-flight entries are kept so their results still land.
    pub fn gc(&self) {
        if let Ok(mut entries) = self.inner.entries.lock() {
            entries.retain(|_, entry| entry.subscribers > 0 || entry.in_flight);
        }
    }

    /// Number of live entries (for diagnostics and tests).
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Begin a fetch for an entry known to have none in flight.
    fn start_fetch(inner: &Arc<Inner>, key: &QueryKey, entry: &mut Entry) {
        let Some(fetcher) = entry.fetcher.clone() else {
            return;
        };

        entry.in_flight = true;
        entry.snapshot.send_modify(|snapshot| {
            snapshot.is_fetching = true;
            snapshot.is_loading = snapshot.data.is_none();
        });

        metrics::counter!("cache.fetch.started").increment(1);
        tracing::debug!(%key, "fetch started");

        let inner = Arc::clone(inner);
        let key = key.clone();
        tokio::spawn(async move {
            let result = fetcher().await;
            Inner::complete_fetch(&inner, &key, result);
        });
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn complete_fetch(inner: &Arc<Inner>, key: &QueryKey, result: Result<serde_json::Value, ApiError>) {
        let Ok(mut entries) = inner.entries.lock() else {
            return;
        };
        // The entry may have been garbage-collected mid-fetch; the late
        // result is simply not rendered anywhere.
        let Some(entry) = entries.get_mut(key) else {
            return;
        };

        entry.in_flight = false;
        match result {
            Ok(value) => {
                let now = inner.clock.now();
                entry.snapshot.send_modify(|snapshot| {
                    snapshot.data = Some(value);
                    snapshot.error = None;
                    snapshot.is_stale = false;
                    snapshot.is_fetching = false;
                    snapshot.is_loading = false;
                    snapshot.updated_at = Some(now);
                });
            },
            Err(error) => {
                metrics::counter!("cache.fetch.failed").increment(1);
                tracing::debug!(%key, %error, "fetch failed");
                // Last-known-good data survives; only the error changes.
                entry.snapshot.send_modify(|snapshot| {
                    snapshot.error = Some(error);
                    snapshot.is_fetching = false;
                    snapshot.is_loading = false;
                });
            },
        }
    }
}

/// A live subscription to one cache key.
///
/// Dropping the subscription releases the entry's subscriber count;
/// in-flight fetches are not cancelled (their results still populate the
/// cache for future subscribers).
pub struct Subscription {
    key: QueryKey,
    receiver: watch::Receiver<QuerySnapshot>,
    inner: Arc<Inner>,
}

impl Subscription {
    /// The key this subscription observes.
    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }

    /// The current snapshot.
    #[must_use]
    pub fn current(&self) -> QuerySnapshot {
        self.receiver.borrow().clone()
    }

    /// Deserialize the current cached value, when present.
    ///
    /// # Errors
    ///
    /// [`ApiError::ParseFailed`] when the cached JSON does not match `T`.
    pub fn data_as<T: serde::de::DeserializeOwned>(&self) -> Result<Option<T>, ApiError> {
        self.current().data_as()
    }

    /// Wait until the snapshot satisfies the predicate.
    ///
    /// Checks the current snapshot first, then each change. Returns
    /// `None` if the entry was dropped.
    pub async fn wait_for<F>(&mut self, predicate: F) -> Option<QuerySnapshot>
    where
        F: FnMut(&QuerySnapshot) -> bool,
    {
        self.receiver
            .wait_for(predicate)
            .await
            .ok()
            .map(|snapshot| snapshot.clone())
    }

    /// Wait for the next snapshot change.
    ///
    /// Returns `false` if the entry was dropped.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Ok(mut entries) = self.inner.entries.lock() {
            if let Some(entry) = entries.get_mut(&self.key) {
                entry.subscribers = entry.subscribers.saturating_sub(1);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// A fetch function that counts calls and serves from a queue of
    /// canned results, falling back to the last one.
    fn counting_fetcher(
        results: Vec<Result<serde_json::Value, ApiError>>,
    ) -> (FetchFn, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let results = Arc::new(results);

        let fetch: FetchFn = Arc::new(move || {
            let index = counter.fetch_add(1, Ordering::SeqCst);
            let results = Arc::clone(&results);
            Box::pin(async move {
                results
                    .get(index)
                    .or_else(|| results.last())
                    .cloned()
                    .unwrap_or_else(|| Err(ApiError::RequestFailed("no result".to_string())))
            })
        });

        (fetch, calls)
    }

    /// A fetch function gated on a oneshot-like notifier so tests can
    /// hold a request in flight.
    fn gated_fetcher(
        value: serde_json::Value,
    ) -> (FetchFn, Arc<tokio::sync::Notify>, Arc<AtomicUsize>) {
        let gate = Arc::new(tokio::sync::Notify::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let fetch_gate = Arc::clone(&gate);
        let fetch_calls = Arc::clone(&calls);

        let fetch: FetchFn = Arc::new(move || {
            fetch_calls.fetch_add(1, Ordering::SeqCst);
            let gate = Arc::clone(&fetch_gate);
            let value = value.clone();
            Box::pin(async move {
                gate.notified().await;
                Ok(value)
            })
        });

        (fetch, gate, calls)
    }

    #[tokio::test]
    async fn first_query_fetches_and_populates() {
        let cache = QueryClient::new();
        let (fetch, calls) = counting_fetcher(vec![Ok(json!([1, 2]))]);

        let mut subscription = cache.query(QueryKey::new("investments"), fetch);
        assert!(subscription.current().is_loading);

        let snapshot = subscription
            .wait_for(|s| s.has_data())
            .await
            .expect("entry alive");

        assert_eq!(snapshot.data, Some(json!([1, 2])));
        assert!(!snapshot.is_loading);
        assert!(snapshot.updated_at.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_queries_share_one_request() {
        let cache = QueryClient::new();
        let (fetch, gate, calls) = gated_fetcher(json!({"ok": true}));

        let key = QueryKey::new("investments");
        // Both subscriptions land before the held request resolves.
        let mut first = cache.query(key.clone(), Arc::clone(&fetch));
        let mut second = cache.query(key, fetch);

        // notify_one stores a permit, so the order of task startup and
        // notification does not matter.
        gate.notify_one();

        let a = first.wait_for(QuerySnapshot::has_data).await.unwrap();
        let b = second.wait_for(QuerySnapshot::has_data).await.unwrap();

        assert_eq!(a.data, b.data);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_refetches_subscribed_keys() {
        let cache = QueryClient::new();
        let (fetch, calls) = counting_fetcher(vec![
            Ok(json!([{"id": 1}, {"id": 2}])),
            Ok(json!([{"id": 2}])),
        ]);

        let key = QueryKey::new("pending-kyc");
        let mut subscription = cache.query(key.clone(), fetch);
        subscription.wait_for(QuerySnapshot::has_data).await.unwrap();

        let outcome = cache
            .mutate(async { Ok::<_, ApiError>(()) }, &[key])
            .await;
        assert!(outcome.is_ok());

        let snapshot = subscription
            .wait_for(|s| s.data == Some(json!([{"id": 2}])))
            .await
            .expect("refetched list");
        assert!(!snapshot.is_stale);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_mutation_invalidates_nothing() {
        let cache = QueryClient::new();
        let (fetch, calls) = counting_fetcher(vec![Ok(json!([1]))]);

        let key = QueryKey::new("pending-kyc");
        let mut subscription = cache.query(key.clone(), fetch);
        subscription.wait_for(QuerySnapshot::has_data).await.unwrap();

        let outcome: Result<(), ApiError> = cache
            .mutate(
                async { Err(ApiError::Validation(Default::default())) },
                &[key.clone()],
            )
            .await;
        assert!(outcome.is_err());

        // No speculative update, no re-fetch, data untouched.
        tokio::time::sleep(Duration::from_millis(20)).await;
        let snapshot = cache.snapshot(&key).unwrap();
        assert!(!snapshot.is_stale);
        assert_eq!(snapshot.data, Some(json!([1])));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unsubscribed_keys_refetch_lazily() {
        let cache = QueryClient::new();
        let (fetch, calls) = counting_fetcher(vec![Ok(json!(1)), Ok(json!(2))]);

        let key = QueryKey::new("platform-statistics");
        {
            let mut subscription = cache.query(key.clone(), Arc::clone(&fetch));
            subscription.wait_for(QuerySnapshot::has_data).await.unwrap();
        }

        // Unsubscribed: invalidation marks stale without fetching.
        cache.invalidate(std::slice::from_ref(&key));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.snapshot(&key).unwrap().is_stale);

        // Next subscription sees the stale flag and re-fetches.
        let mut subscription = cache.query(key, fetch);
        let snapshot = subscription
            .wait_for(|s| s.data == Some(json!(2)))
            .await
            .unwrap();
        assert!(!snapshot.is_stale);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_refetch_preserves_last_known_good() {
        let cache = QueryClient::new();
        let (fetch, _calls) = counting_fetcher(vec![
            Ok(json!([1, 2, 3])),
            Err(ApiError::RequestFailed("connection reset".to_string())),
        ]);

        let key = QueryKey::new("investments");
        let mut subscription = cache.query(key.clone(), fetch);
        subscription.wait_for(QuerySnapshot::has_data).await.unwrap();

        cache.invalidate(std::slice::from_ref(&key));
        let snapshot = subscription
            .wait_for(|s| s.error.is_some())
            .await
            .expect("error surfaced");

        // Data survives the failure; the error rides alongside it.
        assert_eq!(snapshot.data, Some(json!([1, 2, 3])));
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn very_first_fetch_failure_has_no_data() {
        let cache = QueryClient::new();
        let (fetch, _calls) =
            counting_fetcher(vec![Err(ApiError::RequestFailed("offline".to_string()))]);

        let mut subscription = cache.query(QueryKey::new("projects"), fetch);
        let snapshot = subscription
            .wait_for(|s| s.error.is_some())
            .await
            .unwrap();

        assert!(snapshot.data.is_none());
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn gc_drops_only_unreferenced_entries() {
        let cache = QueryClient::new();
        let (fetch, _calls) = counting_fetcher(vec![Ok(json!(1))]);

        let kept = cache.query(QueryKey::new("kept"), Arc::clone(&fetch));
        {
            let mut dropped = cache.query(QueryKey::new("dropped"), fetch);
            dropped.wait_for(QuerySnapshot::has_data).await.unwrap();
        }
        assert_eq!(cache.len(), 2);

        cache.gc();

        assert_eq!(cache.len(), 1);
        assert!(cache.snapshot(kept.key()).is_some());
    }
}
