//! # Ladrillo Runtime
//!
//! Runtime implementation for the Ladrillo client architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Action Broadcast**: Lets callers observe the actions effects produce
//!
//! ## Example
//!
//! ```ignore
//! use ladrillo_runtime::Store;
//! use ladrillo_core::Reducer;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field.clone()).await;
//! ```

use ladrillo_core::{effect::Effect, reducer::Reducer};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};

pub use error::StoreError;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// The action broadcast channel was closed, typically because the
        /// store is shutting down.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

/// The Store runtime
///
/// Owns the state, runs the reducer, and executes effects.
///
/// # Architecture
///
/// ```text
/// Action → Reducer (holds write lock) → Effects → spawned tasks → more Actions
/// ```
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
///
/// # Example
///
/// ```ignore
/// let store = Store::new(
///     SessionState::default(),
///     SessionReducer,
///     production_environment(),
/// );
///
/// store.send(SessionAction::FetchUser { correlation_id }).await?;
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: Arc<R>,
    environment: Arc<E>,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
    /// Action broadcast channel for observing actions flowing through the
    /// reducer.
    ///
    /// Every reduced action is broadcast after the reducer has updated
    /// state, so an observer that receives an action sees the state that
    /// action produced. This enables request-response patterns via
    /// [`Store::send_and_wait_for`].
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Creates a Store with the default action broadcast capacity of 16
    /// (increase with [`Store::with_broadcast_capacity`] if observers lag).
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Create a new Store with custom action broadcast capacity
    ///
    /// # Arguments
    ///
    /// - `initial_state`: The starting state for the store
    /// - `reducer`: The reducer implementation (business logic)
    /// - `environment`: Injected dependencies
    /// - `capacity`: Action broadcast channel capacity (number of actions buffered)
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer: Arc::new(reducer),
            environment: Arc::new(environment),
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
            action_broadcast,
        }
    }

    /// Send an action to the store
    ///
    /// This is the primary way to interact with the store:
    /// 1. Acquires write lock on state
    /// 2. Calls reducer with (state, action, environment)
    /// 3. Broadcasts the action to observers
    /// 4. Executes returned effects asynchronously
    ///
    /// # Concurrency and Effect Execution
    ///
    /// - The reducer executes synchronously while holding a write lock
    /// - Effects execute asynchronously in spawned tasks
    /// - `send()` returns after starting effect execution, not completion
    /// - Multiple concurrent `send()` calls serialize at the reducer level
    /// - Effects may complete in non-deterministic order
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    pub async fn send(&self, action: A) -> Result<(), StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            return Err(StoreError::ShutdownInProgress);
        }

        self.dispatch(action).await;
        Ok(())
    }

    /// Send an action and wait for a matching result action
    ///
    /// This method is designed for request-response patterns: subscribe to
    /// the action broadcast BEFORE sending (avoids race conditions), send
    /// the initial action, then wait for an action matching the predicate.
    ///
    /// # Arguments
    ///
    /// - `action`: The initial action to send
    /// - `predicate`: Function to test if an action is the terminal result
    /// - `timeout`: Maximum time to wait for matching action
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: Timeout expired before matching action received
    /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
    /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
    ///
    /// # Example
    ///
    /// ```ignore
    /// let result = store.send_and_wait_for(
    ///     SessionAction::Login { correlation_id, email, password },
    ///     |a| matches!(a,
    ///         SessionAction::ProfileLoaded { .. } |
    ///         SessionAction::LoginFailed { .. }
    ///     ),
    ///     Duration::from_secs(30),
    /// ).await?;
    /// ```
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        let mut receiver = self.action_broadcast.subscribe();
        self.send(action).await?;

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Err(StoreError::Timeout);
            }

            match tokio::time::timeout(remaining, receiver.recv()).await {
                Err(_) => return Err(StoreError::Timeout),
                Ok(Err(broadcast::error::RecvError::Closed)) => {
                    return Err(StoreError::ChannelClosed);
                },
                // Lagged observers skip missed actions; terminal actions for
                // in-flight requests are re-checked on the next receive.
                Ok(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                    tracing::warn!(skipped, "action observer lagged");
                },
                Ok(Ok(candidate)) => {
                    if predicate(&candidate) {
                        return Ok(candidate);
                    }
                },
            }
        }
    }

    /// Read a projection of the current state
    ///
    /// Takes a closure so the read lock is released before the value is
    /// returned.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let guard = self.state.read().await;
        f(&*guard)
    }

    /// Subscribe to the action broadcast
    ///
    /// Observers receive every action after its reduction, including
    /// actions produced by effects.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Number of effects currently executing
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.pending_effects.load(Ordering::Acquire)
    }

    /// Initiate graceful shutdown of the store
    ///
    /// Sets the shutdown flag (rejecting new actions), then waits for
    /// pending effects to complete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before
    /// all pending effects complete.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("initiating graceful shutdown");
        metrics::counter!("store.shutdown.initiated").increment(1);

        self.shutdown.store(true, Ordering::Release);

        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(100);

        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                metrics::counter!("store.shutdown.completed").increment(1);
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending_effects = pending, "shutdown timeout");
                metrics::counter!("store.shutdown.timeout").increment(1);
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Run an action through the reducer and start its effects.
    async fn dispatch(&self, action: A) {
        metrics::counter!("store.actions").increment(1);

        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut *state, action.clone(), &self.environment)
        };

        // Broadcast after reduction so observers read post-action state.
        let _ = self.action_broadcast.send(action);

        for effect in effects {
            self.spawn_effect(effect);
        }
    }

    fn spawn_effect(&self, effect: Effect<A>) {
        if matches!(effect, Effect::None) {
            return;
        }

        metrics::counter!("store.effects.spawned").increment(1);
        self.pending_effects.fetch_add(1, Ordering::AcqRel);

        let store = self.clone();
        let pending = Arc::clone(&self.pending_effects);
        tokio::spawn(async move {
            execute_effect(store, effect).await;
            pending.fetch_sub(1, Ordering::AcqRel);
        });
    }
}

/// Execute a single effect, feeding produced actions back into the store.
///
/// Boxed because `Parallel`/`Sequential` recurse.
fn execute_effect<S, A, E, R>(
    store: Store<S, A, E, R>,
    effect: Effect<A>,
) -> Pin<Box<dyn Future<Output = ()> + Send>>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => {},
            Effect::Future(fut) => {
                if let Some(action) = fut.await {
                    store.dispatch(action).await;
                }
            },
            Effect::Delay { duration, action } => {
                tokio::time::sleep(duration).await;
                store.dispatch(*action).await;
            },
            Effect::Parallel(effects) => {
                let mut handles = Vec::with_capacity(effects.len());
                for nested in effects {
                    let store = store.clone();
                    handles.push(tokio::spawn(execute_effect(store, nested)));
                }
                for handle in handles {
                    if let Err(join_error) = handle.await {
                        tracing::error!(%join_error, "parallel effect task failed");
                    }
                }
            },
            Effect::Sequential(effects) => {
                for nested in effects {
                    execute_effect(store.clone(), nested).await;
                }
            },
        }
    })
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: Arc::clone(&self.reducer),
            environment: Arc::clone(&self.environment),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use ladrillo_core::smallvec;

    #[derive(Clone, Debug, Default)]
    struct CounterState {
        count: i32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum CounterAction {
        Increment,
        IncrementAsync,
        Incremented,
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = CounterState;
        type Action = CounterAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> ladrillo_core::Effects<Self::Action> {
            match action {
                CounterAction::Increment => {
                    state.count += 1;
                    smallvec![]
                },
                CounterAction::IncrementAsync => {
                    smallvec![Effect::future(async { Some(CounterAction::Incremented) })]
                },
                CounterAction::Incremented => {
                    state.count += 1;
                    smallvec![]
                },
            }
        }
    }

    #[tokio::test]
    async fn send_reduces_synchronously() {
        let store = Store::new(CounterState::default(), CounterReducer, ());

        store.send(CounterAction::Increment).await.unwrap();

        let count = store.state(|s| s.count).await;
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn effects_feed_actions_back() {
        let store = Store::new(CounterState::default(), CounterReducer, ());

        let terminal = store
            .send_and_wait_for(
                CounterAction::IncrementAsync,
                |a| matches!(a, CounterAction::Incremented),
                Duration::from_secs(1),
            )
            .await
            .unwrap();

        assert_eq!(terminal, CounterAction::Incremented);
        assert_eq!(store.state(|s| s.count).await, 1);
    }

    #[tokio::test]
    async fn send_and_wait_for_times_out() {
        let store = Store::new(CounterState::default(), CounterReducer, ());

        // Increment is terminal-free; the predicate never matches.
        let result = store
            .send_and_wait_for(
                CounterAction::Increment,
                |a| matches!(a, CounterAction::Incremented),
                Duration::from_millis(50),
            )
            .await;

        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() {
        let store = Store::new(CounterState::default(), CounterReducer, ());

        store.shutdown(Duration::from_secs(1)).await.unwrap();

        let result = store.send(CounterAction::Increment).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    }
}
