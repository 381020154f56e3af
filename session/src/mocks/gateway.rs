//! Mock auth gateway for testing.

use crate::providers::AuthGateway;
use ladrillo_client::api::{ProfileUpdate, RegisterRequest, RegisterResponse};
use ladrillo_client::types::User;
use ladrillo_client::{ApiError, TokenPair};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

type Scripted<T> = VecDeque<Result<T, ApiError>>;

#[derive(Debug, Default)]
struct Inner {
    login_results: Scripted<TokenPair>,
    register_results: Scripted<RegisterResponse>,
    logout_results: Scripted<()>,
    profile_results: Scripted<User>,
    update_results: Scripted<User>,
    login_calls: usize,
    register_calls: usize,
    logout_calls: usize,
    profile_calls: usize,
    update_calls: usize,
}

/// Mock auth gateway.
///
/// Each operation pops its next scripted result; an unscripted call
/// fails with `ApiError::RequestFailed`, which keeps accidental network
/// dependencies loud in tests. Call counters verify how often each
/// endpoint was reached (or that it was never reached at all).
#[derive(Debug, Clone, Default)]
pub struct MockAuthGateway {
    inner: Arc<Mutex<Inner>>,
}

impl MockAuthGateway {
    /// Create a gateway with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a login result.
    pub fn queue_login(&self, result: Result<TokenPair, ApiError>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.login_results.push_back(result);
        }
    }

    /// Queue a register result.
    pub fn queue_register(&self, result: Result<RegisterResponse, ApiError>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.register_results.push_back(result);
        }
    }

    /// Queue a logout result.
    pub fn queue_logout(&self, result: Result<(), ApiError>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.logout_results.push_back(result);
        }
    }

    /// Queue a profile-fetch result.
    pub fn queue_profile(&self, result: Result<User, ApiError>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.profile_results.push_back(result);
        }
    }

    /// Queue a profile-update result.
    pub fn queue_update(&self, result: Result<User, ApiError>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.update_results.push_back(result);
        }
    }

    /// How many times `login` was called.
    #[must_use]
    pub fn login_calls(&self) -> usize {
        self.inner.lock().map(|inner| inner.login_calls).unwrap_or(0)
    }

    /// How many times `register` was called.
    #[must_use]
    pub fn register_calls(&self) -> usize {
        self.inner.lock().map(|inner| inner.register_calls).unwrap_or(0)
    }

    /// How many times `logout` was called.
    #[must_use]
    pub fn logout_calls(&self) -> usize {
        self.inner.lock().map(|inner| inner.logout_calls).unwrap_or(0)
    }

    /// How many times `fetch_profile` was called.
    #[must_use]
    pub fn profile_calls(&self) -> usize {
        self.inner.lock().map(|inner| inner.profile_calls).unwrap_or(0)
    }

    /// How many times `update_profile` was called.
    #[must_use]
    pub fn update_calls(&self) -> usize {
        self.inner.lock().map(|inner| inner.update_calls).unwrap_or(0)
    }

    fn unscripted<T>() -> Result<T, ApiError> {
        Err(ApiError::RequestFailed("unscripted mock call".to_string()))
    }
}

impl AuthGateway for MockAuthGateway {
    fn login(
        &self,
        _email: &str,
        _password: &str,
    ) -> impl Future<Output = Result<TokenPair, ApiError>> + Send {
        let result = self.inner.lock().map_or_else(
            |_| Self::unscripted(),
            |mut inner| {
                inner.login_calls += 1;
                inner.login_results.pop_front().unwrap_or_else(Self::unscripted)
            },
        );
        async move { result }
    }

    fn register(
        &self,
        _payload: &RegisterRequest,
    ) -> impl Future<Output = Result<RegisterResponse, ApiError>> + Send {
        let result = self.inner.lock().map_or_else(
            |_| Self::unscripted(),
            |mut inner| {
                inner.register_calls += 1;
                inner
                    .register_results
                    .pop_front()
                    .unwrap_or_else(Self::unscripted)
            },
        );
        async move { result }
    }

    fn logout(&self, _refresh: &str) -> impl Future<Output = Result<(), ApiError>> + Send {
        let result = self.inner.lock().map_or_else(
            |_| Self::unscripted(),
            |mut inner| {
                inner.logout_calls += 1;
                inner.logout_results.pop_front().unwrap_or_else(Self::unscripted)
            },
        );
        async move { result }
    }

    fn fetch_profile(&self) -> impl Future<Output = Result<User, ApiError>> + Send {
        let result = self.inner.lock().map_or_else(
            |_| Self::unscripted(),
            |mut inner| {
                inner.profile_calls += 1;
                inner.profile_results.pop_front().unwrap_or_else(Self::unscripted)
            },
        );
        async move { result }
    }

    fn update_profile(
        &self,
        _update: &ProfileUpdate,
    ) -> impl Future<Output = Result<User, ApiError>> + Send {
        let result = self.inner.lock().map_or_else(
            |_| Self::unscripted(),
            |mut inner| {
                inner.update_calls += 1;
                inner.update_results.pop_front().unwrap_or_else(Self::unscripted)
            },
        );
        async move { result }
    }
}
