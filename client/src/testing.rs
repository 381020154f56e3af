//! Crate-internal test support.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use crate::api::Api;
use crate::error::{ApiError, Result};
use crate::tokens::{MemoryTokenStore, TokenPair, TokenStore};
use crate::transport::{ApiRequest, HttpResponse, HttpTransport};
use ladrillo_core::SystemClock;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted transport: pops one canned response per exchange and logs
/// every request it sees.
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: Vec<Result<HttpResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            log: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse>> + Send {
        self.log.lock().unwrap().push(request);
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::RequestFailed("script exhausted".to_string())));
        async move { next }
    }
}

pub(crate) fn response(status: u16, body: serde_json::Value) -> Result<HttpResponse> {
    Ok(HttpResponse { status, body })
}

/// An [`Api`] over a scripted transport with a token pair already persisted.
pub(crate) fn api_with_tokens(
    responses: Vec<Result<HttpResponse>>,
) -> (
    Api<Arc<ScriptedTransport>, MemoryTokenStore>,
    Arc<ScriptedTransport>,
) {
    let transport = Arc::new(ScriptedTransport::new(responses));
    let tokens = MemoryTokenStore::new(SystemClock);
    tokens.store_pair(&TokenPair {
        access: "stale-access".to_string(),
        refresh: "good-refresh".to_string(),
    });
    (Api::new(Arc::clone(&transport), tokens), transport)
}

/// An [`Api`] over a scripted transport with no persisted tokens.
pub(crate) fn api_without_tokens(
    responses: Vec<Result<HttpResponse>>,
) -> (
    Api<Arc<ScriptedTransport>, MemoryTokenStore>,
    Arc<ScriptedTransport>,
) {
    let transport = Arc::new(ScriptedTransport::new(responses));
    let api = Api::new(Arc::clone(&transport), MemoryTokenStore::new(SystemClock));
    (api, transport)
}
