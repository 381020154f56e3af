//! HTTP transport layer.
//!
//! A transport performs exactly one HTTP exchange. It attaches whatever
//! bearer the request carries and nothing else: authentication decisions,
//! token refresh and retries belong to [`crate::api::Api`]. Keeping the
//! refresh-once guarantee out of the transport makes it auditable as a
//! single explicit state check per request.

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};

/// HTTP method subset used by the platform API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

/// One part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartValue {
    /// Plain text field.
    Text(String),
    /// File field with owned bytes.
    ///
    /// Bytes are owned so the form can be rebuilt when the request is
    /// replayed after a token refresh.
    File {
        /// Original file name.
        filename: String,
        /// MIME type (e.g. `image/jpeg`).
        content_type: String,
        /// File contents.
        bytes: Vec<u8>,
    },
}

/// A rebuildable multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<(String, MultipartValue)>,
}

impl MultipartForm {
    /// Create an empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts
            .push((name.into(), MultipartValue::Text(value.into())));
        self
    }

    /// Add a file field.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push((
            name.into(),
            MultipartValue::File {
                filename: filename.into(),
                content_type: content_type.into(),
                bytes,
            },
        ));
        self
    }

    /// The fields added so far.
    #[must_use]
    pub fn parts(&self) -> &[(String, MultipartValue)] {
        &self.parts
    }
}

/// A single API request, independent of any HTTP library.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the configured base URL (e.g. `/auth/login/`).
    pub path: String,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// JSON body, when present.
    pub body: Option<serde_json::Value>,
    /// Multipart body, when present (mutually exclusive with `body`).
    pub multipart: Option<MultipartForm>,
    /// Bearer token to attach, when present.
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// Create a request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            multipart: None,
            bearer: None,
        }
    }

    /// GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    /// DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a multipart form.
    #[must_use]
    pub fn with_multipart(mut self, form: MultipartForm) -> Self {
        self.multipart = Some(form);
        self
    }

    /// Add a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set (or clear) the bearer token.
    #[must_use]
    pub fn with_bearer(mut self, bearer: Option<String>) -> Self {
        self.bearer = bearer;
        self
    }
}

/// A completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body; `Null` for empty bodies, a JSON string for
    /// non-JSON bodies.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// One HTTP exchange.
///
/// Implementations perform no retry, refresh or authentication logic;
/// a non-2xx status is a successful exchange, not an `Err`.
pub trait HttpTransport: Send + Sync {
    /// Execute the request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RequestFailed`] when the exchange never
    /// completes (connect, TLS, timeout).
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse>> + Send;
}

impl<T: HttpTransport + Sync> HttpTransport for std::sync::Arc<T> {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse>> + Send {
        (**self).execute(request)
    }
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RequestFailed`] if the underlying HTTP client
    /// cannot be constructed (TLS backend initialization).
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn build_form(form: MultipartForm) -> Result<reqwest::multipart::Form> {
        let mut built = reqwest::multipart::Form::new();
        for (name, value) in form.parts {
            built = match value {
                MultipartValue::Text(text) => built.text(name, text),
                MultipartValue::File {
                    filename,
                    content_type,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes)
                        .file_name(filename)
                        .mime_str(&content_type)
                        .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
                    built.part(name, part)
                },
            };
        }
        Ok(built)
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse>> + Send {
        let client = self.client.clone();
        let url = format!("{}{}", self.base_url, request.path);

        async move {
            tracing::debug!(method = ?request.method, path = %request.path, "api request");

            let mut builder = match request.method {
                Method::Get => client.get(&url),
                Method::Post => client.post(&url),
                Method::Patch => client.patch(&url),
                Method::Delete => client.delete(&url),
            };

            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if let Some(bearer) = request.bearer {
                builder = builder.bearer_auth(bearer);
            }
            if let Some(body) = request.body {
                builder = builder.json(&body);
            }
            if let Some(form) = request.multipart {
                builder = builder.multipart(Self::build_form(form)?);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

            let body = if text.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
            };

            tracing::debug!(status, "api response");
            Ok(HttpResponse { status, body })
        }
    }
}
