//! Easy Buy backend API client.
//!
//! # Architecture
//!
//! - Hand-written `reqwest` client with typed serde payloads; the backend is
//!   source of truth - no local sync, direct API calls
//! - Bearer token read from the shared [`SessionHandle`] and attached to
//!   every outgoing request automatically
//! - A 401 on *any* call clears the session before the error surfaces, so
//!   individual screens never implement their own 401 handling
//! - Product and category reads cached in-memory via `moka` (5-minute TTL);
//!   admin mutations invalidate
//! - No retries anywhere: every failure surfaces exactly once
//!
//! # Example
//!
//! ```rust,ignore
//! use easybuy_storefront::{ApiClient, ClientConfig, SessionHandle};
//!
//! let client = ApiClient::new(&config, session.clone())?;
//!
//! let products = client.list_products().await?;
//! let product = client.get_product(products[0].id).await?;
//! ```

mod auth;
mod catalog;
pub mod types;
mod uploads;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionHandle;

use catalog::CacheValue;

/// Catalog cache time-to-live.
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Maximum cached catalog entries.
const CACHE_CAPACITY: u64 = 1000;

/// Client for the Easy Buy backend API.
///
/// Cheap to clone; all clones share one connection pool, one cache, and one
/// session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: SessionHandle) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_owned(),
                session,
                cache,
            }),
        })
    }

    /// The session this client attaches tokens from and clears on 401.
    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.inner.session
    }

    /// Start a request to `path`, bearer token attached when present.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, path);
        let builder = self.inner.http.request(method, url);
        match self.inner.session.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Execute a request and parse the JSON response body.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.execute_raw(request).await?;
        serde_json::from_str(&body).map_err(ApiError::Decode)
    }

    /// Execute a request, discarding the response body (DELETE endpoints
    /// answer 204 with nothing to parse).
    async fn execute_unit(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.execute_raw(request).await.map(drop)
    }

    async fn execute_raw(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Central 401 policy: whichever call notices first tears the
        // session down; the caller sees Unauthorized and the routing layer
        // does the rest
        if status == StatusCode::UNAUTHORIZED {
            warn!("backend returned 401, clearing session");
            self.inner.session.clear();
            return Err(ApiError::Unauthorized);
        }

        let text = response.text().await?;

        if status.is_server_error() {
            return Err(ApiError::Server {
                status: status.as_u16(),
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(truncate_body(&text)));
        }
        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: truncate_body(&text),
            });
        }

        Ok(text)
    }

    async fn cache_get(&self, key: &str) -> Option<CacheValue> {
        self.inner.cache.get(key).await
    }

    async fn cache_put(&self, key: String, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }

    async fn cache_invalidate(&self, key: &str) {
        self.inner.cache.invalidate(key).await;
    }
}

/// Keep error payloads loggable without dumping whole HTML error pages.
fn truncate_body(body: &str) -> String {
    body.chars().take(200).collect()
}
