//! Integration tests for the Easy Buy client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p easybuy-integration-tests
//! ```
//!
//! Tests run against a `wiremock` stub of the Easy Buy backend - no real
//! server or network access is needed.
//!
//! # Test Categories
//!
//! - `session_flow` - Login, register, logout, and startup verification
//! - `cart_flow` - Cart persistence across restarts and session loss
//! - `api_client` - Endpoint paths, bearer auth, caching, and error mapping

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::{Arc, Once};

use serde_json::{Value, json};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use easybuy_storefront::storage::MemoryStorage;
use easybuy_storefront::{ClientConfig, Storage, StoreContext};

/// A stubbed Easy Buy backend plus the plumbing to build contexts against it.
pub struct TestBackend {
    /// The underlying mock server; tests mount additional expectations here.
    pub server: MockServer,
}

static TRACING: Once = Once::new();

/// Install a tracing subscriber once per test binary.
///
/// Silent unless `RUST_LOG` asks for output.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

impl TestBackend {
    /// Start a fresh stub backend.
    pub async fn start() -> Self {
        init_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    /// Client configuration pointing at the stub.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a valid URL (it always is).
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.server.uri().parse().unwrap())
    }

    /// Build a context over fresh in-memory storage.
    ///
    /// # Panics
    ///
    /// Panics if context construction fails.
    pub async fn context(&self) -> StoreContext {
        self.context_with_storage(Arc::new(MemoryStorage::new()))
            .await
    }

    /// Build a context over caller-supplied storage, e.g. to simulate an
    /// application restart against the same persisted state.
    ///
    /// # Panics
    ///
    /// Panics if context construction fails.
    #[allow(clippy::unwrap_used)]
    pub async fn context_with_storage(&self, storage: Arc<dyn Storage>) -> StoreContext {
        StoreContext::init_with_storage(self.config(), storage)
            .await
            .unwrap()
    }

    /// A wire-format user record with the given role string.
    #[must_use]
    pub fn user_json(role: &str) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "name": "Test Shopper",
            "email": "shopper@example.com",
            "role": role,
        })
    }

    /// Mount a successful `POST /api/auth/login`.
    pub async fn mount_login_success(&self, token: &str, role: &str) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": token,
                "user": Self::user_json(role),
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a `GET /api/auth/verify` that accepts any token.
    pub async fn mount_verify_ok(&self, role: &str) {
        Mock::given(method("GET"))
            .and(path("/api/auth/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::user_json(role)))
            .mount(&self.server)
            .await;
    }

    /// Mount a `GET /api/auth/verify` that rejects every token.
    pub async fn mount_verify_rejection(&self) {
        Mock::given(method("GET"))
            .and(path("/api/auth/verify"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&self.server)
            .await;
    }

    /// A wire-format product record.
    #[must_use]
    pub fn product_json(id: Uuid, name: &str, price: f64) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": "A test product",
            "price": price,
            "stock_quantity": 10,
        })
    }
}
