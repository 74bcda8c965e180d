//! The application-shell context.
//!
//! One [`StoreContext`] is constructed at startup and handed to every view
//! by reference. It replaces the module-level singletons of the browser
//! build: lifecycle is explicit (`init` restores and verifies; teardown is
//! just drop) and nothing else in the application owns state.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::api::ApiClient;
use crate::cart::CartStore;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::routing::RoutePolicy;
use crate::session::{SessionHandle, SessionManager};
use crate::storage::{FileStorage, MemoryStorage, Storage, StorageError};

/// Errors that can occur while building the context.
#[derive(Debug, Error)]
pub enum InitError {
    /// The persistent state file could not be opened.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The API client could not be constructed.
    #[error("api error: {0}")]
    Api(#[from] ApiError),
}

/// Owns the session, cart, API client, and routing policy for one
/// application instance.
pub struct StoreContext {
    session: SessionHandle,
    manager: SessionManager,
    cart: CartStore,
    api: ApiClient,
    policy: RoutePolicy,
}

impl StoreContext {
    /// Build the context: open storage, restore persisted state, and verify
    /// any stored session against the backend (bounded at five seconds).
    ///
    /// When this returns, the session has resolved to authenticated or
    /// anonymous - views never observe a stale "logged in" state.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be opened or the HTTP client
    /// cannot be built. Verification failures are not errors; they resolve
    /// to an anonymous session.
    pub async fn init(config: ClientConfig) -> Result<Self, InitError> {
        let storage: Arc<dyn Storage> = match &config.storage_path {
            Some(path) => Arc::new(FileStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };

        Self::init_with_storage(config, storage).await
    }

    /// As [`Self::init`], over caller-supplied storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub async fn init_with_storage(
        config: ClientConfig,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, InitError> {
        let session = SessionHandle::new(storage.clone());
        let api = ApiClient::new(&config, session.clone())?;
        let manager = SessionManager::new(api.clone(), session.clone());

        match manager.verify_session().await {
            Some(user) => info!(user = %user.email, "session restored"),
            None => info!("starting anonymous"),
        }

        let cart = CartStore::load(storage);

        Ok(Self {
            session,
            manager,
            cart,
            api,
            policy: RoutePolicy::new(),
        })
    }

    /// The shared session state.
    #[must_use]
    pub const fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Login, register, logout, and verification operations.
    #[must_use]
    pub const fn auth(&self) -> &SessionManager {
        &self.manager
    }

    /// The visitor's cart.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// The backend API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The navigation policy.
    #[must_use]
    pub const fn routing(&self) -> &RoutePolicy {
        &self.policy
    }
}
