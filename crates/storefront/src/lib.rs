//! Easy Buy Storefront client core.
//!
//! The state layer of the Easy Buy storefront: everything between the
//! presentation surfaces (product pages, cart page, admin console) and the
//! Easy Buy backend API. Screens hold a [`StoreContext`] and call into it;
//! they never own state of their own.
//!
//! # Architecture
//!
//! - [`session`] - Bearer-token session lifecycle: login, register, logout,
//!   startup verification
//! - [`cart`] - The visitor's line items with persisted add/update/remove
//! - [`api`] - Typed `reqwest` client for the backend REST API
//! - [`storage`] - Key-value persistence with optional expiry (the browser
//!   storage analog)
//! - [`routing`] - Role-gated navigation policy, kept outside the stores so
//!   the core stays UI-framework-agnostic
//!
//! # Example
//!
//! ```rust,ignore
//! use easybuy_storefront::{ClientConfig, StoreContext};
//!
//! let config = ClientConfig::from_env()?;
//! let ctx = StoreContext::init(config).await?;
//!
//! // Session restore + verification already ran; screens can render.
//! if let Some(user) = ctx.session().snapshot().user {
//!     println!("welcome back, {}", user.name);
//! }
//!
//! let products = ctx.api().list_products().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod context;
pub mod error;
pub mod routing;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use api::types::{
    AuthSuccess, Category, CategoryPatch, NewCategory, NewProduct, Product, ProductImage,
    ProductPatch,
};
pub use cart::{CartItem, CartStore};
pub use config::{ClientConfig, ConfigError};
pub use context::{InitError, StoreContext};
pub use error::ApiError;
pub use routing::{Destination, RouteDecision, RoutePolicy};
pub use session::{
    AuthApi, AuthPhase, CurrentUser, RegisterForm, SessionHandle, SessionManager, SessionSnapshot,
};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
