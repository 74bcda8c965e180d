//! Easy Buy Core - Shared types library.
//!
//! This crate provides common types used across all Easy Buy client
//! components:
//! - `storefront` - Session, cart, and backend API client
//! - `integration-tests` - End-to-end tests against a stubbed backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
