//! Key-value persistence with optional expiry.
//!
//! The browser-storage analog: session and cart state is written here so a
//! restart reconstructs identical state. Values are strings (callers
//! serialize with `serde_json`); each entry may carry a time-to-live, after
//! which it reads as absent.
//!
//! Mutations are single synchronous transitions, so the trait is synchronous;
//! nothing in this crate holds a storage lock across an await point.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when persisting state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document could not be serialized.
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A stored value with an optional absolute expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Entry {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    pub(crate) fn new(value: String, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|ttl| Utc::now() + ttl),
        }
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

/// Key-value persistence used by the session and cart stores.
///
/// `get` must treat expired entries as absent. `remove` on a missing key is
/// a no-op.
pub trait Storage: Send + Sync {
    /// Read a value, honoring expiry.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value with an optional time-to-live.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be persisted. Callers decide
    /// whether that is fatal; cart writes log and continue.
    fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), StorageError>;

    /// Remove a value. No-op when absent.
    fn remove(&self, key: &str);
}
