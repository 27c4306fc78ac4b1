//! Key-value persistence port.
//!
//! Everything a shopper accumulates (cart lines, quiz history, recent
//! searches) is written as a JSON document under a fixed key. The storefront
//! only needs `get` and `set`, so the backing store is a small trait with
//! three adapters:
//!
//! - [`MemoryStore`] - process memory; the default and what tests use
//! - [`FileStore`] - one JSON file per key under a data directory
//! - [`ScopedStore`] - prefixes keys so many shoppers share one backend
//!
//! Stored content is never trusted: [`load_or_default`] falls back to an
//! empty collection when a value is missing or cannot be parsed.

mod file;
mod memory;
mod scoped;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use scoped::ScopedStore;

/// Storage keys used by the storefront.
pub mod keys {
    /// Serialized list of cart lines.
    pub const CART: &str = "cart";
    /// Serialized list of quiz results, most recent first.
    pub const QUIZ_HISTORY: &str = "quizHistory";
    /// Serialized list of search queries, most recent first.
    pub const RECENT_SEARCHES: &str = "recentSearches";
}

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("Lock poisoned")]
    Poisoned,
}

/// A string key-value store.
///
/// Implementations must be safe to share between request handlers.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Shared handle to a type-erased store.
pub type SharedStore = Arc<dyn KeyValueStore>;

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Load and deserialize the JSON value under `key`.
///
/// Missing keys, unreadable backends, and malformed content all yield
/// `T::default()`. Anything other than a missing key is logged.
pub fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored value, using empty default");
            return T::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "Stored value is malformed, using empty default");
        T::default()
    })
}

/// Serialize `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns an error if serialization fails or the backend rejects the write.
pub fn save<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
