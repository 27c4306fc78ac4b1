//! Key-prefixing adapter.

use super::{KeyValueStore, SharedStore, StorageError};

/// Wraps a shared store and prefixes every key with a scope.
///
/// The server gives each shopper a `ScopedStore` over one backend, so
/// `cart` for shopper `a1b2` is stored as `a1b2:cart`.
#[derive(Clone)]
pub struct ScopedStore {
    inner: SharedStore,
    scope: String,
}

impl ScopedStore {
    /// Create a store whose keys live under `scope`.
    #[must_use]
    pub fn new(inner: SharedStore, scope: impl Into<String>) -> Self {
        Self {
            inner,
            scope: scope.into(),
        }
    }

    fn scoped_key(&self, key: &str) -> String {
        format!("{}:{key}", self.scope)
    }
}

impl std::fmt::Debug for ScopedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedStore")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl KeyValueStore for ScopedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(&self.scoped_key(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(&self.scoped_key(key), value)
    }
}
