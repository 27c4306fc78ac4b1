//! Recent search queries.

use crate::storage::{self, SharedStore, StorageError, keys};

/// Number of recent queries kept per shopper.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// A shopper's recent queries, newest first, without duplicates.
pub struct RecentSearches {
    queries: Vec<String>,
    store: SharedStore,
}

impl std::fmt::Debug for RecentSearches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentSearches")
            .field("queries", &self.queries)
            .finish_non_exhaustive()
    }
}

impl RecentSearches {
    /// Restore from the `recentSearches` key.
    #[must_use]
    pub fn load(store: SharedStore) -> Self {
        let mut queries: Vec<String> = storage::load_or_default(&*store, keys::RECENT_SEARCHES);
        queries.truncate(MAX_RECENT_SEARCHES);
        Self { queries, store }
    }

    /// Move `query` to the front, dropping any earlier copy, and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the list could not be written.
    pub fn record(&mut self, query: &str) -> Result<(), StorageError> {
        self.queries.retain(|existing| existing != query);
        self.queries.insert(0, query.to_owned());
        self.queries.truncate(MAX_RECENT_SEARCHES);
        self.persist()
    }

    /// Forget every recent query.
    ///
    /// # Errors
    ///
    /// Returns an error if the list could not be written.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.queries.clear();
        self.persist()
    }

    /// Queries, newest first.
    #[must_use]
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    fn persist(&self) -> Result<(), StorageError> {
        storage::save(&*self.store, keys::RECENT_SEARCHES, &self.queries).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to persist recent searches");
        })
    }
}
