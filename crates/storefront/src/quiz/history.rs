//! Bounded quiz result history.

use tracing::instrument;

use super::QuizResult;
use crate::storage::{self, SharedStore, StorageError, keys};

/// Number of quiz results kept per shopper.
pub const MAX_QUIZ_HISTORY: usize = 5;

/// The shopper's most recent quiz results, newest first.
///
/// Results are never edited once recorded; the oldest is dropped when a
/// sixth arrives.
pub struct QuizHistory {
    results: Vec<QuizResult>,
    store: SharedStore,
}

impl std::fmt::Debug for QuizHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizHistory")
            .field("results", &self.results.len())
            .finish_non_exhaustive()
    }
}

impl QuizHistory {
    /// Restore history from the `quizHistory` key.
    #[must_use]
    pub fn load(store: SharedStore) -> Self {
        let mut results: Vec<QuizResult> = storage::load_or_default(&*store, keys::QUIZ_HISTORY);
        results.truncate(MAX_QUIZ_HISTORY);
        Self { results, store }
    }

    /// Prepend a result and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the history could not be written. The in-memory
    /// history is updated regardless.
    #[instrument(skip_all)]
    pub fn record(&mut self, result: QuizResult) -> Result<(), StorageError> {
        self.results.insert(0, result);
        self.results.truncate(MAX_QUIZ_HISTORY);

        storage::save(&*self.store, keys::QUIZ_HISTORY, &self.results).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to persist quiz history");
        })
    }

    /// All kept results, newest first.
    #[must_use]
    pub fn results(&self) -> &[QuizResult] {
        &self.results
    }

    /// The most recent result.
    #[must_use]
    pub fn latest(&self) -> Option<&QuizResult> {
        self.results.first()
    }

    /// Results before the most recent one, newest first.
    #[must_use]
    pub fn previous(&self) -> &[QuizResult] {
        self.results.get(1..).unwrap_or_default()
    }

    /// Number of kept results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if no quiz has been taken.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
