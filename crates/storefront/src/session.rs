//! Per-shopper session state.
//!
//! Each visitor gets a [`ShopperSession`] bundling their cart, quiz progress,
//! quiz history, and recent searches, all backed by the same scoped store.
//! Sessions are created on first use and dropped from memory after a period
//! of inactivity; their persisted data survives and is restored the next
//! time the shopper shows up.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::cart::CartStore;
use crate::quiz::{QuizHistory, QuizWizard};
use crate::search::RecentSearches;
use crate::storage::{ScopedStore, SharedStore};

/// Everything the storefront tracks for one shopper.
#[derive(Debug)]
pub struct ShopperSession {
    pub cart: CartStore,
    pub quiz: QuizWizard,
    pub quiz_history: QuizHistory,
    pub recent_searches: RecentSearches,
}

impl ShopperSession {
    /// Restore a shopper's state from `store`.
    #[must_use]
    pub fn open(store: SharedStore) -> Self {
        Self {
            cart: CartStore::load(store.clone()),
            quiz: QuizWizard::new(),
            quiz_history: QuizHistory::load(store.clone()),
            recent_searches: RecentSearches::load(store),
        }
    }
}

/// Shared handle to one shopper's session.
///
/// Requests for the same shopper take the lock in turn, so operations on a
/// session never interleave.
pub type SessionHandle = Arc<Mutex<ShopperSession>>;

/// Live shopper sessions, keyed by shopper ID.
#[derive(Clone)]
pub struct SessionRegistry {
    backend: SharedStore,
    sessions: Cache<Uuid, SessionHandle>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("live_sessions", &self.sessions.entry_count())
            .finish_non_exhaustive()
    }
}

impl SessionRegistry {
    /// Create a registry whose sessions persist to `backend`.
    ///
    /// Sessions untouched for `idle` are evicted from memory. There is no
    /// size bound: a session in use must stay the only live copy for its
    /// shopper, or two copies would overwrite each other's writes.
    #[must_use]
    pub fn new(backend: SharedStore, idle: Duration) -> Self {
        let sessions = Cache::builder().time_to_idle(idle).build();

        Self { backend, sessions }
    }

    /// Get the session for `shopper_id`, restoring it from storage if it is
    /// not already live.
    pub async fn session(&self, shopper_id: Uuid) -> SessionHandle {
        self.sessions
            .get_with(shopper_id, async {
                tracing::debug!(%shopper_id, "Opening shopper session");
                let store = ScopedStore::new(self.backend.clone(), shopper_id.to_string());
                Arc::new(Mutex::new(ShopperSession::open(Arc::new(store))))
            })
            .await
    }

    /// Drop a live session from memory. Persisted data is kept.
    pub async fn end(&self, shopper_id: Uuid) {
        self.sessions.invalidate(&shopper_id).await;
        tracing::debug!(%shopper_id, "Shopper session ended");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dewdrop_core::{Price, ProductId};

    use super::*;
    use crate::cart::NewCartItem;
    use crate::storage::MemoryStore;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(MemoryStore::new()), Duration::from_secs(60))
    }

    fn serum() -> NewCartItem {
        NewCartItem {
            id: ProductId::new("2"),
            name: "Hydrating Serum".to_string(),
            image: "/products/serum.jpg".to_string(),
            category: "Skincare".to_string(),
            price: Price::from_cents(3999),
            discounted_price: None,
        }
    }

    #[tokio::test]
    async fn test_same_shopper_shares_session() {
        let registry = registry();
        let shopper = Uuid::new_v4();

        registry.session(shopper).await.lock().await.cart.add_item(serum()).unwrap();

        let session = registry.session(shopper).await;
        assert_eq!(session.lock().await.cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_shoppers_are_isolated() {
        let registry = registry();

        registry
            .session(Uuid::new_v4())
            .await
            .lock()
            .await
            .cart
            .add_item(serum())
            .unwrap();

        let other = registry.session(Uuid::new_v4()).await;
        assert!(other.lock().await.cart.is_empty());
    }

    #[tokio::test]
    async fn test_busy_registry_keeps_single_copy_per_shopper() {
        let registry = registry();
        let shopper = Uuid::new_v4();
        let held = registry.session(shopper).await;

        for _ in 0..500 {
            registry.session(Uuid::new_v4()).await;
        }
        registry.sessions.run_pending_tasks().await;

        let again = registry.session(shopper).await;
        assert!(Arc::ptr_eq(&held, &again));
    }

    #[tokio::test]
    async fn test_ended_session_restores_from_storage() {
        let registry = registry();
        let shopper = Uuid::new_v4();
        {
            let session = registry.session(shopper).await;
            let mut session = session.lock().await;
            session.cart.add_item(serum()).unwrap();
            session.cart.set_open(true);
            session.recent_searches.record("serum").unwrap();
        }

        registry.end(shopper).await;

        let session = registry.session(shopper).await;
        let session = session.lock().await;
        assert_eq!(session.cart.item_count(), 1);
        assert!(!session.cart.is_open());
        assert_eq!(session.recent_searches.queries(), &["serum"]);
    }
}
