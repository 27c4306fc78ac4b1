//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{LatencyConfig, StorefrontConfig};
use crate::session::SessionRegistry;
use crate::storage::{FileStore, MemoryStore, SharedStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like shopper sessions and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    sessions: SessionRegistry,
}

impl AppState {
    /// Create application state, persisting shopper data to the configured
    /// data directory or to memory when none is set.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let backend: SharedStore = match &config.data_dir {
            Some(dir) => {
                tracing::info!(data_dir = %dir.display(), "Persisting shopper data to disk");
                Arc::new(FileStore::new(dir))
            }
            None => {
                tracing::info!("Persisting shopper data in memory");
                Arc::new(MemoryStore::new())
            }
        };
        Self::with_store(config, backend)
    }

    /// Create application state over an explicit storage backend.
    #[must_use]
    pub fn with_store(config: StorefrontConfig, backend: SharedStore) -> Self {
        let sessions = SessionRegistry::new(backend, config.session_idle);
        Self {
            inner: Arc::new(AppStateInner { config, sessions }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Simulated latency settings.
    #[must_use]
    pub fn latency(&self) -> LatencyConfig {
        self.inner.config.latency
    }

    /// Get the live shopper session registry.
    #[must_use]
    pub fn sessions(&self) -> &SessionRegistry {
        &self.inner.sessions
    }
}
