//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::ServerConfig;
use crate::db::{FoodRepository, MemoryStore, PurchaseRepository};
use crate::services::auth::SessionKeys;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Repositories are held as
/// trait objects so the same router runs against MongoDB or the in-memory
/// store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    foods: Arc<dyn FoodRepository>,
    purchases: Arc<dyn PurchaseRepository>,
    sessions: SessionKeys,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration (the session secret is read from it)
    /// * `foods` - Food item repository
    /// * `purchases` - Purchase record repository
    #[must_use]
    pub fn new(
        config: ServerConfig,
        foods: Arc<dyn FoodRepository>,
        purchases: Arc<dyn PurchaseRepository>,
    ) -> Self {
        let sessions = SessionKeys::new(&config.session.secret);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                foods,
                purchases,
                sessions,
            }),
        }
    }

    /// State backed by a fresh, empty [`MemoryStore`].
    #[must_use]
    pub fn in_memory(config: ServerConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(config, store.clone(), store)
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get the food item repository.
    #[must_use]
    pub fn foods(&self) -> &dyn FoodRepository {
        self.inner.foods.as_ref()
    }

    /// Get the purchase record repository.
    #[must_use]
    pub fn purchases(&self) -> &dyn PurchaseRepository {
        self.inner.purchases.as_ref()
    }

    /// Get the session token keys.
    #[must_use]
    pub fn sessions(&self) -> &SessionKeys {
        &self.inner.sessions
    }

    /// Whether session cookies are marked `Secure`.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.inner.config.session.cookie_secure
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        state.inner.sessions.clone()
    }
}
