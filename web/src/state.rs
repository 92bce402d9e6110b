//! Application state for Axum handlers.

use std::sync::Arc;
use tabs_core::{StoreHealth, TabService};

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; both fields are reference-counted.
///
/// # Examples
///
/// ```ignore
/// let state = AppState::new(service, Arc::new(tab_store.clone()));
/// let app = build_router(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    /// Tab request handling
    pub service: TabService,
    /// Readiness probe for the backing store
    pub store_health: Arc<dyn StoreHealth>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(service: TabService, store_health: Arc<dyn StoreHealth>) -> Self {
        Self {
            service,
            store_health,
        }
    }
}
