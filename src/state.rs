use std::sync::Arc;

use crate::store::SessionStore;

/// The application's state.
///
/// Holds only the derived session key (inside the store), never the raw
/// secret it came from.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The session store, shared read-only by every request.
    pub store: Arc<SessionStore>,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `store` - The session store built from the configuration.
    pub fn new(store: SessionStore) -> Self {
        tracing::info!("✅ Session store initialized: cookie={}", store.name());

        AppState {
            store: Arc::new(store),
        }
    }
}
