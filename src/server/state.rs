//! Application state shared across all request handlers.
//!
//! The state is initialized once during startup and then cloned for each
//! request handler through Axum's state extraction. It holds the document
//! store, the API key registry and the cookie settings; there is no
//! process-wide global.

use std::sync::Arc;

use crate::server::{data::store::Store, model::api_key::ApiKeyRegistry};

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone: `Store` wraps a pooled connection and the
/// registry sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Document store holding every collection of the configured namespace.
    pub store: Store,

    /// API keys accepted on key-gated routes. Read-only after startup.
    pub api_keys: Arc<ApiKeyRegistry>,

    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `store` - Connected document store
    /// - `api_keys` - Registry built from configuration
    /// - `cookie_secure` - Add `Secure` to session cookies
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(store: Store, api_keys: ApiKeyRegistry, cookie_secure: bool) -> Self {
        Self {
            store,
            api_keys: Arc::new(api_keys),
            cookie_secure,
        }
    }
}
