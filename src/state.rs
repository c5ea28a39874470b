//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::store::ApiKeyStore;

/// Cloned per request by axum; the store itself is shared.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ApiKeyStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ApiKeyStore>) -> Self {
        Self { store }
    }
}
