//! Application state management

use std::sync::Arc;

use crate::auth::ClientKeyTable;
use crate::render::HtmlRenderer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    client_keys: ClientKeyTable,
    renderer: Arc<dyn HtmlRenderer>,
}

impl AppState {
    /// Create the application state. The renderer is injected so tests can
    /// drive the routes with a scripted engine.
    pub fn new(client_keys: ClientKeyTable, renderer: Arc<dyn HtmlRenderer>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                client_keys,
                renderer,
            }),
        }
    }

    /// Get the client key table
    pub fn client_keys(&self) -> &ClientKeyTable {
        &self.inner.client_keys
    }

    /// Get the rendering engine
    pub fn renderer(&self) -> &dyn HtmlRenderer {
        self.inner.renderer.as_ref()
    }
}
