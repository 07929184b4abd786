//! Route modules for Imprenta Server

pub mod convert;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Assemble the full application router. Shared by the server binary and
/// the integration tests so both exercise the same surface.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api", convert::router())
        .with_state(state)
}
