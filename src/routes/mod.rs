//! HTTP route definitions and handlers.
//!
//! The local HTTP surface lets a browser shell or CLI drive the client:
//! page navigation, sign-in/sign-out, and health checks.

mod auth_routes;
mod health_routes;
mod page_routes;

pub use page_routes::APP_PREFIX;

use crate::state::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Creates the application router with all configured routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(page_routes::routes())
        .merge(auth_routes::routes())
        .merge(health_routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
