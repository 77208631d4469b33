//! Shared application state.
//!
//! Contains the state that is shared across all request handlers.

use crate::app::App;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The composed client: provider, user store and router.
    pub app: Arc<App>,
}
