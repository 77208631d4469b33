//! Page navigation endpoints.
//!
//! `GET /app/<path>` runs a client navigation to `/<path>`. Allowed
//! navigations answer 200 with the rendered view; redirected ones answer
//! 303 pointing at the login page, with the login view as the body.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};

use crate::router::NavigationOutcome;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Mount point of client paths on the HTTP surface.
pub const APP_PREFIX: &str = "/app";

/// Registers page navigation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(APP_PREFIX, get(navigate_root))
        .route(&format!("{}/*path", APP_PREFIX), get(navigate))
}

async fn navigate_root(State(state): State<AppState>) -> Result<Response, HTTPError> {
    render_navigation(&state, "/").await
}

async fn navigate(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, HTTPError> {
    render_navigation(&state, &format!("/{}", path)).await
}

async fn render_navigation(state: &AppState, path: &str) -> Result<Response, HTTPError> {
    let outcome = state.app.router.navigate(path).await?;
    let response = match &outcome {
        NavigationOutcome::Allowed { .. } => (StatusCode::OK, Json(&outcome)).into_response(),
        NavigationOutcome::Redirected { view, .. } => {
            let location = format!("{}{}", APP_PREFIX, view.path);
            (
                StatusCode::SEE_OTHER,
                [(header::LOCATION, location)],
                Json(&outcome),
            )
                .into_response()
        }
        NavigationOutcome::Aborted { path } => {
            return Err(HTTPError::new(
                StatusCode::CONFLICT,
                format!("navigation to '{}' was superseded", path),
            ))
        }
    };
    Ok(response)
}
