//! Sign-in, sign-out and current-user endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Registers authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// Signs in with email and password.
///
/// The store is updated directly as well as through the auth listener, so a
/// follow-up `/auth/me` sees the user immediately.
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, HTTPError> {
    let session = state
        .app
        .provider
        .sign_in_with_password(&request.email, &request.password)
        .await?;
    state.app.user_store.set_user(session.user.clone());
    info!("User '{}' signed in", session.user.id);
    Ok(Json(json!({
        "user": session.user,
        "expires_at": session.expires_at,
    })))
}

async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, HTTPError> {
    state.app.provider.sign_out().await?;
    state.app.user_store.clear_user();
    Ok(StatusCode::NO_CONTENT)
}

async fn me(State(state): State<AppState>) -> Json<Value> {
    let store = &state.app.user_store;
    Json(json!({
        "email": store.email(),
        "user": store.user(),
    }))
}
