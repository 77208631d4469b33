//! Client for a hosted, GoTrue-compatible auth service.
//!
//! The session itself lives in a [`SessionStorage`]; the service is only
//! contacted to sign in, refresh an expired token, look up the user and
//! revoke the token on sign-out.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::events::{AuthEvent, AuthEvents, AuthSubscription};
use super::provider::SessionProvider;
use super::storage::{create_storage, SessionStorage, StorageConfig};
use crate::error::SessionError;
use crate::models::{Session, User};

fn default_timeout_in_ms() -> u64 {
    10_000
}

/// The config needed to reach the hosted auth service.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct HostedProviderConfig {
    pub name: String,
    /// Project base URL, e.g. `https://xyz.example.co`.
    pub url: String,
    /// Public (anon) API key sent as the `apikey` header.
    pub anon_key: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
    #[serde(default)]
    pub storage: StorageConfig,
}

pub struct HostedSessionProvider {
    config: HostedProviderConfig,
    client: reqwest::Client,
    storage: Arc<dyn SessionStorage>,
    events: AuthEvents,
    /// Held while an expired session is being refreshed, so a refresh
    /// token is only ever spent once.
    refresh_lock: Mutex<()>,
}

impl HostedSessionProvider {
    pub fn new(config: &HostedProviderConfig) -> Result<Self, SessionError> {
        let storage = create_storage(&config.storage);
        Self::with_storage(config, storage)
    }

    pub fn with_storage(
        config: &HostedProviderConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> Result<Self, SessionError> {
        info!(
            "Creating hosted session provider '{}' for {}",
            config.name, config.url
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_in_ms))
            .build()?;
        Ok(Self {
            config: config.clone(),
            client,
            storage,
            events: AuthEvents::new(),
            refresh_lock: Mutex::new(()),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.url.trim_end_matches('/'), path)
    }

    /// Exchange a grant for a new session at the token endpoint.
    async fn request_session(&self, grant_type: &str, body: Value) -> Result<Session, SessionError> {
        let url = self.endpoint("token");
        debug!("Requesting session from {} (grant_type={})", url, grant_type);
        let response = self
            .client
            .post(&url)
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.config.anon_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }
        let body = response.text().await?;
        let session: Session = serde_json::from_str(&body)?;
        Ok(session.with_computed_expiry())
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, SessionError> {
        let session = self
            .request_session("refresh_token", json!({ "refresh_token": refresh_token }))
            .await?;
        self.storage.save(&session).await?;
        info!(
            event_name = "session.token_refreshed",
            event_domain = "session",
            provider_name = self.config.name.as_str(),
            "session refreshed"
        );
        self.events
            .emit(AuthEvent::TokenRefreshed, Some(session.clone()));
        Ok(session)
    }

    /// Forget the local session after it became unusable.
    ///
    /// Storage is left alone if it no longer holds `stale`, e.g. after a
    /// sign-in that completed while the refresh was in flight.
    async fn drop_session(&self, stale: &Session) -> Result<(), SessionError> {
        match self.storage.load().await? {
            Some(current) if current.access_token != stale.access_token => {
                debug!("Stored session changed during refresh, keeping it");
                return Ok(());
            }
            Some(_) => self.storage.remove().await?,
            None => {}
        }
        self.events.emit(AuthEvent::SignedOut, None);
        Ok(())
    }

    /// Store the user returned by the service if it differs from the
    /// session's copy, and publish USER_UPDATED.
    async fn update_session_user(
        &self,
        mut session: Session,
        user: &User,
    ) -> Result<(), SessionError> {
        if session.user == *user {
            return Ok(());
        }
        session.user = user.clone();
        self.storage.save(&session).await?;
        debug!("Session user '{}' updated from auth service", user.id);
        self.events.emit(AuthEvent::UserUpdated, Some(session));
        Ok(())
    }
}

/// Map a non-success response to a `SessionError`.
async fn error_for_status(response: Response) -> SessionError {
    let status = response.status();
    let message = response.text().await.unwrap_or_default();
    match status {
        StatusCode::BAD_REQUEST => SessionError::InvalidCredentials,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SessionError::Unauthorized(message),
        _ => SessionError::UnexpectedStatus {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait::async_trait]
impl SessionProvider for HostedSessionProvider {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    async fn initialize(&self) -> Result<(), SessionError> {
        let restored = self.storage.load().await?;
        if restored.is_some() {
            info!("Restored persisted session for provider '{}'", self.config.name);
        }
        self.events.emit(AuthEvent::InitialSession, restored);
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, SessionError> {
        let Some(session) = self.storage.load().await? else {
            return Ok(None);
        };
        if !session.is_expired() {
            return Ok(Some(session));
        }

        let _refreshing = self.refresh_lock.lock().await;
        // Another caller may have refreshed or dropped it while we waited.
        let Some(session) = self.storage.load().await? else {
            return Ok(None);
        };
        if !session.is_expired() {
            return Ok(Some(session));
        }

        debug!("Stored session has expired");
        let Some(refresh_token) = session.refresh_token.as_deref() else {
            self.drop_session(&session).await?;
            return Ok(None);
        };
        match self.refresh_session(refresh_token).await {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(
                    event_name = "session.refresh_failed",
                    event_domain = "session",
                    provider_name = self.config.name.as_str(),
                    error = %e,
                    "could not refresh expired session, signing out"
                );
                self.drop_session(&session).await?;
                Ok(None)
            }
        }
    }

    async fn get_user(&self) -> Result<Option<User>, SessionError> {
        let Some(session) = self.get_session().await? else {
            return Ok(None);
        };
        let response = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }
        let body = response.text().await?;
        let user: User = serde_json::from_str(&body)?;
        self.update_session_user(session, &user).await?;
        Ok(Some(user))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, SessionError> {
        let session = self
            .request_session("password", json!({ "email": email, "password": password }))
            .await?;
        self.storage.save(&session).await?;
        info!(
            event_name = "session.signed_in",
            event_domain = "session",
            provider_name = self.config.name.as_str(),
            user_id = session.user.id.as_str(),
            "user signed in"
        );
        self.events.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        if let Some(session) = self.storage.load().await? {
            let result = self
                .client
                .post(self.endpoint("logout"))
                .header("apikey", &self.config.anon_key)
                .bearer_auth(&session.access_token)
                .send()
                .await;
            match result {
                Ok(response) if response.status().is_success() => {
                    debug!("Session revoked by auth service");
                }
                Ok(response) => {
                    warn!(
                        "Auth service refused logout ({}), clearing local session anyway",
                        response.status()
                    );
                }
                Err(e) => {
                    warn!("Logout request failed ({}), clearing local session anyway", e);
                }
            }
        }
        self.storage.remove().await?;
        info!(
            event_name = "session.signed_out",
            event_domain = "session",
            provider_name = self.config.name.as_str(),
            "user signed out"
        );
        self.events.emit(AuthEvent::SignedOut, None);
        Ok(())
    }

    fn on_auth_state_change(&self) -> AuthSubscription {
        self.events.subscribe()
    }
}
