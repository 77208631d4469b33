use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::events::AuthSubscription;
use super::hosted_provider::{HostedProviderConfig, HostedSessionProvider};
use super::memory_provider::{MemoryProviderConfig, MemorySessionProvider};
use crate::error::SessionError;
use crate::models::{Session, User};

/// Configuration options for the session provider.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
#[serde(tag = "type")]
pub enum ProviderConfig {
    #[serde(rename = "hosted")]
    Hosted(HostedProviderConfig),
    #[serde(rename = "memory")]
    Memory(MemoryProviderConfig),
}

/// Client of the auth service that owns the current session and user.
///
/// The application treats it as opaque: it asks whether a session exists,
/// who the user is, and subscribes to sign-in/sign-out changes.
#[async_trait::async_trait]
pub trait SessionProvider: Send + Sync {
    fn get_name(&self) -> &str;

    /// Restore any persisted session. Called once at startup, after listeners
    /// are attached, so they see the resulting `InitialSession` event.
    async fn initialize(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, SessionError>;

    /// The user of the current session, or `None` when signed out.
    async fn get_user(&self) -> Result<Option<User>, SessionError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, SessionError>;

    async fn sign_out(&self) -> Result<(), SessionError>;

    fn on_auth_state_change(&self) -> AuthSubscription;
}

/// Create the session provider from a given config.
pub fn create_session_provider(
    config: &ProviderConfig,
) -> Result<Arc<dyn SessionProvider>, SessionError> {
    let provider: Arc<dyn SessionProvider> = match config {
        ProviderConfig::Hosted(cfg) => Arc::new(HostedSessionProvider::new(cfg)?),
        ProviderConfig::Memory(cfg) => Arc::new(MemorySessionProvider::new(cfg)),
    };
    info!("Using session provider '{}'", provider.get_name());
    Ok(provider)
}
