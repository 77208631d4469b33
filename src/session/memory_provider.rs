use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::events::{AuthEvent, AuthEvents, AuthSubscription};
use super::provider::SessionProvider;
use crate::error::SessionError;
use crate::models::{Session, User};

fn default_session_ttl_secs() -> i64 {
    3600
}

/// A session provider backed by a fixed user list, for local development and tests.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct MemoryProviderConfig {
    /// A friendly name for logs.
    pub name: String,
    #[serde(default)]
    pub users: Vec<MemoryUserEntry>,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: i64,
}

/// Represents a single user entry (email + password).
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct MemoryUserEntry {
    /// Stable user id; generated at startup when omitted.
    pub id: Option<String>,
    pub email: String,
    pub password: String,
}

struct Account {
    user: User,
    password: String,
}

pub struct MemorySessionProvider {
    name: String,
    session_ttl_secs: i64,
    accounts: Vec<Account>,
    session: RwLock<Option<Session>>,
    events: AuthEvents,
}

impl MemorySessionProvider {
    pub fn new(config: &MemoryProviderConfig) -> Self {
        let accounts = config
            .users
            .iter()
            .map(|entry| Account {
                user: User::new(
                    entry
                        .id
                        .clone()
                        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                    Some(entry.email.clone()),
                ),
                password: entry.password.clone(),
            })
            .collect::<Vec<_>>();
        info!(
            "Creating in-memory session provider '{}' with {} users",
            config.name,
            accounts.len()
        );
        Self {
            name: config.name.clone(),
            session_ttl_secs: config.session_ttl_secs,
            accounts,
            session: RwLock::new(None),
            events: AuthEvents::new(),
        }
    }

    fn find_account(&self, email: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| {
            account
                .user
                .email
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case(email))
        })
    }
}

#[async_trait::async_trait]
impl SessionProvider for MemorySessionProvider {
    fn get_name(&self) -> &str {
        &self.name
    }

    async fn get_session(&self) -> Result<Option<Session>, SessionError> {
        let mut guard = self.session.write().await;
        if guard.as_ref().is_some_and(Session::is_expired) {
            debug!("In-memory session expired");
            *guard = None;
            drop(guard);
            self.events.emit(AuthEvent::SignedOut, None);
            return Ok(None);
        }
        Ok(guard.clone())
    }

    async fn get_user(&self) -> Result<Option<User>, SessionError> {
        Ok(self.get_session().await?.map(|session| session.user))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, SessionError> {
        debug!("Password sign-in attempt for '{}'", email);
        let account = match self.find_account(email) {
            Some(account) if account.password == password => account,
            _ => return Err(SessionError::InvalidCredentials),
        };

        let session = Session {
            access_token: uuid::Uuid::new_v4().to_string(),
            token_type: "bearer".to_string(),
            refresh_token: None,
            expires_in: Some(self.session_ttl_secs),
            expires_at: Some(Utc::now().timestamp() + self.session_ttl_secs),
            user: account.user.clone(),
        };
        *self.session.write().await = Some(session.clone());
        self.events.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        *self.session.write().await = None;
        self.events.emit(AuthEvent::SignedOut, None);
        Ok(())
    }

    fn on_auth_state_change(&self) -> AuthSubscription {
        self.events.subscribe()
    }
}
