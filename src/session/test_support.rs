//! Scriptable provider for unit tests of the store and the router.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::events::{AuthEvent, AuthEvents, AuthSubscription};
use super::provider::SessionProvider;
use crate::error::SessionError;
use crate::models::{Session, User};

pub(crate) fn session_for(user: User) -> Session {
    Session {
        access_token: format!("token-{}", user.id),
        token_type: "bearer".to_string(),
        refresh_token: None,
        expires_in: None,
        expires_at: None,
        user,
    }
}

pub(crate) fn writer() -> User {
    User::new("user-1", Some("writer@example.com".to_string()))
}

#[derive(Default)]
pub(crate) struct StubProvider {
    session: Mutex<Option<Session>>,
    /// `Some(message)` makes `get_user` and `get_session` fail.
    failure: Mutex<Option<String>>,
    /// Delays applied to successive `get_session` calls.
    delays: Mutex<VecDeque<Duration>>,
    session_calls: AtomicUsize,
    user_calls: AtomicUsize,
    events: AuthEvents,
}

impl StubProvider {
    pub(crate) fn signed_out() -> Self {
        Self::default()
    }

    pub(crate) fn signed_in(user: User) -> Self {
        let provider = Self::default();
        *provider.session.lock().unwrap() = Some(session_for(user));
        provider
    }

    pub(crate) fn failing(message: &str) -> Self {
        let provider = Self::default();
        *provider.failure.lock().unwrap() = Some(message.to_string());
        provider
    }

    pub(crate) fn delay_next_session_check(&self, delay: Duration) {
        self.delays.lock().unwrap().push_back(delay);
    }

    pub(crate) fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn emit(&self, event: AuthEvent, session: Option<Session>) {
        self.events.emit(event, session);
    }

    fn check_failure(&self) -> Result<(), SessionError> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(SessionError::Unauthorized(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl SessionProvider for StubProvider {
    fn get_name(&self) -> &str {
        "stub"
    }

    async fn get_session(&self) -> Result<Option<Session>, SessionError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_failure()?;
        Ok(self.session.lock().unwrap().clone())
    }

    async fn get_user(&self) -> Result<Option<User>, SessionError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.session.lock().unwrap().as_ref().map(|s| s.user.clone()))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<Session, SessionError> {
        let session = session_for(User::new("stub-user", Some(email.to_string())));
        *self.session.lock().unwrap() = Some(session.clone());
        self.events.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        *self.session.lock().unwrap() = None;
        self.events.emit(AuthEvent::SignedOut, None);
        Ok(())
    }

    fn on_auth_state_change(&self) -> AuthSubscription {
        self.events.subscribe()
    }
}
