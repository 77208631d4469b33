//! Auth state change notifications.
//!
//! Providers publish every sign-in, sign-out and refresh on a broadcast channel.
//! Each subscriber owns an [`AuthSubscription`]; dropping it or calling
//! [`AuthSubscription::unsubscribe`] ends delivery to that subscriber.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::Session;

pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    /// A persisted session was restored when the provider started.
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

impl AuthEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEvent::InitialSession => "INITIAL_SESSION",
            AuthEvent::SignedIn => "SIGNED_IN",
            AuthEvent::SignedOut => "SIGNED_OUT",
            AuthEvent::TokenRefreshed => "TOKEN_REFRESHED",
            AuthEvent::UserUpdated => "USER_UPDATED",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthStateChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

/// What a subscriber receives next.
#[derive(Debug, Clone)]
pub enum Delivery {
    Change(AuthStateChange),
    /// The subscriber fell behind and `n` changes were dropped.
    Lagged(u64),
}

/// Publisher side of the auth event channel, owned by a provider.
#[derive(Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthStateChange>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish a change. Having no subscribers is not an error.
    pub fn emit(&self, event: AuthEvent, session: Option<Session>) {
        let delivered = self
            .sender
            .send(AuthStateChange { event, session })
            .unwrap_or(0);
        debug!(
            event_name = "session.auth_state_change",
            event_domain = "session",
            auth_event = event.as_str(),
            subscribers = delivered,
            "auth state change published"
        );
    }

    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of the auth event channel.
pub struct AuthSubscription {
    receiver: broadcast::Receiver<AuthStateChange>,
}

impl AuthSubscription {
    /// Wait for the next change. Returns `None` once the provider is gone.
    pub async fn next(&mut self) -> Option<Delivery> {
        match self.receiver.recv().await {
            Ok(change) => Some(Delivery::Change(change)),
            Err(broadcast::error::RecvError::Lagged(skipped)) => Some(Delivery::Lagged(skipped)),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }

    pub fn unsubscribe(self) {}
}
