//! Holder of the currently authenticated user.
//!
//! The store keeps a cached copy of what the session provider last reported.
//! It is owned by the application and handed to whoever needs it; there is no
//! global instance. Provider failures are logged and never reach callers.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::User;
use crate::session::{AuthEvent, AuthStateChange, Delivery, SessionProvider};

pub struct UserStore {
    provider: Arc<dyn SessionProvider>,
    user: watch::Sender<Option<User>>,
}

impl UserStore {
    pub fn new(provider: Arc<dyn SessionProvider>) -> Self {
        let (user, _) = watch::channel(None);
        Self { provider, user }
    }

    /// Ask the provider for the current user and cache the answer.
    ///
    /// On failure or when nobody is signed in the cache is cleared.
    pub async fn fetch_user(&self) {
        match self.provider.get_user().await {
            Ok(Some(user)) => {
                debug!("Fetched user '{}'", user.id);
                self.user.send_replace(Some(user));
            }
            Ok(None) => {
                warn!(
                    event_name = "store.fetch_user.absent",
                    event_domain = "store",
                    provider_name = self.provider.get_name(),
                    "no authenticated user"
                );
                self.clear_user();
            }
            Err(e) => {
                warn!(
                    event_name = "store.fetch_user.failed",
                    event_domain = "store",
                    provider_name = self.provider.get_name(),
                    error = %e,
                    "error fetching user"
                );
                self.clear_user();
            }
        }
    }

    pub fn set_user(&self, user: impl Into<Option<User>>) {
        self.user.send_replace(user.into());
    }

    pub fn clear_user(&self) {
        self.user.send_replace(None);
    }

    pub fn user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    pub fn email(&self) -> Option<String> {
        self.user.borrow().as_ref().and_then(|user| user.email.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }

    /// Observe changes to the cached user.
    pub fn watch(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    /// Start applying the provider's auth events to the cache.
    ///
    /// The subscription is taken before this returns, so no event published
    /// afterwards is missed. Dropping the returned handle leaves the listener
    /// running; call [`AuthListener::unsubscribe`] to stop it.
    pub fn initialize_auth_listener(self: &Arc<Self>) -> AuthListener {
        let mut subscription = self.provider.on_auth_state_change();
        let store = Arc::clone(self);
        info!(
            "Listening for auth state changes from '{}'",
            self.provider.get_name()
        );

        let task = tokio::spawn(async move {
            while let Some(delivery) = subscription.next().await {
                match delivery {
                    Delivery::Change(change) => store.apply(change),
                    Delivery::Lagged(skipped) => {
                        warn!(
                            "Auth listener missed {} changes, resynchronising",
                            skipped
                        );
                        store.fetch_user().await;
                    }
                }
            }
            debug!("Auth event channel closed, listener exiting");
        });

        AuthListener { task }
    }

    fn apply(&self, change: AuthStateChange) {
        debug!(
            auth_event = change.event.as_str(),
            has_session = change.session.is_some(),
            "applying auth state change"
        );
        match (change.event, change.session) {
            (AuthEvent::SignedOut, _) => self.clear_user(),
            (_, Some(session)) => self.set_user(session.user),
            (_, None) => self.clear_user(),
        }
    }
}

/// Handle to a running auth listener.
pub struct AuthListener {
    task: JoinHandle<()>,
}

impl AuthListener {
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the listener and wait for it to finish.
    pub async fn unsubscribe(self) {
        self.task.abort();
        let _ = self.task.await;
    }
}
