//! Application composition: session provider, user store and router.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::info;

use crate::config::{ConfigV1, RouterConfig};
use crate::error::{Error, RouteError};
use crate::router::{AuthGuard, RouteTable, Router};
use crate::session::{create_session_provider, SessionProvider};
use crate::store::{AuthListener, UserStore};

/// The running client: everything a view needs, passed around explicitly.
pub struct App {
    pub provider: Arc<dyn SessionProvider>,
    pub user_store: Arc<UserStore>,
    pub router: Arc<Router>,
    listener: Mutex<Option<AuthListener>>,
}

impl App {
    pub fn new(
        provider: Arc<dyn SessionProvider>,
        router_config: &RouterConfig,
    ) -> Result<Self, RouteError> {
        let table = RouteTable::new(&router_config.routes, &router_config.login_route)?;
        let guard = AuthGuard::new(
            provider.clone(),
            table.login_route(),
            Duration::from_millis(router_config.session_check_timeout_ms),
        );
        let router = Router::new(table, router_config.history_limit).with_guard(Arc::new(guard));

        Ok(Self {
            user_store: Arc::new(UserStore::new(provider.clone())),
            provider,
            router: Arc::new(router),
            listener: Mutex::new(None),
        })
    }

    pub fn from_config(config: &ConfigV1) -> Result<Self, Error> {
        let provider = create_session_provider(&config.session_provider)?;
        Ok(Self::new(provider, &config.router)?)
    }

    /// Attach the auth listener, restore any persisted session and load the user.
    ///
    /// Calling this again is a no-op while a listener is attached.
    pub async fn start(&self) -> Result<(), Error> {
        let mut listener = self.listener.lock().await;
        if listener.is_some() {
            return Ok(());
        }
        *listener = Some(self.user_store.initialize_auth_listener());
        drop(listener);

        self.provider.initialize().await?;
        self.user_store.fetch_user().await;
        info!(
            event_name = "app.started",
            event_domain = "app",
            provider_name = self.provider.get_name(),
            authenticated = self.user_store.is_authenticated(),
            "application started"
        );
        Ok(())
    }

    /// Detach the auth listener. The cached user is left as it was.
    pub async fn shutdown(&self) {
        if let Some(listener) = self.listener.lock().await.take() {
            listener.unsubscribe().await;
            info!("Auth listener stopped");
        }
    }
}
