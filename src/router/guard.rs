use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use super::table::ResolvedRoute;
use crate::session::SessionProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Navigate to the named route instead.
    Redirect(String),
}

/// Logic run before a navigation completes.
#[async_trait::async_trait]
pub trait NavigationGuard: Send + Sync {
    fn get_name(&self) -> &str;
    async fn before_each(&self, to: &ResolvedRoute) -> GuardDecision;
}

/// Sends navigations to protected routes to the login route when signed out.
///
/// Every navigation costs exactly one `get_session` call. The call is bounded
/// by `timeout`; a timeout or provider error counts as "no session".
pub struct AuthGuard {
    provider: Arc<dyn SessionProvider>,
    login_route: String,
    timeout: Duration,
}

impl AuthGuard {
    pub fn new(
        provider: Arc<dyn SessionProvider>,
        login_route: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            login_route: login_route.into(),
            timeout,
        }
    }

    async fn has_session(&self) -> bool {
        match timeout(self.timeout, self.provider.get_session()).await {
            Ok(Ok(session)) => session.is_some(),
            Ok(Err(e)) => {
                warn!(
                    event_name = "router.guard.session_check_failed",
                    event_domain = "router",
                    provider_name = self.provider.get_name(),
                    error = %e,
                    "session check failed, treating as signed out"
                );
                false
            }
            Err(_) => {
                warn!(
                    event_name = "router.guard.session_check_timeout",
                    event_domain = "router",
                    provider_name = self.provider.get_name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "session check timed out, treating as signed out"
                );
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl NavigationGuard for AuthGuard {
    fn get_name(&self) -> &str {
        "auth"
    }

    async fn before_each(&self, to: &ResolvedRoute) -> GuardDecision {
        let has_session = self.has_session().await;
        if to.requires_auth() && !has_session {
            debug!("'{}' requires auth and there is no session", to.path);
            GuardDecision::Redirect(self.login_route.clone())
        } else {
            GuardDecision::Allow
        }
    }
}
