use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::{debug, info};

use super::guard::{GuardDecision, NavigationGuard};
use super::pattern::normalize_path;
use super::table::RouteTable;
use super::views::RenderedView;
use crate::error::RouteError;

/// Where a navigation attempt is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationState {
    Requested,
    Checking,
    Allowed,
    Redirected,
    /// A newer navigation started before this one finished checking.
    Aborted,
}

impl NavigationState {
    fn as_str(&self) -> &'static str {
        match self {
            NavigationState::Requested => "requested",
            NavigationState::Checking => "checking",
            NavigationState::Allowed => "allowed",
            NavigationState::Redirected => "redirected",
            NavigationState::Aborted => "aborted",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavigationOutcome {
    Allowed { view: RenderedView },
    /// The guard sent the user elsewhere; `view` is rendered instead of `from`.
    Redirected { from: String, view: RenderedView },
    Aborted { path: String },
}

impl NavigationOutcome {
    pub fn state(&self) -> NavigationState {
        match self {
            NavigationOutcome::Allowed { .. } => NavigationState::Allowed,
            NavigationOutcome::Redirected { .. } => NavigationState::Redirected,
            NavigationOutcome::Aborted { .. } => NavigationState::Aborted,
        }
    }

    pub fn view(&self) -> Option<&RenderedView> {
        match self {
            NavigationOutcome::Allowed { view } | NavigationOutcome::Redirected { view, .. } => {
                Some(view)
            }
            NavigationOutcome::Aborted { .. } => None,
        }
    }
}

pub struct Router {
    table: RouteTable,
    guards: Vec<Arc<dyn NavigationGuard>>,
    current: Mutex<Option<RenderedView>>,
    history: Mutex<VecDeque<RenderedView>>,
    history_limit: usize,
    next_id: AtomicU64,
    latest_id: AtomicU64,
}

impl Router {
    pub fn new(table: RouteTable, history_limit: usize) -> Self {
        Self {
            table,
            guards: Vec::new(),
            current: Mutex::new(None),
            history: Mutex::new(VecDeque::new()),
            history_limit,
            next_id: AtomicU64::new(0),
            latest_id: AtomicU64::new(0),
        }
    }

    /// Guards run in registration order; the first redirect wins.
    pub fn with_guard(mut self, guard: Arc<dyn NavigationGuard>) -> Self {
        self.guards.push(guard);
        self
    }

    /// Resolve `path`, run the guards, and render the result.
    ///
    /// Nothing is rendered and `current()` is untouched until every guard
    /// has decided.
    pub async fn navigate(&self, path: &str) -> Result<NavigationOutcome, RouteError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest_id.fetch_max(id, Ordering::SeqCst);
        trace_state(id, path, NavigationState::Requested);

        let to = self.table.resolve(path)?;
        trace_state(id, &to.path, NavigationState::Checking);

        let mut decision = GuardDecision::Allow;
        for guard in &self.guards {
            decision = guard.before_each(&to).await;
            if let GuardDecision::Redirect(ref target) = decision {
                debug!("Guard '{}' redirected to '{}'", guard.get_name(), target);
                break;
            }
        }

        if self.latest_id.load(Ordering::SeqCst) != id {
            trace_state(id, &to.path, NavigationState::Aborted);
            return Ok(NavigationOutcome::Aborted { path: to.path });
        }

        let outcome = match decision {
            GuardDecision::Allow => NavigationOutcome::Allowed { view: to.render() },
            GuardDecision::Redirect(target) => {
                let view = self.table.resolve_name(&target)?.render();
                info!(
                    event_name = "router.navigation.redirected",
                    event_domain = "router",
                    from = to.path.as_str(),
                    to = view.path.as_str(),
                    "navigation redirected"
                );
                NavigationOutcome::Redirected {
                    from: to.path,
                    view,
                }
            }
        };
        if let Some(view) = outcome.view() {
            if !self.commit(id, view.clone()) {
                trace_state(id, path, NavigationState::Aborted);
                return Ok(NavigationOutcome::Aborted {
                    path: normalize_path(path),
                });
            }
        }
        trace_state(id, path, outcome.state());
        Ok(outcome)
    }

    /// The view of the last completed navigation.
    pub fn current(&self) -> Option<RenderedView> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Completed navigations, oldest first.
    pub fn history(&self) -> Vec<RenderedView> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Record `view` as current unless navigation `id` has been superseded.
    /// The supersession check holds the history lock.
    fn commit(&self, id: u64, view: RenderedView) -> bool {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        if self.latest_id.load(Ordering::SeqCst) != id {
            return false;
        }
        history.push_back(view.clone());
        while history.len() > self.history_limit {
            history.pop_front();
        }
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(view);
        true
    }
}

fn trace_state(id: u64, path: &str, state: NavigationState) {
    debug!(
        event_name = "router.navigation.state",
        event_domain = "router",
        navigation_id = id,
        path,
        state = state.as_str(),
        "navigation state changed"
    );
}
