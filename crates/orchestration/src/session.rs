//! Per-session records and the registry that hands them out.

use std::collections::HashMap;
use std::sync::Arc;

use common::SessionId;
use domain::SessionState;
use tokio::sync::{Mutex, RwLock};

use crate::report::EventReport;
use crate::role::Role;

/// Everything the orchestrator remembers about one end-user session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    id: SessionId,
    state: SessionState,
    active_role: Role,
    greeted: bool,
    checkout_in_progress: bool,
    last_report: Option<EventReport>,
}

impl Session {
    /// Creates a fresh session addressed to Root.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Session-scope store holding the cart.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The role that receives the next end-user message.
    pub fn active_role(&self) -> Role {
        self.active_role
    }

    /// Whether Root has already greeted this session.
    pub fn greeted(&self) -> bool {
        self.greeted
    }

    /// Whether Checkout is part-way through running an event.
    pub fn checkout_in_progress(&self) -> bool {
        self.checkout_in_progress
    }

    /// Report of the most recent event run.
    pub fn last_report(&self) -> Option<&EventReport> {
        self.last_report.as_ref()
    }

    pub(crate) fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub(crate) fn set_active_role(&mut self, role: Role) {
        self.active_role = role;
    }

    pub(crate) fn mark_greeted(&mut self) {
        self.greeted = true;
    }

    pub(crate) fn set_checkout_in_progress(&mut self, in_progress: bool) {
        self.checkout_in_progress = in_progress;
    }

    pub(crate) fn set_last_report(&mut self, report: EventReport) {
        self.last_report = Some(report);
    }
}

/// Shared handle to a session. Holding the lock serializes turns.
pub type SessionHandle = Arc<Mutex<Session>>;

/// All live sessions, keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and registers a new session.
    pub async fn create(&self) -> SessionId {
        let id = SessionId::new();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(Session::new(id))));
        metrics::gauge!("sessions_active").increment(1.0);
        tracing::info!(session_id = %id, "session created");
        id
    }

    /// Looks up a session handle.
    pub async fn get(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Drops a session. Returns true if it existed.
    pub async fn remove(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            metrics::gauge!("sessions_active").decrement(1.0);
        }
        removed
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_at_root() {
        let session = Session::new(SessionId::new());
        assert_eq!(session.active_role(), Role::Root);
        assert!(!session.greeted());
        assert!(!session.checkout_in_progress());
        assert!(!session.state().has_cart());
        assert!(session.last_report().is_none());
    }

    #[tokio::test]
    async fn test_registry_create_get_remove() {
        let registry = SessionRegistry::new();
        let id = registry.create().await;

        let handle = registry.get(id).await.unwrap();
        assert_eq!(handle.lock().await.id(), id);
        assert_eq!(registry.len().await, 1);

        assert!(registry.remove(id).await);
        assert!(!registry.remove(id).await);
        assert!(registry.get(id).await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let registry = SessionRegistry::new();
        let a = registry.create().await;
        let b = registry.create().await;

        registry.get(a).await.unwrap().lock().await.mark_greeted();

        assert!(registry.get(a).await.unwrap().lock().await.greeted());
        assert!(!registry.get(b).await.unwrap().lock().await.greeted());
    }
}
