//! Signed-in browser sessions, each with its own reconciler.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

use super::AuthSession;
use crate::reconciler::Reconciler;

/// Everything one signed-in browser works with.
pub struct Workspace {
    pub session: AuthSession,
    pub reconciler: Arc<Reconciler>,
    /// One-shot message shown on the next render
    notice: Mutex<Option<String>>,
}

impl Workspace {
    pub fn new(session: AuthSession, reconciler: Reconciler) -> Self {
        Self {
            session,
            reconciler: Arc::new(reconciler),
            notice: Mutex::new(None),
        }
    }

    pub fn username(&self) -> &str {
        &self.session.username
    }

    pub fn set_notice(&self, msg: impl Into<String>) {
        *self.notice.lock() = Some(msg.into());
    }

    pub fn take_notice(&self) -> Option<String> {
        self.notice.lock().take()
    }
}

/// Session token → workspace. Expired sessions are dropped on lookup.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<Workspace>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workspace and return its freshly minted token.
    pub fn open(&self, workspace: Workspace) -> (String, Arc<Workspace>) {
        let purged = self.purge_expired();
        if purged > 0 {
            log::debug!("[AUTH] Purged {} expired sessions", purged);
        }

        let token = uuid::Uuid::new_v4().to_string();
        let workspace = Arc::new(workspace);
        self.sessions.insert(token.clone(), workspace.clone());
        (token, workspace)
    }

    pub fn get(&self, token: &str) -> Option<Arc<Workspace>> {
        let workspace = self.sessions.get(token).map(|w| w.value().clone())?;
        if workspace.session.is_expired() {
            log::info!("[AUTH] Session for {} expired", workspace.username());
            self.sessions.remove(token);
            return None;
        }
        Some(workspace)
    }

    pub fn close(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn purge_expired(&self) -> usize {
        // Counted inside retain; other workers may insert concurrently.
        let mut purged = 0;
        self.sessions.retain(|_, w| {
            let keep = !w.session.is_expired();
            if !keep {
                purged += 1;
            }
            keep
        });
        purged
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
