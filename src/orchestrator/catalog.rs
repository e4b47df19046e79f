use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::view::ActiveView;
use crate::core::error::GatewayError;
use crate::core::gateway::SessionGateway;
use crate::core::notifier::Notifier;
use crate::core::session::{ListQuery, Pagination, Session, SessionPatch, SessionSeed};

#[derive(Debug, Default)]
struct CatalogState {
    entries: Vec<Session>,
    pagination: Option<Pagination>,
    showing_archived: bool,
    /// Ids removed through `delete`; late exchanges must not bring them back.
    deleted: HashSet<String>,
}

impl CatalogState {
    fn position(&self, session_id: &str) -> Option<usize> {
        self.entries.iter().position(|s| s.id == session_id)
    }

    fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| b.pinned.cmp(&a.pinned).then(b.updated_at.cmp(&a.updated_at)));
    }
}

/// Sidebar list of sessions. Each operation is one gateway round trip
/// followed by a local mutation on success; failures leave the list as it
/// was and go to the notifier.
pub struct SessionCatalog {
    gateway: Arc<dyn SessionGateway>,
    notifier: Arc<dyn Notifier>,
    view: Arc<ActiveView>,
    state: RwLock<CatalogState>,
    loading: AtomicBool,
}

impl SessionCatalog {
    pub fn new(
        gateway: Arc<dyn SessionGateway>,
        notifier: Arc<dyn Notifier>,
        view: Arc<ActiveView>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            view,
            state: RwLock::new(CatalogState::default()),
            loading: AtomicBool::new(false),
        }
    }

    pub async fn entries(&self) -> Vec<Session> {
        self.state.read().await.entries.clone()
    }

    pub async fn get(&self, session_id: &str) -> Option<Session> {
        let state = self.state.read().await;
        state.position(session_id).map(|i| state.entries[i].clone())
    }

    pub async fn pagination(&self) -> Option<Pagination> {
        self.state.read().await.pagination.clone()
    }

    pub fn loading(&self) -> bool {
        self.loading.load(Ordering::Relaxed)
    }

    pub async fn list(&self, query: ListQuery) -> Result<Vec<Session>, GatewayError> {
        self.loading.store(true, Ordering::Relaxed);
        let result = self.gateway.list(&query).await;
        self.loading.store(false, Ordering::Relaxed);

        let page = self.report(result, "Failed to fetch sessions")?;
        let mut state = self.state.write().await;
        for session in &page.sessions {
            state.deleted.remove(&session.id);
        }
        state.entries = page.sessions;
        state.pagination = Some(page.pagination);
        state.showing_archived = query.archived;
        state.sort();
        tracing::debug!(count = state.entries.len(), archived = query.archived, "catalog listed");
        Ok(state.entries.clone())
    }

    pub async fn create(&self, seed: SessionSeed) -> Result<Session, GatewayError> {
        let result = self.gateway.create(&seed).await;
        let session = self.report(result, "Failed to create session")?;
        self.track(session.clone()).await;
        Ok(session)
    }

    pub async fn rename(&self, session_id: &str, title: &str) -> Result<Session, GatewayError> {
        let patch = SessionPatch {
            title: Some(title.to_string()),
            ..Default::default()
        };
        let result = self.gateway.update(session_id, &patch).await;
        let updated = self.report(result, "Failed to rename session")?;
        self.patch_entry(session_id, |entry| {
            entry.title = updated.title.clone();
            entry.updated_at = updated.updated_at;
        })
        .await;
        Ok(updated)
    }

    pub async fn set_pinned(&self, session_id: &str, pinned: bool) -> Result<Session, GatewayError> {
        let patch = SessionPatch {
            is_pinned: Some(pinned),
            ..Default::default()
        };
        let result = self.gateway.update(session_id, &patch).await;
        let updated = self.report(result, "Failed to update session")?;
        self.patch_entry(session_id, |entry| {
            entry.pinned = updated.pinned;
            entry.updated_at = updated.updated_at;
        })
        .await;
        Ok(updated)
    }

    /// Toggle the archived flag. An entry that no longer matches the
    /// listing's archived filter leaves the visible list.
    pub async fn archive(&self, session_id: &str) -> Result<bool, GatewayError> {
        let result = self.gateway.archive(session_id).await;
        let archived = self.report(result, "Failed to archive session")?;

        let mut state = self.state.write().await;
        if let Some(i) = state.position(session_id) {
            if archived == state.showing_archived {
                state.entries[i].archived = archived;
            } else {
                state.entries.remove(i);
            }
        }
        drop(state);

        self.notifier.success(if archived {
            "Session archived"
        } else {
            "Session unarchived"
        });
        Ok(archived)
    }

    pub async fn delete(&self, session_id: &str) -> Result<(), GatewayError> {
        let result = self.gateway.delete(session_id).await;
        self.report(result, "Failed to delete session")?;

        {
            let mut state = self.state.write().await;
            if let Some(i) = state.position(session_id) {
                state.entries.remove(i);
            }
            state.deleted.insert(session_id.to_string());
        }
        if self.view.reset_if_current(session_id).await {
            tracing::info!(session_id, "deleted the active session; view reset");
        }
        Ok(())
    }

    pub async fn clear_messages(&self, session_id: &str) -> Result<(), GatewayError> {
        let result = self.gateway.clear_messages(session_id).await;
        self.report(result, "Failed to clear messages")?;

        self.patch_entry(session_id, Session::clear_history).await;
        if self.view.reset_if_current(session_id).await {
            tracing::info!(session_id, "cleared the active session; view reset");
        }
        Ok(())
    }

    /// Fold a finished exchange into the entry for `session`, inserting the
    /// entry when the catalog has not seen it yet. Deleted sessions stay out.
    pub async fn record_exchange(&self, session: &Session, query: &str, analyzed: bool) {
        let mut state = self.state.write().await;
        if state.deleted.contains(&session.id) {
            tracing::debug!(session_id = %session.id, "exchange for a deleted session; not re-listed");
            return;
        }
        match state.position(&session.id) {
            Some(i) => state.entries[i].record_exchange(query, analyzed),
            None if !state.showing_archived => {
                let mut entry = session.clone();
                entry.record_exchange(query, analyzed);
                state.entries.push(entry);
            }
            None => {}
        }
        state.sort();
    }

    async fn track(&self, session: Session) {
        let mut state = self.state.write().await;
        state.deleted.remove(&session.id);
        if state.showing_archived || state.position(&session.id).is_some() {
            return;
        }
        state.entries.push(session);
        state.sort();
    }

    async fn patch_entry<F>(&self, session_id: &str, patch: F)
    where
        F: FnOnce(&mut Session),
    {
        let mut state = self.state.write().await;
        if let Some(i) = state.position(session_id) {
            patch(&mut state.entries[i]);
            state.sort();
        }
    }

    fn report<T>(&self, result: Result<T, GatewayError>, fallback: &str) -> Result<T, GatewayError> {
        result.map_err(|e| {
            tracing::warn!(error = %e, "{fallback}");
            self.notifier.error(&e.user_message(fallback));
            e
        })
    }
}
