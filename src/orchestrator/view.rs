//! The session the user is currently looking at.
//!
//! Holds the current-session cell and its message log behind one lock,
//! together with a generation counter. Every navigation (`reset`, or
//! `replace` with a different session) bumps the generation; in-flight work
//! captures a [`Ticket`] up front and may only write while its ticket is
//! still current.

use tokio::sync::RwLock;

use crate::core::message::Message;
use crate::core::session::{Session, SessionDetail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
}

#[derive(Debug, Default)]
struct ViewState {
    generation: u64,
    session: Option<Session>,
    messages: Vec<Message>,
}

#[derive(Debug, Default)]
pub struct ActiveView {
    state: RwLock<ViewState>,
}

impl ActiveView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current generation and a snapshot of the current session.
    pub async fn begin(&self) -> (Ticket, Option<Session>) {
        let state = self.state.read().await;
        (
            Ticket {
                generation: state.generation,
            },
            state.session.clone(),
        )
    }

    /// Whether `ticket` still refers to `session_id` on screen.
    pub async fn is_current(&self, ticket: &Ticket, session_id: &str) -> bool {
        let state = self.state.read().await;
        is_live(&state, ticket, session_id)
    }

    /// Make a freshly created session current, unless the user navigated
    /// away (or another call got there first) since `ticket` was taken.
    pub async fn adopt(&self, ticket: &Ticket, session: Session) -> bool {
        let mut state = self.state.write().await;
        if state.generation != ticket.generation || state.session.is_some() {
            return false;
        }
        state.session = Some(session);
        state.messages.clear();
        true
    }

    /// Append to the log if `ticket` still refers to `session_id`.
    pub async fn append(&self, ticket: &Ticket, session_id: &str, message: Message) -> bool {
        let mut state = self.state.write().await;
        if !is_live(&state, ticket, session_id) {
            return false;
        }
        state.messages.push(message);
        true
    }

    /// Fold an exchange into the visible session header, if still current.
    pub async fn record_exchange(
        &self,
        ticket: &Ticket,
        session_id: &str,
        query: &str,
        analyzed: bool,
    ) -> bool {
        let mut state = self.state.write().await;
        if !is_live(&state, ticket, session_id) {
            return false;
        }
        if let Some(session) = state.session.as_mut() {
            session.record_exchange(query, analyzed);
        }
        true
    }

    /// Drop the current session and its log.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.session = None;
        state.messages.clear();
    }

    /// Reset only if `session_id` is the one on screen.
    pub async fn reset_if_current(&self, session_id: &str) -> bool {
        let mut state = self.state.write().await;
        if state.session.as_ref().map(|s| s.id.as_str()) != Some(session_id) {
            return false;
        }
        state.generation += 1;
        state.session = None;
        state.messages.clear();
        true
    }

    /// Swap in a loaded session wholesale. Reloading the session already on
    /// screen keeps the generation, so its in-flight work still lands.
    /// Returns `true` when the view moved to a different session.
    pub async fn replace(&self, detail: SessionDetail) -> bool {
        let mut state = self.state.write().await;
        let moved = state.session.as_ref().map(|s| s.id.as_str()) != Some(detail.session.id.as_str());
        if moved {
            state.generation += 1;
        }
        state.session = Some(detail.session);
        state.messages = detail.messages;
        moved
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.read().await.session.clone()
    }

    pub async fn session_id(&self) -> Option<String> {
        self.state.read().await.session.as_ref().map(|s| s.id.clone())
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.state.read().await.messages.clone()
    }
}

fn is_live(state: &ViewState, ticket: &Ticket, session_id: &str) -> bool {
    state.generation == ticket.generation
        && state.session.as_ref().map(|s| s.id.as_str()) == Some(session_id)
}
