//! Per-session conversation history.
//!
//! Process-wide, in-memory, never evicted or persisted. Each session's
//! turn list sits behind its own async mutex so concurrent requests for
//! the same session serialize while distinct sessions run in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;
use uuid::Uuid;

/// One (user message, model reply) exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
}

/// Shared handle to one session's ordered turns.
pub type SessionHistory = Arc<Mutex<Vec<Turn>>>;

/// Process-wide mapping from session id to conversation history.
///
/// First access for an unknown id creates an empty history; there is no
/// validation that a session was ever started.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    sessions: Arc<StdMutex<HashMap<String, SessionHistory>>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the history for a session, creating an empty one on first use.
    pub fn get_or_create(&self, session_id: &str) -> SessionHistory {
        let mut sessions = self.sessions.lock().expect("history map poisoned");
        Arc::clone(
            sessions
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(Vec::new()))),
        )
    }

    /// Fetch the history for a session only if it already exists.
    pub fn get(&self, session_id: &str) -> Option<SessionHistory> {
        let sessions = self.sessions.lock().expect("history map poisoned");
        sessions.get(session_id).map(Arc::clone)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().expect("history map poisoned").len()
    }
}

/// Generate a short session token: the first segment of a UUID v4
/// (8 hex characters).
pub fn new_session_id() -> String {
    let id = Uuid::new_v4().to_string();
    id.split('-').next().unwrap_or(&id).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_access_creates_empty_history() {
        let store = HistoryStore::new();
        let history = store.get_or_create("abc");
        assert!(history.lock().await.is_empty());
        assert_eq!(store.session_count(), 1);
    }

    #[tokio::test]
    async fn get_does_not_create() {
        let store = HistoryStore::new();
        assert!(store.get("missing").is_none());
        assert_eq!(store.session_count(), 0);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = HistoryStore::new();
        store.get_or_create("a").lock().await.push(Turn {
            user: "q".into(),
            assistant: "r".into(),
        });
        assert!(store.get_or_create("b").lock().await.is_empty());
        assert_eq!(store.get_or_create("a").lock().await.len(), 1);
    }

    #[tokio::test]
    async fn same_session_handles_share_state() {
        let store = HistoryStore::new();
        let first = store.get_or_create("shared");
        let second = store.get_or_create("shared");
        first.lock().await.push(Turn {
            user: "u".into(),
            assistant: "a".into(),
        });
        assert_eq!(second.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_appends_never_lose_turns() {
        let store = HistoryStore::new();
        let mut tasks = Vec::new();
        for i in 0..16 {
            let history = store.get_or_create("busy");
            tasks.push(tokio::spawn(async move {
                let mut turns = history.lock().await;
                turns.push(Turn {
                    user: format!("q{i}"),
                    assistant: format!("r{i}"),
                });
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(store.get_or_create("busy").lock().await.len(), 16);
    }

    #[test]
    fn session_ids_are_short_and_distinct() {
        let a = new_session_id();
        let b = new_session_id();
        assert_eq!(a.len(), 8);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
