//! Per-session chat state.
//!
//! A [`Session`] owns one conversation's turn history. The [`SessionStore`]
//! maps session ids to sessions; each session sits behind its own async
//! mutex so turns within a session run one at a time while other sessions
//! proceed independently. Sessions idle past the configured timeout are
//! dropped by [`SessionStore::run_sweeper`]. Nothing is persisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

pub type SessionId = Uuid;
pub type SharedSession = Arc<AsyncMutex<Session>>;

/// Upper bound on how often idle sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// One user utterance and the combined answer it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    /// Local wall-clock time of submission, `HH:MM:SS`.
    pub timestamp: String,
}

impl ChatTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, submitted: DateTime<Local>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            timestamp: submitted.format("%H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    id: SessionId,
    created_at: DateTime<Utc>,
    turns: Vec<ChatTurn>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self { id, created_at: Utc::now(), turns: Vec::new() }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Prior `(question, answer)` pairs, oldest first.
    pub fn history_pairs(&self) -> Vec<(String, String)> {
        self.turns
            .iter()
            .map(|t| (t.question.clone(), t.answer.clone()))
            .collect()
    }

    pub fn push_turn(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn clear_history(&mut self) {
        debug!(session_id = %self.id, cleared = self.turns.len(), "chat history cleared");
        self.turns.clear();
    }
}

#[derive(Debug)]
struct Entry {
    session: SharedSession,
    last_seen: Instant,
}

/// Registry of live sessions.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Entry>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self { sessions: Mutex::new(HashMap::new()), idle_timeout }
    }

    /// Start a new empty session and return its id.
    pub fn create(&self) -> SessionId {
        let id = Uuid::new_v4();
        let entry = Entry {
            session: Arc::new(AsyncMutex::new(Session::new(id))),
            last_seen: Instant::now(),
        };
        self.lock().insert(id, entry);
        debug!(session_id = %id, "session started");
        id
    }

    /// Look up a session and mark it active.
    pub fn get(&self, id: &SessionId) -> Option<SharedSession> {
        let mut sessions = self.lock();
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    /// End a session. Returns `false` if it did not exist.
    pub fn remove(&self, id: &SessionId) -> bool {
        let removed = self.lock().remove(id).is_some();
        if removed {
            debug!(session_id = %id, "session ended");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every session not touched within the idle timeout. Returns how
    /// many were dropped.
    pub fn sweep_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_timeout);
        before - sessions.len()
    }

    /// Sweep idle sessions periodically until `shutdown` is cancelled.
    pub async fn run_sweeper(&self, shutdown: CancellationToken) {
        let period = self.idle_timeout.min(SWEEP_INTERVAL);
        info!(idle_timeout_secs = self.idle_timeout.as_secs(), "session sweeper started");

        let mut interval = tokio::time::interval(period);
        interval.tick().await; // skip the first immediate tick

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    debug!("session sweeper stopping");
                    break;
                }

                _ = interval.tick() => {
                    let dropped = self.sweep_idle();
                    if dropped > 0 {
                        info!(dropped, remaining = self.len(), "idle sessions dropped");
                    }
                }
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, Entry>> {
        // Map updates are single inserts/removes; a poisoned map is still whole.
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
