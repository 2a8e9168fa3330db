use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::llm_client::ChatTurn;

struct ChatSession {
    turns: Vec<ChatTurn>,
    last_active: Instant,
}

/// Conversation history per session key, held in memory.
///
/// Sessions idle for longer than `ttl` are dropped; expiry is checked lazily
/// on every access. The lock is never held across an await point.
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, ChatSession>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Snapshot of the conversation so far. Creates the session if absent and
    /// leaves an existing one untouched apart from refreshing its activity time.
    pub fn history(&self, key: &str) -> Vec<ChatTurn> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock();
        self.purge_expired(&mut sessions, now);

        let session = sessions
            .entry(key.to_string())
            .or_insert_with(|| ChatSession {
                turns: Vec::new(),
                last_active: now,
            });
        session.last_active = now;
        session.turns.clone()
    }

    /// Appends a completed user/model exchange.
    pub fn record_exchange(&self, key: &str, user: ChatTurn, reply: ChatTurn) {
        let now = Instant::now();
        let mut sessions = self.sessions.lock();
        self.purge_expired(&mut sessions, now);

        let session = sessions
            .entry(key.to_string())
            .or_insert_with(|| ChatSession {
                turns: Vec::new(),
                last_active: now,
            });
        session.turns.push(user);
        session.turns.push(reply);
        session.last_active = now;
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        let mut sessions = self.sessions.lock();
        self.purge_expired(&mut sessions, Instant::now());
        sessions.len()
    }

    fn purge_expired(&self, sessions: &mut HashMap<String, ChatSession>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.last_active) <= self.ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "Evicted idle chat sessions");
        }
    }
}
