//! In-memory session store.
//!
//! Maps an opaque session identifier to the ordered list of messages
//! exchanged in that session. Backed by a [`DashMap`], so every mutation of
//! a given key runs under that key's shard write lock: concurrent appends
//! and clears on the same session are serialized and never lose updates.

use dashmap::DashMap;

use parley_types::chat::{ChatMessage, HistorySnapshot, SessionRecord, SessionSummary};

/// Process-lifetime session mapping.
///
/// Sessions are created implicitly by the first append and are never
/// removed; [`SessionStore::clear`] only empties their message list.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionRecord>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Append a message to the end of a session, creating the session if absent.
    ///
    /// Returns the session's message count after the append.
    pub fn append(&self, session_id: &str, message: ChatMessage) -> usize {
        let mut record = self.sessions.entry(session_id.to_string()).or_default();
        record.messages.push(message);
        record.messages.len()
    }

    /// Append a user message and its assistant reply as one unit.
    ///
    /// Both messages are pushed under the same lock acquisition, so a
    /// concurrent turn on the same session cannot land between them.
    pub fn append_turn(&self, session_id: &str, user: ChatMessage, assistant: ChatMessage) -> usize {
        let mut record = self.sessions.entry(session_id.to_string()).or_default();
        record.messages.push(user);
        record.messages.push(assistant);
        record.messages.len()
    }

    /// All messages of a session in insertion order. Empty for unknown sessions.
    pub fn list(&self, session_id: &str) -> Vec<ChatMessage> {
        self.sessions
            .get(session_id)
            .map(|record| record.messages.clone())
            .unwrap_or_default()
    }

    pub fn message_count(&self, session_id: &str) -> usize {
        self.sessions
            .get(session_id)
            .map(|record| record.messages.len())
            .unwrap_or(0)
    }

    /// Reset a session to empty. Unknown sessions are left untouched; the
    /// call succeeds either way.
    pub fn clear(&self, session_id: &str) {
        if let Some(mut record) = self.sessions.get_mut(session_id) {
            record.messages.clear();
        }
    }

    /// Every known session with its message count, ordered by session id.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .iter()
            .map(|entry| {
                let record = entry.value();
                SessionSummary {
                    session_id: entry.key().clone(),
                    message_count: record.messages.len(),
                    created_at: record.created_at,
                    last_activity: record
                        .messages
                        .last()
                        .map(|m| m.timestamp)
                        .unwrap_or(record.created_at),
                }
            })
            .collect();
        summaries.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        summaries
    }

    /// Number of known sessions, including cleared ones.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Copy of the whole mapping, suitable for writing to the history file.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            sessions: self
                .sessions
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect(),
        }
    }

    /// Replace the whole mapping with the contents of a snapshot.
    pub fn restore(&self, snapshot: HistorySnapshot) {
        self.sessions.clear();
        for (session_id, record) in snapshot.sessions {
            self.sessions.insert(session_id, record);
        }
    }
}
