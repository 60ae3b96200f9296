//! Chat session and message types for Parley.
//!
//! A session is an ordered list of [`ChatMessage`]s keyed by an opaque,
//! caller-supplied string. These types are shared by the in-memory session
//! store, the flat-file history and the HTTP layer.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single turn of a conversation. Immutable once appended to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// A user message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// An assistant message stamped with the current time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Per-session overview returned by the session listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    /// Timestamp of the newest message, or `created_at` for an empty session.
    pub last_activity: DateTime<Utc>,
}

/// Stored state of a single session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl SessionRecord {
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Full export of the session mapping, as written to the history file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    #[serde(default)]
    pub sessions: BTreeMap<String, SessionRecord>,
}

impl HistorySnapshot {
    /// Total number of messages across all sessions.
    pub fn message_count(&self) -> usize {
        self.sessions.values().map(|s| s.messages.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
        assert!(serde_json::from_str::<MessageRole>("\"system\"").is_err());
    }

    #[test]
    fn test_chat_message_wire_shape() {
        let msg = ChatMessage::user("hi");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"], "hi");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_snapshot_tolerates_missing_fields() {
        let snapshot: HistorySnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.sessions.is_empty());

        let snapshot: HistorySnapshot = serde_json::from_str(
            r#"{"sessions":{"s1":{"created_at":"2025-01-01T00:00:00Z"}}}"#,
        )
        .unwrap();
        assert_eq!(snapshot.sessions["s1"].messages.len(), 0);
        assert_eq!(snapshot.message_count(), 0);
    }
}
