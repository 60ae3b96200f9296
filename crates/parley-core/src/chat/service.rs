//! Chat service orchestrating a conversation turn.
//!
//! ChatService coordinates the SessionStore, the LLM provider and the
//! HistoryRepository: validate the message, read prior turns, generate a
//! reply, record the turn and flush the history file.
//!
//! A turn is recorded only when the provider succeeds. A failed generation
//! leaves the session exactly as it was, so every user message in a session
//! is immediately followed by its assistant reply.

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use parley_types::chat::ChatMessage;
use parley_types::config::ModelConfig;
use parley_types::error::{ChatError, RepositoryError};
use parley_types::llm::GenerationRequest;

use crate::chat::repository::HistoryRepository;
use crate::llm::box_provider::BoxLlmProvider;
use crate::session::store::SessionStore;

/// Number of characters of a message echoed into log lines.
const LOG_PREVIEW_CHARS: usize = 50;

/// Outcome of a successful chat turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub session_id: String,
    pub reply: String,
    /// Session length after the turn was recorded.
    pub message_count: usize,
    /// Model version reported by the provider for this reply.
    pub model: String,
}

/// Orchestrates chat turns and session maintenance.
///
/// Generic over `HistoryRepository` to maintain clean architecture
/// (parley-core never depends on parley-infra).
pub struct ChatService<H: HistoryRepository> {
    store: SessionStore,
    provider: BoxLlmProvider,
    history: H,
    model: ModelConfig,
    default_session_id: String,
    /// Serializes history flushes so an older snapshot never overwrites a newer one.
    flush_lock: Mutex<()>,
}

impl<H: HistoryRepository> ChatService<H> {
    pub fn new(
        provider: BoxLlmProvider,
        history: H,
        model: ModelConfig,
        default_session_id: impl Into<String>,
    ) -> Self {
        Self {
            store: SessionStore::new(),
            provider,
            history,
            model,
            default_session_id: default_session_id.into(),
            flush_lock: Mutex::new(()),
        }
    }

    /// Access the session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Access the LLM provider.
    pub fn provider(&self) -> &BoxLlmProvider {
        &self.provider
    }

    /// Populate the store from the history repository.
    ///
    /// Returns the number of sessions restored.
    pub async fn load_history(&self) -> Result<usize, RepositoryError> {
        let snapshot = self.history.load().await?;
        let sessions = snapshot.sessions.len();
        let messages = snapshot.message_count();
        self.store.restore(snapshot);
        info!(sessions, messages, "Conversation history loaded");
        Ok(sessions)
    }

    /// The session a request addresses: the requested id, or the default
    /// one when the id is omitted or blank.
    pub fn resolve_session_id(&self, requested: Option<&str>) -> String {
        match requested {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => self.default_session_id.clone(),
        }
    }

    /// Check that a message is present and non-blank, returning it trimmed.
    pub fn validate_message(message: Option<&str>) -> Result<String, ChatError> {
        let message = message
            .ok_or_else(|| ChatError::Validation("Message field is required".to_string()))?
            .trim();
        if message.is_empty() {
            return Err(ChatError::Validation("Message cannot be empty".to_string()));
        }
        Ok(message.to_string())
    }

    /// Run one conversation turn.
    ///
    /// Validation failures and provider failures return an error without
    /// touching the session.
    pub async fn send_message(
        &self,
        session_id: Option<&str>,
        message: Option<&str>,
    ) -> Result<ChatTurn, ChatError> {
        let content = Self::validate_message(message)?;
        let session_id = self.resolve_session_id(session_id);
        let user_message = ChatMessage::user(content);

        info!(
            session_id = %session_id,
            role = %user_message.role,
            preview = %preview(&user_message.content),
            "Processing chat message"
        );

        let history = self.store.list(&session_id);
        debug!(session_id = %session_id, history_len = history.len(), "Invoking model");

        let request = self.build_request(history, &user_message.content);
        let response = match self.provider.generate(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    session_id = %session_id,
                    provider = self.provider.name(),
                    kind = e.kind(),
                    error = %e,
                    "Generation failed; turn not recorded"
                );
                return Err(e.into());
            }
        };

        debug!(
            session_id = %session_id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            preview = %preview(&response.content),
            "Model reply received"
        );

        let message_count = self.store.append_turn(
            &session_id,
            user_message,
            ChatMessage::assistant(response.content.clone()),
        );
        self.flush().await;

        Ok(ChatTurn {
            session_id,
            reply: response.content,
            message_count,
            model: response.model,
        })
    }

    /// Reset a session to empty. Succeeds whether or not the session exists.
    pub async fn clear_session(&self, session_id: &str) {
        let existed = self.store.message_count(session_id) > 0;
        self.store.clear(session_id);
        info!(session_id = %session_id, existed, "Session cleared");
        self.flush().await;
    }

    /// Write the current store contents to the history repository.
    ///
    /// Failures are logged and swallowed: the in-memory store stays
    /// authoritative for the lifetime of the process.
    async fn flush(&self) {
        let _guard = self.flush_lock.lock().await;
        let snapshot = self.store.snapshot();
        match self.history.save(&snapshot).await {
            Ok(()) => debug!(sessions = snapshot.sessions.len(), "History flushed"),
            Err(e) => warn!(error = %e, "Failed to flush conversation history"),
        }
    }

    fn build_request(&self, history: Vec<ChatMessage>, prompt: &str) -> GenerationRequest {
        GenerationRequest {
            system: Some(self.model.system_prompt.clone()),
            history,
            prompt: prompt.to_string(),
            temperature: Some(self.model.temperature),
            max_output_tokens: Some(self.model.max_output_tokens),
        }
    }
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
    if text.chars().count() > LOG_PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}
