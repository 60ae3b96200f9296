//! LLM request/response types for Parley.
//!
//! Provider-agnostic shapes for a single non-streaming generation call and
//! the classified failures a provider can report.

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;

/// Request for one generation: prior turns plus the new user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Persona / system instruction sent alongside the conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Earlier messages of the session, oldest first.
    pub history: Vec<ChatMessage>,
    /// The new user message to answer.
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    /// A request with no history and no system prompt.
    pub fn single(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            history: Vec::new(),
            prompt: prompt.into(),
            temperature: None,
            max_output_tokens: None,
        }
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub content: String,
    pub model: String,
    #[serde(default)]
    pub usage: Usage,
}

/// Token usage reported by the provider, when available.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The API could not be reached, timed out, answered with an error, or
    /// answered with a body that carries no usable reply.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The access key is missing or was rejected by the API.
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl LlmError {
    /// Short machine-readable kind, used in logs and error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::UpstreamUnavailable(_) => "upstream_unavailable",
            LlmError::InvalidCredentials => "invalid_credentials",
        }
    }
}
