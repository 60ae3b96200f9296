use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors surfaced by the chat service to the HTTP layer.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Malformed or missing request fields. Nothing was mutated.
    #[error("{0}")]
    Validation(String),

    /// The model adapter failed. Nothing was recorded for the turn.
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl ChatError {
    /// Short machine-readable kind, used in logs and error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::Validation(_) => "validation",
            ChatError::Llm(e) => e.kind(),
        }
    }
}
