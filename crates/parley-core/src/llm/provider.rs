//! LlmProvider trait definition.
//!
//! This is the boundary every hosted generation API sits behind. Uses RPITIT
//! for `generate` (Rust 2024 edition).

use parley_types::llm::{GenerationRequest, GenerationResponse, LlmError};

/// Trait for LLM provider backends (Gemini, ...).
///
/// Implementations live in parley-infra (e.g., `GeminiProvider`). A provider
/// performs exactly one outbound call per `generate` and never touches the
/// session store.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send the conversation and receive the generated reply.
    ///
    /// Fails with [`LlmError::InvalidCredentials`] when the access key is
    /// missing or rejected, and with [`LlmError::UpstreamUnavailable`] when
    /// the API cannot be reached or answers with an error status.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<GenerationResponse, LlmError>> + Send;
}
