//! LLM provider implementations.
//!
//! Contains the concrete [`LlmProvider`](parley_core::llm::provider::LlmProvider)
//! implementation for Google Gemini, a provider factory ([`create_provider`])
//! and a connection test ([`test_provider_connection`]) used by the startup
//! probe.

pub mod gemini;

use secrecy::SecretString;

use parley_core::llm::box_provider::BoxLlmProvider;
use parley_types::config::ModelConfig;
use parley_types::llm::{GenerationRequest, LlmError};

use self::gemini::GeminiProvider;

/// Prompt sent by the startup probe.
pub const PROBE_PROMPT: &str = "Hello, who are you?";

/// Create a [`BoxLlmProvider`] for the configured model.
///
/// # Errors
///
/// Returns [`LlmError::InvalidCredentials`] if no API key is provided.
pub fn create_provider(
    config: &ModelConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    let key = api_key.ok_or(LlmError::InvalidCredentials)?;
    let provider = GeminiProvider::new(key, config)?;
    Ok(BoxLlmProvider::new(provider))
}

/// Test provider connectivity by sending a one-message completion request.
///
/// Returns the model's reply so the caller can log it.
///
/// # Errors
///
/// Returns the LLM error if the provider fails to respond.
pub async fn test_provider_connection(
    provider: &BoxLlmProvider,
    config: &ModelConfig,
) -> Result<String, LlmError> {
    let request = GenerationRequest {
        system: Some(config.system_prompt.clone()),
        temperature: Some(config.temperature),
        max_output_tokens: Some(config.max_output_tokens),
        ..GenerationRequest::single(PROBE_PROMPT)
    };
    let response = provider.generate(&request).await?;
    Ok(response.content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_gemini() {
        let provider =
            create_provider(&ModelConfig::default(), Some(SecretString::from("key"))).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-2.0-flash");
    }

    #[test]
    fn test_create_provider_missing_key() {
        match create_provider(&ModelConfig::default(), None) {
            Err(LlmError::InvalidCredentials) => {}
            Err(other) => panic!("Expected InvalidCredentials, got: {other}"),
            Ok(_) => panic!("Expected error but got Ok"),
        }
    }

    #[tokio::test]
    async fn test_probe_against_unreachable_host_fails() {
        let config = ModelConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
            ..ModelConfig::default()
        };
        let provider = create_provider(&config, Some(SecretString::from("key"))).unwrap();
        let err = test_provider_connection(&provider, &config).await.unwrap_err();
        assert!(matches!(err, LlmError::UpstreamUnavailable(_)));
    }
}
