//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends requests to the Generative Language API
//! (`/models/{model}:generateContent`) with the key in the
//! `x-goog-api-key` header. Non-streaming only.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use parley_core::llm::provider::LlmProvider;
use parley_types::chat::MessageRole;
use parley_types::config::ModelConfig;
use parley_types::llm::{GenerationRequest, GenerationResponse, LlmError, Usage};

use super::types::{
    GeminiContent, GeminiErrorEnvelope, GeminiGenerationConfig, GeminiRequest, GeminiResponse,
};

/// Google Gemini LLM provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a provider for the model, base URL and timeout in `config`.
    pub fn new(api_key: SecretString, config: &ModelConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::UpstreamUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.name.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Convert a generic [`GenerationRequest`] into a [`GeminiRequest`].
    fn to_gemini_request(request: &GenerationRequest) -> GeminiRequest {
        let mut contents: Vec<GeminiContent> = request
            .history
            .iter()
            .map(|m| {
                let role = match m.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "model",
                };
                GeminiContent::text(Some(role), &m.content)
            })
            .collect();
        contents.push(GeminiContent::text(Some("user"), &request.prompt));

        GeminiRequest {
            system_instruction: request
                .system
                .as_deref()
                .map(|s| GeminiContent::text(None, s)),
            contents,
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        }
    }

    /// Classify a non-success HTTP status and its body.
    fn classify_error(status: StatusCode, body: &str) -> LlmError {
        let parsed = serde_json::from_str::<GeminiErrorEnvelope>(body).ok();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::InvalidCredentials,
            StatusCode::BAD_REQUEST if parsed.as_ref().is_some_and(|e| e.error.is_invalid_key()) => {
                LlmError::InvalidCredentials
            }
            _ => {
                let detail = parsed
                    .map(|e| format!("{} {}", e.error.status, e.error.message).trim().to_string())
                    .unwrap_or_else(|| body.chars().take(200).collect());
                LlmError::UpstreamUnavailable(format!("HTTP {status}: {detail}"))
            }
        }
    }
}

// GeminiProvider does NOT derive Debug; the SecretString already redacts
// the key but the client internals are of no use in logs either.

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(LlmError::InvalidCredentials);
        }

        let body = Self::to_gemini_request(request);
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() { "timed out" } else { "failed" };
                LlmError::UpstreamUnavailable(format!("HTTP request {reason}: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::classify_error(status, &error_body));
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::UpstreamUnavailable(format!("failed to parse response: {e}")))?;

        let content = gemini_resp.text().ok_or_else(|| {
            let reason = gemini_resp
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            LlmError::UpstreamUnavailable(format!("response contained no text ({reason})"))
        })?;

        let usage = gemini_resp
            .usage_metadata
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(GenerationResponse {
            content,
            model: gemini_resp.model_version.unwrap_or_else(|| self.model.clone()),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use parley_types::chat::ChatMessage;
    use serde_json::{Value, json};

    use super::*;

    #[derive(Clone)]
    struct Mock {
        status: StatusCode,
        body: Value,
        delay: Duration,
        seen: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
    }

    async fn mock_handler(
        State(mock): State<Mock>,
        Path(action): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let key = headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        mock.seen.lock().unwrap().push((action, key, body));
        tokio::time::sleep(mock.delay).await;
        (mock.status, Json(mock.body.clone()))
    }

    /// Serve `body` with `status` on a random local port and return a config pointing at it.
    async fn spawn_mock(status: StatusCode, body: Value, delay: Duration) -> (ModelConfig, Mock) {
        let mock = Mock {
            status,
            body,
            delay,
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/models/{action}", post(mock_handler))
            .with_state(mock.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = ModelConfig {
            base_url: format!("http://{addr}/"),
            timeout_secs: 1,
            ..ModelConfig::default()
        };
        (config, mock)
    }

    fn ok_body(text: &str) -> Value {
        json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}],
            "usageMetadata": {"promptTokenCount": 7, "candidatesTokenCount": 3},
            "modelVersion": "gemini-2.0-flash-001"
        })
    }

    fn request_with_history() -> GenerationRequest {
        GenerationRequest {
            system: Some("You are a pirate.".to_string()),
            history: vec![ChatMessage::user("hi"), ChatMessage::assistant("ahoy")],
            prompt: "where is the rum?".to_string(),
            temperature: Some(0.2),
            max_output_tokens: Some(128),
        }
    }

    #[test]
    fn test_to_gemini_request_maps_roles() {
        let req = GeminiProvider::to_gemini_request(&request_with_history());
        let roles: Vec<&str> = req
            .contents
            .iter()
            .map(|c| c.role.as_deref().unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(
            req.contents[2].parts[0].text.as_deref(),
            Some("where is the rum?")
        );
        assert!(req.system_instruction.is_some());
        assert_eq!(req.generation_config.temperature, Some(0.2));
    }

    #[test]
    fn test_classify_error() {
        assert!(matches!(
            GeminiProvider::classify_error(StatusCode::FORBIDDEN, ""),
            LlmError::InvalidCredentials
        ));
        let invalid_key = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#;
        assert!(matches!(
            GeminiProvider::classify_error(StatusCode::BAD_REQUEST, invalid_key),
            LlmError::InvalidCredentials
        ));
        match GeminiProvider::classify_error(StatusCode::SERVICE_UNAVAILABLE, "overloaded") {
            LlmError::UpstreamUnavailable(msg) => assert!(msg.contains("503")),
            other => panic!("expected UpstreamUnavailable, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_generate_success() {
        let (config, mock) = spawn_mock(StatusCode::OK, ok_body("Savvy?"), Duration::ZERO).await;
        let provider = GeminiProvider::new(SecretString::from("test-key"), &config).unwrap();

        let resp = provider.generate(&request_with_history()).await.unwrap();
        assert_eq!(resp.content, "Savvy?");
        assert_eq!(resp.model, "gemini-2.0-flash-001");
        assert_eq!(resp.usage.input_tokens, 7);
        assert_eq!(resp.usage.output_tokens, 3);

        let seen = mock.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (action, key, body) = &seen[0];
        assert_eq!(action, "gemini-2.0-flash:generateContent");
        assert_eq!(key.as_deref(), Some("test-key"));
        assert_eq!(body["contents"].as_array().unwrap().len(), 3);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are a pirate.");
    }

    #[tokio::test]
    async fn test_generate_rejected_key() {
        let body = json!({"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT",
            "details": [{"reason": "API_KEY_INVALID"}]}});
        let (config, _mock) = spawn_mock(StatusCode::BAD_REQUEST, body, Duration::ZERO).await;
        let provider = GeminiProvider::new(SecretString::from("wrong"), &config).unwrap();

        let err = provider.generate(&request_with_history()).await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_generate_empty_key_skips_call() {
        let (config, mock) = spawn_mock(StatusCode::OK, ok_body("unused"), Duration::ZERO).await;
        let provider = GeminiProvider::new(SecretString::from("  "), &config).unwrap();

        let err = provider.generate(&request_with_history()).await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidCredentials));
        assert!(mock.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_server_error() {
        let body = json!({"error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}});
        let (config, _mock) = spawn_mock(StatusCode::SERVICE_UNAVAILABLE, body, Duration::ZERO).await;
        let provider = GeminiProvider::new(SecretString::from("test-key"), &config).unwrap();

        match provider.generate(&request_with_history()).await {
            Err(LlmError::UpstreamUnavailable(msg)) => assert!(msg.contains("overloaded")),
            other => panic!("expected UpstreamUnavailable, got {:?}", other.map(|r| r.content)),
        }
    }

    #[tokio::test]
    async fn test_generate_blocked_response_has_no_text() {
        let body = json!({"candidates": [{"finishReason": "SAFETY"}]});
        let (config, _mock) = spawn_mock(StatusCode::OK, body, Duration::ZERO).await;
        let provider = GeminiProvider::new(SecretString::from("test-key"), &config).unwrap();

        match provider.generate(&request_with_history()).await {
            Err(LlmError::UpstreamUnavailable(msg)) => assert!(msg.contains("SAFETY")),
            other => panic!("expected UpstreamUnavailable, got {:?}", other.map(|r| r.content)),
        }
    }

    #[tokio::test]
    async fn test_generate_non_json_body() {
        // A proxy answering 200 with an HTML page instead of the API.
        let app = Router::new().route(
            "/models/{action}",
            post(|| async { "<html>proxy page</html>" }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let config = ModelConfig {
            base_url: format!("http://{addr}/"),
            timeout_secs: 1,
            ..ModelConfig::default()
        };
        let provider = GeminiProvider::new(SecretString::from("test-key"), &config).unwrap();

        match provider.generate(&request_with_history()).await {
            Err(err @ LlmError::UpstreamUnavailable(_)) => {
                assert_eq!(err.kind(), "upstream_unavailable");
                assert!(err.to_string().contains("failed to parse response"));
            }
            other => panic!("expected UpstreamUnavailable, got {:?}", other.map(|r| r.content)),
        }
    }

    #[tokio::test]
    async fn test_generate_timeout() {
        let (config, _mock) =
            spawn_mock(StatusCode::OK, ok_body("late"), Duration::from_secs(3)).await;
        let provider = GeminiProvider::new(SecretString::from("test-key"), &config).unwrap();

        let err = provider.generate(&request_with_history()).await.unwrap_err();
        assert!(matches!(err, LlmError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_generate_unreachable() {
        let config = ModelConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
            ..ModelConfig::default()
        };
        let provider = GeminiProvider::new(SecretString::from("test-key"), &config).unwrap();

        let err = provider.generate(&request_with_history()).await.unwrap_err();
        assert!(matches!(err, LlmError::UpstreamUnavailable(_)));
    }
}
