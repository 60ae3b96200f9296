//! Shared fixtures for handler tests: a scripted provider and a state backed
//! by files in a temporary directory.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tempfile::TempDir;

use parley_core::chat::service::ChatService;
use parley_core::llm::box_provider::BoxLlmProvider;
use parley_core::llm::provider::LlmProvider;
use parley_infra::history::JsonHistoryFile;
use parley_infra::logfile::LogFile;
use parley_types::config::ModelConfig;
use parley_types::llm::{GenerationRequest, GenerationResponse, LlmError, Usage};

use crate::state::AppState;

/// Replays scripted outcomes in order; answers "Aye" once the script runs out.
#[derive(Clone, Default)]
pub struct MockProvider {
    outcomes: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
}

impl MockProvider {
    pub fn with(outcomes: Vec<Result<String, LlmError>>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(outcomes.into())),
        }
    }
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<GenerationResponse, LlmError> {
        let next = self.outcomes.lock().unwrap().pop_front();
        let content = next.unwrap_or_else(|| Ok("Aye".to_string()))?;
        Ok(GenerationResponse {
            content,
            model: "mock-model".to_string(),
            usage: Usage::default(),
        })
    }
}

/// Build an `AppState` whose history and log files live in `tmp`.
pub fn test_state(tmp: &TempDir, provider: MockProvider, production: bool) -> AppState {
    let history = JsonHistoryFile::new(tmp.path().join("chat_history.json"));
    let service = ChatService::new(
        BoxLlmProvider::new(provider),
        history,
        ModelConfig::default(),
        "default_session",
    );
    AppState::new(
        service,
        LogFile::new(tmp.path().join("parley.log")),
        production,
        100,
    )
}

/// Status and decoded JSON body of any response.
pub async fn into_json(resp: impl IntoResponse) -> (axum::http::StatusCode, Value) {
    let resp: Response = resp.into_response();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
