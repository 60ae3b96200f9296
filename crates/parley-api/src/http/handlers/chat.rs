//! Chat HTTP handler.
//!
//! Endpoint:
//! - POST /api/chat - Send a message and receive the model's reply

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::response::{ChatRequest, ChatResponse};
use crate::state::AppState;

/// POST /api/chat - Run one conversation turn.
///
/// Body: `{"message": "...", "session_id": "..."}` where `session_id` is
/// optional. A malformed body, a missing or blank message, and a failed
/// generation all leave the session untouched.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();
    info!(request_id = %request_id, "Chat request received");

    let Json(request) = payload.map_err(|rejection| {
        warn!(
            request_id = %request_id,
            error = %rejection.body_text(),
            "Rejected chat request body"
        );
        AppError::Validation("Request must be a JSON object".to_string()).with_details(
            state.production,
            &request_id,
            start.elapsed().as_secs_f64(),
        )
    })?;

    let session_id = state
        .chat_service
        .resolve_session_id(request.session_id.as_deref());

    let turn = state
        .chat_service
        .send_message(Some(&session_id), request.message.as_deref())
        .await
        .map_err(|e| {
            let processing_time = start.elapsed().as_secs_f64();
            let err = AppError::from(e);
            if err.status().is_client_error() {
                warn!(
                    request_id = %request_id,
                    session_id = %session_id,
                    kind = err.kind(),
                    error = %err,
                    "Chat request rejected"
                );
            } else {
                error!(
                    request_id = %request_id,
                    session_id = %session_id,
                    kind = err.kind(),
                    error = %err,
                    processing_time,
                    "Chat request failed"
                );
            }
            err.with_details(state.production, &request_id, processing_time)
        })?;

    let processing_time = start.elapsed().as_secs_f64();
    info!(
        request_id = %request_id,
        session_id = %turn.session_id,
        message_count = turn.message_count,
        model = %turn.model,
        processing_time,
        "Chat request processed"
    );

    Ok(Json(ChatResponse {
        success: true,
        response: turn.reply,
        session_id: turn.session_id,
        message_count: turn.message_count,
        processing_time,
        request_id,
        timestamp: chrono::Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use parley_types::llm::LlmError;
    use tempfile::TempDir;

    use super::*;
    use crate::http::handlers::test_support::{MockProvider, into_json, test_state};

    fn body(message: Option<&str>, session_id: Option<&str>) -> Result<Json<ChatRequest>, JsonRejection> {
        Ok(Json(ChatRequest {
            message: message.map(str::to_string),
            session_id: session_id.map(str::to_string),
        }))
    }

    #[tokio::test]
    async fn chat_success_reports_message_count() {
        let tmp = TempDir::new().unwrap();
        let state = test_state(
            &tmp,
            MockProvider::with(vec![Ok("hello".to_string())]),
            false,
        );

        let Json(resp) = chat(State(state.clone()), body(Some("hi"), Some("s1")))
            .await
            .unwrap();
        assert!(resp.success);
        assert_eq!(resp.response, "hello");
        assert_eq!(resp.session_id, "s1");
        assert_eq!(resp.message_count, 2);
        assert!(resp.processing_time >= 0.0);
        assert!(!resp.request_id.is_empty());

        let messages = state.chat_service.store().list("s1");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "hi");
        assert_eq!(messages[1].content, "hello");
    }

    #[tokio::test]
    async fn chat_defaults_session_id() {
        let tmp = TempDir::new().unwrap();
        let state = test_state(&tmp, MockProvider::default(), false);

        let Json(resp) = chat(State(state.clone()), body(Some("ahoy"), None))
            .await
            .unwrap();
        assert_eq!(resp.session_id, "default_session");

        let Json(resp) = chat(State(state), body(Some("again"), Some("   ")))
            .await
            .unwrap();
        assert_eq!(resp.session_id, "default_session");
        assert_eq!(resp.message_count, 4);
    }

    #[tokio::test]
    async fn chat_rejects_blank_message_without_mutation() {
        let tmp = TempDir::new().unwrap();
        let state = test_state(&tmp, MockProvider::default(), false);

        for message in [None, Some(""), Some("  \n\t ")] {
            let err = chat(State(state.clone()), body(message, Some("s1")))
                .await
                .unwrap_err();
            let (status, json) = into_json(err).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["success"], false);
            assert_eq!(json["code"], "validation");
        }
        assert_eq!(state.chat_service.store().session_count(), 0);
    }

    #[tokio::test]
    async fn chat_upstream_failure_records_nothing() {
        let tmp = TempDir::new().unwrap();
        let state = test_state(
            &tmp,
            MockProvider::with(vec![
                Ok("first reply".to_string()),
                Err(LlmError::UpstreamUnavailable("HTTP 503".to_string())),
            ]),
            false,
        );

        chat(State(state.clone()), body(Some("one"), Some("s1")))
            .await
            .unwrap();
        let err = chat(State(state.clone()), body(Some("two"), Some("s1")))
            .await
            .unwrap_err();

        let (status, json) = into_json(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["code"], "upstream_unavailable");
        assert!(json["error_details"]["request_id"].is_string());
        assert_eq!(state.chat_service.store().message_count("s1"), 2);
    }

    #[tokio::test]
    async fn chat_failure_in_production_has_no_details() {
        let tmp = TempDir::new().unwrap();
        let state = test_state(
            &tmp,
            MockProvider::with(vec![Err(LlmError::InvalidCredentials)]),
            true,
        );

        let err = chat(State(state), body(Some("hi"), None)).await.unwrap_err();
        let (status, json) = into_json(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["code"], "invalid_credentials");
        assert!(json.get("error_details").is_none());
    }

    #[tokio::test]
    async fn chat_flushes_history_file() {
        let tmp = TempDir::new().unwrap();
        let state = test_state(&tmp, MockProvider::default(), false);

        chat(State(state), body(Some("remember me"), Some("s9")))
            .await
            .unwrap();

        let saved = std::fs::read_to_string(tmp.path().join("chat_history.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert_eq!(
            json["sessions"]["s9"]["messages"][0]["content"],
            "remember me"
        );
    }
}
