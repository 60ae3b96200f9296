//! Session HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/sessions                - List sessions
//! - GET  /api/sessions/{id}/messages  - Get messages for a session
//! - POST /api/sessions/{id}/clear     - Clear messages but keep session
//!
//! Unknown session ids are not errors: listing returns an empty sequence
//! and clearing succeeds.

use axum::Json;
use axum::extract::{Path, State};
use tracing::debug;

use crate::http::response::{ClearSessionResponse, SessionListResponse, SessionMessagesResponse};
use crate::state::AppState;

/// GET /api/sessions - Summaries of every known session.
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionListResponse> {
    let sessions = state.chat_service.store().list_sessions();
    debug!(total = sessions.len(), "Sessions listed");

    Json(SessionListResponse {
        success: true,
        total_sessions: sessions.len(),
        sessions,
    })
}

/// GET /api/sessions/{id}/messages - Messages of one session, oldest first.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<SessionMessagesResponse> {
    let messages = state.chat_service.store().list(&session_id);
    debug!(session_id = %session_id, count = messages.len(), "Session messages requested");

    Json(SessionMessagesResponse {
        success: true,
        message_count: messages.len(),
        session_id,
        messages,
    })
}

/// POST /api/sessions/{id}/clear - Reset a session to empty.
pub async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<ClearSessionResponse> {
    state.chat_service.clear_session(&session_id).await;

    Json(ClearSessionResponse {
        success: true,
        message: format!("Session {session_id} cleared"),
    })
}
