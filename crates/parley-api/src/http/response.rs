//! Response bodies for the JSON API.
//!
//! Every body is a flat object. Successful responses carry
//! `"success": true`; health and ping use a `status` field instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parley_types::chat::{ChatMessage, SessionSummary};

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub session_id: String,
    pub message_count: usize,
    /// Seconds spent handling the request.
    pub processing_time: f64,
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub success: bool,
    pub sessions: Vec<SessionSummary>,
    pub total_sessions: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionMessagesResponse {
    pub success: bool,
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub message_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ClearSessionResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DebugLogsResponse {
    pub success: bool,
    pub lines: Vec<String>,
    pub log_count: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub model: String,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
    pub active_sessions: usize,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}
