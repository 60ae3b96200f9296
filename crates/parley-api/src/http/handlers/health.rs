//! Liveness endpoints. No side effects.

use axum::Json;
use axum::extract::State;

use crate::http::response::{HealthResponse, PingResponse};
use crate::state::AppState;

/// GET /health and /api/health - Static status plus live session count.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    tracing::debug!("Health check requested");
    Json(HealthResponse {
        status: "healthy",
        service: "parley",
        model: state.chat_service.provider().model().to_string(),
        message: "Chat API is running",
        timestamp: chrono::Utc::now(),
        active_sessions: state.chat_service.store().session_count(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /ping
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        message: "pong",
        timestamp: chrono::Utc::now(),
    })
}
