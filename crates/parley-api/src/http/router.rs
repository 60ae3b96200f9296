//! Axum router configuration with middleware.
//!
//! Middleware: CORS (any origin), request tracing. Unknown paths get a JSON
//! 404 listing the available endpoints.

use axum::Json;
use axum::Router;
use axum::http::{StatusCode, Uri};
use axum::routing::{get, post};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Paths advertised by the 404 fallback.
pub const AVAILABLE_ENDPOINTS: &[&str] = &[
    "/health",
    "/api/health",
    "/ping",
    "/api/chat",
    "/api/sessions",
    "/api/sessions/{session_id}/messages",
    "/api/sessions/{session_id}/clear",
    "/api/debug/logs",
];

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/chat", post(handlers::chat::chat))
        .route("/sessions", get(handlers::session::list_sessions))
        .route(
            "/sessions/{id}/messages",
            get(handlers::session::get_messages),
        )
        .route(
            "/sessions/{id}/clear",
            post(handlers::session::clear_session),
        )
        .route("/debug/logs", get(handlers::debug::get_logs));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health::health_check))
        .route("/ping", get(handlers::health::ping))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    tracing::warn!(path = %uri.path(), "404 for unknown path");
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Endpoint not found",
            "path": uri.path(),
            "available_endpoints": AVAILABLE_ENDPOINTS,
        })),
    )
}
