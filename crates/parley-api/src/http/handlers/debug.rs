//! Debug log tail.
//!
//! GET /api/debug/logs - Most recent lines of the service log file.

use axum::Json;
use axum::extract::State;

use crate::http::error::AppError;
use crate::http::response::DebugLogsResponse;
use crate::state::AppState;

/// GET /api/debug/logs - The last `log_tail_lines` lines, oldest first.
pub async fn get_logs(State(state): State<AppState>) -> Result<Json<DebugLogsResponse>, AppError> {
    let lines = state
        .log_file
        .tail(state.log_tail_lines)
        .await
        .map_err(|e| {
            tracing::error!(path = %state.log_file.path().display(), error = %e, "Failed to read log file");
            AppError::Internal(format!("failed to read log file: {e}"))
        })?;

    Ok(Json(DebugLogsResponse {
        success: true,
        log_count: lines.len(),
        lines,
    }))
}
