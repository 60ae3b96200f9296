//! Application error type mapping to HTTP status codes and the error envelope.
//!
//! ```json
//! { "success": false, "error": "Message cannot be empty", "code": "validation" }
//! ```
//!
//! Outside production mode the envelope also carries an `error_details`
//! object with the underlying error text, request id and elapsed time.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use parley_types::error::ChatError;
use parley_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request outside the chat service (e.g., unparseable JSON).
    Validation(String),
    /// Failure reported by the chat service.
    Chat(ChatError),
    /// Generic internal error.
    Internal(String),
    /// Another error plus diagnostic details for the envelope.
    Detailed(Box<AppError>, Value),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Chat(ChatError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Chat(ChatError::Llm(_)) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Detailed(inner, _) => inner.status(),
        }
    }

    /// Machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Chat(e) => e.kind(),
            AppError::Internal(_) => "internal",
            AppError::Detailed(inner, _) => inner.kind(),
        }
    }

    /// Message shown to callers. Upstream failures get a generic wording.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Chat(ChatError::Validation(msg)) => msg.clone(),
            AppError::Chat(ChatError::Llm(LlmError::InvalidCredentials)) => {
                "The language model rejected the configured credentials".to_string()
            }
            AppError::Chat(ChatError::Llm(_)) => {
                "The language model is currently unavailable".to_string()
            }
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::Detailed(inner, _) => inner.public_message(),
        }
    }

    /// Attach diagnostics unless running in production.
    pub fn with_details(
        self,
        production: bool,
        request_id: &str,
        processing_time: f64,
    ) -> AppError {
        if production {
            return self;
        }
        let details = json!({
            "kind": self.kind(),
            "message": self.to_string(),
            "request_id": request_id,
            "processing_time": processing_time,
        });
        AppError::Detailed(Box::new(self), details)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(msg) | AppError::Internal(msg) => f.write_str(msg),
            AppError::Chat(e) => write!(f, "{e}"),
            AppError::Detailed(inner, _) => write!(f, "{inner}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "error": self.public_message(),
            "code": self.kind(),
        });
        if let AppError::Detailed(_, details) = &self {
            body["error_details"] = details.clone();
        }

        (self.status(), Json(body)).into_response()
    }
}
