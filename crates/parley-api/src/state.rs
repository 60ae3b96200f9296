//! Application state wiring all services together.
//!
//! The chat service is generic over its history repository; AppState pins it
//! to the JSON history file from parley-infra.

use std::sync::Arc;

use parley_core::chat::service::ChatService;
use parley_infra::history::JsonHistoryFile;
use parley_infra::logfile::LogFile;

pub type ConcreteChatService = ChatService<JsonHistoryFile>;

/// Shared application state handed to every handler through axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub log_file: LogFile,
    /// Hides `error_details` from error responses.
    pub production: bool,
    /// Lines returned by the debug log endpoint.
    pub log_tail_lines: usize,
}

impl AppState {
    pub fn new(
        chat_service: ConcreteChatService,
        log_file: LogFile,
        production: bool,
        log_tail_lines: usize,
    ) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
            log_file,
            production,
            log_tail_lines,
        }
    }
}
