//! Chat orchestration for Parley.
//!
//! `ChatService` runs a conversation turn against the session store and the
//! LLM provider. `HistoryRepository` is the port the flat-file history
//! implements.

pub mod repository;
pub mod service;
