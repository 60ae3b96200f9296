//! Shared domain types for Parley.
//!
//! Chat messages and sessions, LLM request/response shapes, service
//! configuration and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
