//! Infrastructure layer for Parley.
//!
//! Contains implementations of the traits defined in `parley-core`: the
//! Gemini LLM provider and the JSON history file, plus the config loader
//! and the log file reader behind the debug endpoint.

pub mod config;
pub mod history;
pub mod llm;
pub mod logfile;
