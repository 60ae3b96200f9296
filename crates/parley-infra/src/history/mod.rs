//! Flat-file conversation history.

pub mod json_file;

pub use json_file::JsonHistoryFile;
