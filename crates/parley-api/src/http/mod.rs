//! HTTP/REST API layer for Parley.
//!
//! Axum-based JSON API: chat, session inspection, health and a debug log
//! tail. Responses are flat objects carrying a `success` flag.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
