//! Business logic and repository trait definitions for Parley.
//!
//! This crate defines the "ports" (provider and repository traits) that the
//! infrastructure layer implements. It depends only on `parley-types` --
//! never on `parley-infra` or any network/IO crate.

pub mod chat;
pub mod llm;
pub mod session;
