//! HTTP request handlers for the REST API.

pub mod chat;
pub mod debug;
pub mod health;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;
