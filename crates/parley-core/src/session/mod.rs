//! Session bookkeeping for Parley.
//!
//! [`store::SessionStore`] maps an opaque session identifier to the ordered
//! conversation exchanged under it.

pub mod store;
