//! Observability setup for Parley: console and log-file output through
//! `tracing`, with optional OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
