//! Tracing subscriber initialization with console and log-file output and
//! optional OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! use parley_observe::tracing_setup::{TracingOptions, init_tracing};
//!
//! // Console only, development filter
//! init_tracing(TracingOptions::default()).unwrap();
//! ```

use std::fs::File;
use std::sync::{Mutex, OnceLock};

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// What to install in the global subscriber.
#[derive(Debug, Default)]
pub struct TracingOptions {
    /// Production mode raises the default level from `debug` to `info`.
    pub production: bool,
    /// Bridge spans to OpenTelemetry with a stdout exporter.
    pub otel: bool,
    /// Also write every event, without ANSI colours, to this file.
    pub log_file: Option<File>,
}

/// Filter used when `RUST_LOG` is unset.
pub fn default_directives(production: bool) -> &'static str {
    if production {
        "info"
    } else {
        "debug,hyper=info,hyper_util=info,h2=info,reqwest=info"
    }
}

/// Initialize the global tracing subscriber.
///
/// - Always installs a `fmt` layer on stdout.
/// - When `log_file` is set, adds a second `fmt` layer writing to it.
/// - When `otel` is true, bridges tracing spans to OpenTelemetry using a
///   stdout exporter.
/// - `RUST_LOG` takes precedence over [`default_directives`].
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(options: TracingOptions) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(options.production)));

    let stdout_layer = fmt::layer().with_target(true);
    let file_layer = options.log_file.map(file_layer);

    let otel_layer = if options.otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("parley");

        // Store the provider for shutdown and register it globally.
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Plain-text layer for the log file read back by the debug endpoint.
fn file_layer<S>(file: File) -> fmt::Layer<S, DefaultFields, Format, Mutex<File>> {
    fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// Safe to call even when OTel was not enabled (no-op in that case).
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}
