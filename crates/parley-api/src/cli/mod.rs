//! CLI command definitions and dispatch for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. Every server option also
//! reads an environment variable, so container deployments can configure
//! the service without flags.

pub mod check_config;
pub mod serve;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Chat API server backed by Google Gemini.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Defaults to `serve` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve(ServeArgs),

    /// Print the effective configuration as JSON and exit.
    #[command(name = "check-config")]
    CheckConfig {
        /// Path to the TOML config file.
        #[arg(long, env = "PARLEY_CONFIG", default_value = "parley.toml")]
        config: PathBuf,
    },
}

/// Options for `parley serve`.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Host to bind to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Path to the TOML config file.
    #[arg(long, env = "PARLEY_CONFIG", default_value = "parley.toml")]
    pub config: PathBuf,

    /// Production mode: `info` log level and no error details in responses.
    #[arg(long, env = "PARLEY_PRODUCTION")]
    pub production: bool,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, env = "PARLEY_OTEL")]
    pub otel: bool,

    /// Send a test prompt to the model before accepting traffic.
    #[arg(long)]
    pub probe: bool,
}

/// Wrapper used to parse [`ServeArgs`] on its own when no subcommand is given.
#[derive(Parser)]
#[command(name = "parley")]
struct ServeOnly {
    #[command(flatten)]
    args: ServeArgs,
}

impl ServeArgs {
    /// Arguments for a bare `parley` invocation: defaults plus environment.
    pub fn from_env() -> Self {
        ServeOnly::parse_from(["parley"]).args
    }
}
