//! `parley serve`: wire the services and run the HTTP server.

use std::path::Path;

use anyhow::Context;
use secrecy::SecretString;
use tracing::{error, info, warn};

use parley_core::chat::service::ChatService;
use parley_infra::config::{API_KEY_ENV, load_service_config, resolve_api_key};
use parley_infra::history::JsonHistoryFile;
use parley_infra::llm::{create_provider, test_provider_connection};
use parley_infra::logfile::LogFile;
use parley_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
use parley_types::config::ServiceConfig;

use crate::cli::ServeArgs;
use crate::http;
use crate::state::AppState;

/// Characters of the probe reply echoed into the log.
const PROBE_PREVIEW_CHARS: usize = 100;

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    // Logging is not up yet, so a bad config file is reported once it is.
    let (config, config_error) = match load_service_config(&args.config).await {
        Ok(config) => (config, None),
        Err(e) => (ServiceConfig::default(), Some(e)),
    };

    let api_key = require_api_key(resolve_api_key(API_KEY_ENV))?;

    let log_file = LogFile::new(&config.storage.log_file);
    let log_handle = log_file
        .open_truncated()
        .with_context(|| format!("failed to open log file {}", log_file.path().display()))?;

    init_tracing(TracingOptions {
        production: args.production,
        otel: args.otel,
        log_file: Some(log_handle),
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    if let Some(e) = config_error {
        warn!("{e:#}, using defaults");
    }
    log_startup(&args, &config);

    let result = serve(args, config, api_key, log_file).await;
    if let Err(e) = &result {
        error!("Failed to start server: {e:#}");
    }
    shutdown_tracing();
    result
}

/// The server refuses to start without an API key.
fn require_api_key(key: Option<SecretString>) -> anyhow::Result<SecretString> {
    key.with_context(|| {
        format!("{API_KEY_ENV} environment variable not set; export it before starting parley")
    })
}

async fn serve(
    args: ServeArgs,
    config: ServiceConfig,
    api_key: SecretString,
    log_file: LogFile,
) -> anyhow::Result<()> {
    let provider = create_provider(&config.model, Some(api_key))?;

    if args.probe {
        info!(model = provider.model(), "Testing model before accepting traffic");
        let reply = test_provider_connection(&provider, &config.model)
            .await
            .context("startup probe failed")?;
        let preview: String = reply.chars().take(PROBE_PREVIEW_CHARS).collect();
        info!(reply = %preview, "Model test successful");
    }

    let history = JsonHistoryFile::new(&config.storage.history_file);
    let chat_service = ChatService::new(
        provider,
        history,
        config.model.clone(),
        config.server.default_session_id.clone(),
    );
    if let Err(e) = chat_service.load_history().await {
        warn!(
            path = %config.storage.history_file,
            error = %e,
            "Could not load conversation history, starting empty"
        );
    }

    let state = AppState::new(
        chat_service,
        log_file,
        args.production,
        config.server.log_tail_lines,
    );

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    print_banner(&addr, &config, Path::new(&config.storage.log_file));

    let router = http::router::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    println!("\n  Server stopped.");
    Ok(())
}

fn log_startup(args: &ServeArgs, config: &ServiceConfig) {
    info!(
        host = %args.host,
        port = args.port,
        production = args.production,
        model = %config.model.name,
        history_file = %config.storage.history_file,
        log_file = %config.storage.log_file,
        "Parley starting"
    );
}

fn print_banner(addr: &str, config: &ServiceConfig, log_path: &Path) {
    let base = format!("http://{addr}");
    println!();
    println!(
        "  {} Parley API listening on {}",
        console::style("⚡").bold(),
        console::style(&base).cyan()
    );
    println!(
        "  {} {}",
        console::style("Model:").dim(),
        console::style(&config.model.name).green()
    );
    println!("  {} {base}/health", console::style("Health:").dim());
    println!("  {} {base}/api/chat", console::style("Chat:").dim());
    println!(
        "  {} {}",
        console::style("Log file:").dim(),
        log_path.display()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());
    println!();
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
