//! Parley CLI and REST API entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, then either starts the chat API server (the
//! default) or prints the effective configuration.

mod cli;
mod http;
mod state;

use clap::Parser;

use cli::{Cli, Commands, ServeArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve(args)) => cli::serve::run(args).await,
        Some(Commands::CheckConfig { config }) => cli::check_config::run(&config).await,
        None => cli::serve::run(ServeArgs::from_env()).await,
    }
}
