//! CI Mock Node - fixture-backed HTTP backend for the CI web client.
//!
//! This is the main entry point for serving the mock API.

use anyhow::Context;
use ci_mock_node::api::{create_router, ApiOptions, AppState};
use ci_mock_node::config::ServerConfig;
use ci_mock_node::observability::{init_logging, LogFormat};
use ci_mock_store::{FixtureSet, FixtureStore};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;

/// CI Mock Node - canned CI API for web client development
#[derive(Parser, Debug)]
#[command(name = "ci-mock-node")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API listen address
    #[arg(long)]
    api_addr: Option<SocketAddr>,

    /// Fixture file (YAML or JSON); the built-in scenario is used otherwise
    #[arg(long)]
    fixtures: Option<PathBuf>,

    /// Token accepted by the user endpoint
    #[arg(long)]
    auth_token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long)]
    log_format: Option<String>,

    /// Do not send CORS headers
    #[arg(long)]
    no_cors: bool,

    /// Do not create a repository when a hook is updated
    #[arg(long)]
    no_hook_repository: bool,
}

impl Args {
    /// Apply explicit flags over the loaded configuration.
    fn apply(self, config: &mut ServerConfig) {
        if let Some(addr) = self.api_addr {
            config.api_addr = addr;
        }
        if let Some(path) = self.fixtures {
            config.fixtures = Some(path);
        }
        if let Some(token) = self.auth_token {
            config.auth_token = token;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if self.no_cors {
            config.cors = false;
        }
        if self.no_hook_repository {
            config.hook_update_creates_repository = false;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config =
        ServerConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    args.apply(&mut config);

    init_logging(&config.log_level, LogFormat::parse(&config.log_format));

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting CI mock node");

    let fixtures = match &config.fixtures {
        Some(path) => FixtureSet::from_path(path)
            .with_context(|| format!("failed to load fixtures from {}", path.display()))?,
        None => FixtureSet::default_scenario().context("failed to load built-in fixtures")?,
    };
    let store = FixtureStore::with_fixtures(fixtures).context("failed to seed fixture store")?;

    tracing::info!(
        api_addr = %config.api_addr,
        fixtures = store.len(),
        cors = config.cors,
        hook_update_creates_repository = config.hook_update_creates_repository,
        "Node configuration"
    );

    let state = AppState::with_options(Arc::new(store), ApiOptions::from(&config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.api_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.api_addr))?;

    tracing::info!(addr = %config.api_addr, "Node is ready. Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("CI mock node stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        }
    }
}
