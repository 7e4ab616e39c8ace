//! # Cirrus Server
//!
//! Serves the gallery's resource listing and upload signing endpoints.
//!
//! Configuration comes from the environment (a `.env` file is honoured),
//! then `cirrus.toml`, then defaults. `--host`/`--port` override both.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use cirrus_server::{
    AppState, create_app,
    infra::config::{Config, ConfigLoad, ConfigLoader},
};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "cirrus-server")]
#[command(about = "Resource listing and upload signing for the Cirrus gallery")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "CIRRUS_CONFIG")]
    config: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_runtime_config(&cli)?;

    let state = AppState::from_config(Arc::clone(&config))
        .context("failed to initialise media provider")?;
    let router = create_app(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Starting Cirrus server (HTTP) on {}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Cirrus server stopped");
    Ok(())
}

fn load_runtime_config(cli: &Cli) -> anyhow::Result<Arc<Config>> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }

    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }

    info!(
        cloud_name = ?config.cloudinary.cloud_name,
        library_tag = ?config.cloudinary.library_tag,
        algorithm = %config.cloudinary.signature_algorithm,
        remote_patterns = config.remote_patterns.len(),
        dev_mode = config.dev_mode,
        "configuration in effect"
    );

    Ok(Arc::new(config))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
