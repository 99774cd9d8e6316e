//! YTGraphX web dashboard server

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ytgraph_app::{create_router, AppState};
use ytgraph_common::{YouTubeClient, YouTubeConfig};
use ytgraph_config::ConfigLoader;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ytgraph-web", author, version, about = "YTGraphX web dashboard", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding the configured one
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    info!("Starting YTGraphX dashboard");

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let client = YouTubeClient::new(
        YouTubeConfig::new(&config.youtube.api_key)
            .with_base_url(&config.youtube.base_url)
            .with_timeout(config.youtube.timeout_seconds),
    )?;

    let bind_address = args
        .bind
        .unwrap_or_else(|| config.dashboard.bind_address.clone());

    let state = AppState::new(Arc::new(config), client);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Dashboard listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", error);
        return;
    }
    info!("Received shutdown signal");
}
