//! Stratus Service - Background poller and HTTP API.
//!
//! Run with: `cargo run -p stratus-service`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use stratus_provider::HttpProvider;
use stratus_service::{AppState, Config, Poller, api};
use stratus_store::Store;

/// Stratus Service - Background poller and HTTP REST API.
#[derive(Parser, Debug)]
#[command(name = "stratus-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config).
    #[arg(short, long)]
    bind: Option<String>,

    /// Database path (overrides config).
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Provider base URL (overrides config).
    #[arg(short = 'p', long)]
    provider_url: Option<String>,

    /// Disable the background poller (API only mode).
    #[arg(long)]
    no_poller: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stratus_service=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };

    // Override config with CLI args
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(db_path) = args.database {
        config.storage.path = db_path;
    }
    if let Some(url) = args.provider_url {
        config.provider.base_url = url;
    }
    config.validate()?;

    // Open the database
    info!("Opening database at {:?}", config.storage.path);
    let store = Store::open(&config.storage.path)?;

    // Connect the provider client
    let provider = HttpProvider::with_timeout(
        &config.provider.base_url,
        Duration::from_secs(config.provider.timeout_secs),
    )?;

    // Create application state
    let state = AppState::new(store, Arc::new(provider), config.clone());

    // Start the background poller
    if !args.no_poller {
        Poller::new(Arc::clone(&state)).start().await;
    } else {
        info!("Background poller disabled");
    }

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(Arc::clone(&state));

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse()?;

    info!("Starting server on {}", addr);

    // Run the server until ctrl-c
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

/// Resolve on ctrl-c, stopping the poller before the server drains.
async fn shutdown_signal(state: Arc<AppState>) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    info!("Shutdown signal received");
    state.poller.signal_stop();
}
