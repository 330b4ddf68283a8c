use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docflow_core::{
    load_config, validate_config, EtlService, FileStorage, HttpEtlService, HttpFileStorage,
    HttpOcrService, OcrService,
};

use docflow_server::api::create_router;
use docflow_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("docflow {} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("DOCFLOW_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Storage service: {}", config.services.storage_url);
    info!("OCR service: {}", config.services.ocr_url);
    info!("ETL service: {}", config.services.etl_url);

    // Create collaborator clients
    let timeout = Duration::from_secs(u64::from(config.services.request_timeout_secs));
    let storage: Arc<dyn FileStorage> = Arc::new(
        HttpFileStorage::new(&config.services.storage_url, timeout)
            .context("Failed to create storage client")?,
    );
    let ocr: Arc<dyn OcrService> = Arc::new(
        HttpOcrService::new(&config.services.ocr_url, timeout)
            .context("Failed to create OCR client")?,
    );
    let etl: Arc<dyn EtlService> = Arc::new(
        HttpEtlService::new(&config.services.etl_url, timeout)
            .context("Failed to create ETL client")?,
    );

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), storage, ocr, etl));

    // Advisory health probe, never awaited
    state.prober().clone().spawn();

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
