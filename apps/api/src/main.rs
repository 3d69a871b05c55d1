mod apod_client;
mod config;
mod db;
mod errors;
mod models;
mod repository;
mod routes;
mod service;
mod state;
mod storage;
#[cfg(test)]
mod testing;
mod validation;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::apod_client::ApodClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::repository::PgRepository;
use crate::routes::build_router;
use crate::service::ApodService;
use crate::state::AppState;
use crate::storage::{build_s3_client, S3Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; missing or malformed variables abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Astro API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config).await?;

    // Initialize S3
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.aws_bucket);

    // Initialize APOD client
    let apod_client = ApodClient::new(config.apod_api_url.clone())?;
    info!("APOD client initialized ({})", config.apod_api_url);

    let apod = ApodService::new(
        Arc::new(apod_client),
        Arc::new(S3Store::new(s3, config.aws_bucket.clone())),
        Arc::new(PgRepository::new(db)),
    );

    let app = build_router(AppState { apod })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM signal handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "Ctrl+C",
        _ = terminate => "SIGTERM",
    };

    info!(signal, "Shutdown signal received, draining connections");
}
