mod config;
mod error;
mod handlers;
mod models;
mod server;
mod services;

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;

use config::Config;
use server::{create_router, AppState};
use services::{AnalysisGateway, AzureVisionClient, UploadManager};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables before the logger so RUST_LOG from .env applies
    dotenv().ok();
    env_logger::init();

    log::info!("🚀 Starting vision gateway...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Invalid configuration: {:#}", e);
            return Err(e);
        }
    };

    let backend = AzureVisionClient::new(
        config.api_key.clone(),
        config.endpoint.clone(),
        config.backend_timeout,
    )?;
    let gateway = Arc::new(AnalysisGateway::new(Arc::new(backend)));
    log::info!("✅ Azure vision client initialized for {}", config.endpoint);

    let uploads = Arc::new(UploadManager::new(config.upload_dir.clone()));
    uploads.prepare().await?;

    let state = AppState::new(gateway, uploads, &config.public_base_url);
    let app = create_router(state, config.max_upload_bytes);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!("✅ Server running at {}", config.public_base_url);
    log::info!("📘 Docs: {}", config.docs_url());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("🛑 Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("❌ Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
