mod config;
mod errors;
mod handlers;
mod models;
mod sanitizer;
mod services;
#[cfg(feature = "http-server")]
mod server; // REST API for the mobile apps

use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;

use config::Config;
use handlers::{AnalysisHandler, ChatHandler};
use services::{OpenRouterService, VisionProvider};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables before the logger so RUST_LOG from .env applies
    dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("🚀 Starting Meal Vision Backend...");

    let config = Config::from_env()?;

    let provider: Arc<dyn VisionProvider> = Arc::new(OpenRouterService::new(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
        config.provider_timeout,
    )?);
    log::info!("✅ OpenRouter service initialized with model: {}", config.openrouter_model);

    let analysis_handler = Arc::new(AnalysisHandler::new(provider.clone()));
    let chat_handler = Arc::new(ChatHandler::new(provider));
    log::info!("✅ Handlers initialized");

    #[cfg(feature = "http-server")]
    {
        let app = server::create_router(analysis_handler, chat_handler, config.max_body_bytes);
        let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

        log::info!("🌐 HTTP server listening on {}", config.bind_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    }

    #[cfg(not(feature = "http-server"))]
    {
        let _ = (analysis_handler, chat_handler);
        log::warn!("⚠️ Built without the http-server feature, nothing to serve");
        shutdown_signal().await;
    }

    log::info!("🛑 Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("❌ Failed to listen for Ctrl+C: {}", e);
    }
}
