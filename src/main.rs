//! Site Server - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Initialize logging
//! 2. Load configuration from environment variables
//! 3. Open the JSON document store in `DATA_DIR`
//! 4. Build the HTTP router with routes and middleware
//! 5. Start server on configured port

use std::sync::Arc;

use site_server::{build_router, config::Config, state::AppState, storage::FileStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    if config.session_secret().is_none() {
        tracing::warn!("ADMIN_SESSION_SECRET is not set; admin login is disabled");
    }
    if config.tg_bot_token.is_none() || config.tg_chat_id.is_none() {
        tracing::warn!("TG_BOT_TOKEN/TG_CHAT_ID not set; lead requests will fail");
    }

    let docs = Arc::new(FileStore::new(config.data_dir.clone()));
    tracing::info!(data_dir = %config.data_dir.display(), "Document store ready");

    let port = config.server_port;
    let state = AppState::new(config, docs)?;
    let app = build_router(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
