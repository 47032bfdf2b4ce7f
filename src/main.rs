//! Aarogyam Service - Main Entry Point
//!
//! Medical image and health report analysis over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aarogyam::api::{self, AppState};
use aarogyam::types::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "aarogyam=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;

    info!("Starting Aarogyam v{}", env!("CARGO_PKG_VERSION"));
    info!(
        model = %config.gemini_model,
        section_limit = config.section_limit,
        translation_limit = config.translation_limit,
        "Analysis settings"
    );
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set, /analyze will answer 503");
    }
    if config.opencage_api_key.is_none() {
        warn!("OPENCAGE_API_KEY not set, hospital lookup disabled");
    }

    let port = config.port;
    let state = Arc::new(AppState::from_config(config)?);
    let app = api::router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
