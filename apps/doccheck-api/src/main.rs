//! Doccheck API Server - document rule verification backend

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use doccheck_api::app;
use doccheck_api::state::{AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("doccheck_api=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let config = Config::from_env();
    info!("Initializing doccheck API...");
    let state = Arc::new(AppState::new(config.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting doccheck API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
