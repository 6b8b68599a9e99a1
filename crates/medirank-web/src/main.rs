//! Medirank Web Server
//!
//! Run with: cargo run -p medirank-web

use anyhow::Context;
use medirank_config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("medirank=debug,info")),
        )
        .init();

    info!("Starting Medirank Web Server...");

    let config = Config::load().context("Failed to load configuration")?;

    // Model and tables are loaded once, before the first request
    let state = medirank_web::state::AppState::load(&config)?;

    let app = medirank_web::router::build_router(state, config.server.cors);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
