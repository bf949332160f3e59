//! KP analysis HTTP server.
//!
//! # Usage
//!
//! ```bash
//! VEDIC_API_KEY=... cargo run --bin kp-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `VEDIC_API_KEY`: Upstream API key (required by `/generate-params`)
//! - `KP_DATA_DIR`: Working directory for documents and reports (default: user_data)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use kp_analyzer::config::AppConfig;
use kp_analyzer::http::{create_router, AppState};
use kp_analyzer::services::{TimezoneResolver, TzfResolver, UpstreamClient, VedicApiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting KP analysis server");

    let config = AppConfig::load()?;
    std::fs::create_dir_all(&config.data_dir)?;
    info!("Data directory: {}", config.data_dir.display());

    let timezone = tokio::task::spawn_blocking(TzfResolver::new).await?;
    let timezone = Arc::new(timezone) as Arc<dyn TimezoneResolver>;
    info!("Time-zone boundaries loaded");

    let addr: SocketAddr = config.server.bind_address().parse()?;
    let state = match VedicApiClient::from_settings(&config.api) {
        Ok(client) => AppState::new(config, Arc::new(client) as Arc<dyn UpstreamClient>, timezone),
        Err(e) => {
            warn!("{}; report generation is disabled", e);
            AppState::without_client(config, timezone)
        }
    };
    let app = create_router(state);

    info!("Server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
