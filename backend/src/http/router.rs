//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/generate-params", post(handlers::generate_params))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::AppConfig;
    use crate::services::{FixedOffset, UpstreamClient, VedicApiClient};

    #[test]
    fn test_router_creation() {
        let mut config = AppConfig::default();
        config.api.api_key = Some("test".to_string());
        let client = Arc::new(VedicApiClient::from_settings(&config.api).unwrap()) as Arc<dyn UpstreamClient>;
        let state = AppState::new(config, client, Arc::new(FixedOffset(5.5)));
        let _router = create_router(state);
    }
}
