//! Application state for the HTTP server.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::error::{KpError, KpResult};
use crate::services::{TimezoneResolver, UpstreamClient};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Source of upstream chart documents; absent when no API key is configured
    pub client: Option<Arc<dyn UpstreamClient>>,
    pub timezone: Arc<dyn TimezoneResolver>,
    /// Runs share one data directory, so only one may be in flight
    pub run_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        client: Arc<dyn UpstreamClient>,
        timezone: Arc<dyn TimezoneResolver>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            client: Some(client),
            timezone,
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// State for a server that can answer health checks but not fetch charts.
    pub fn without_client(config: AppConfig, timezone: Arc<dyn TimezoneResolver>) -> Self {
        Self {
            config: Arc::new(config),
            client: None,
            timezone,
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The upstream client, or the configuration error explaining its absence.
    pub fn upstream(&self) -> KpResult<Arc<dyn UpstreamClient>> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        self.config.api.require_key()?;
        Err(KpError::Configuration(
            "Upstream client is not available".to_string(),
        ))
    }
}
