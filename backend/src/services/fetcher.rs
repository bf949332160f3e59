//! Upstream astrology API client and the per-domain download step.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ApiSettings;
use crate::error::{KpError, KpResult};
use crate::models::{Domain, ALL_DOMAINS};

/// Birth data sent with every upstream request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartParams {
    /// Date of birth, DD/MM/YYYY
    pub dob: String,
    /// Time of birth, HH:MM
    pub tob: String,
    pub lat: f64,
    pub lon: f64,
    /// UTC offset in hours
    pub tz: f64,
}

/// Source of raw upstream documents, one per domain.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn fetch(&self, domain: Domain, params: &ChartParams) -> KpResult<Value>;
}

/// Client for the Vedic astrology REST API.
pub struct VedicApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    lang: String,
}

impl VedicApiClient {
    /// Build a client; fails when no API key is configured.
    pub fn from_settings(settings: &ApiSettings) -> KpResult<Self> {
        let api_key = settings.require_key()?.to_string();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| KpError::Configuration(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            lang: settings.lang.clone(),
        })
    }

    pub fn endpoint_url(&self, domain: Domain) -> String {
        format!("{}/{}", self.base_url, domain.endpoint())
    }
}

#[async_trait]
impl UpstreamClient for VedicApiClient {
    async fn fetch(&self, domain: Domain, params: &ChartParams) -> KpResult<Value> {
        let query = [
            ("dob", params.dob.clone()),
            ("tob", params.tob.clone()),
            ("lat", params.lat.to_string()),
            ("lon", params.lon.to_string()),
            ("tz", params.tz.to_string()),
            ("api_key", self.api_key.clone()),
            ("lang", self.lang.clone()),
        ];
        let response = self
            .http
            .get(self.endpoint_url(domain))
            .query(&query)
            .send()
            .await
            .map_err(|e| KpError::fetch(domain, e.to_string()))?
            .error_for_status()
            .map_err(|e| KpError::fetch(domain, e.to_string()))?;
        response
            .json::<Value>()
            .await
            .map_err(|e| KpError::fetch(domain, format!("Response is not JSON: {}", e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Success,
    Error,
}

/// Result of downloading one domain's document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub domain: Domain,
    pub filename: String,
    pub status: FetchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        self.status == FetchStatus::Success
    }
}

/// Download every domain in turn and persist each answer as pretty JSON
/// under `data_dir`. Failures are collected, not propagated.
pub async fn fetch_all(
    client: &dyn UpstreamClient,
    params: &ChartParams,
    data_dir: &Path,
) -> Vec<FetchOutcome> {
    let mut outcomes = Vec::with_capacity(ALL_DOMAINS.len());
    for domain in ALL_DOMAINS {
        let filename = domain.input_filename().to_string();
        let result = match client.fetch(domain, params).await {
            Ok(document) => persist(&data_dir.join(&filename), &document, domain).await,
            Err(e) => Err(e),
        };
        let outcome = match result {
            Ok(path) => {
                info!("Fetched {} into {}", domain, path.display());
                FetchOutcome {
                    domain,
                    filename,
                    status: FetchStatus::Success,
                    message: None,
                }
            }
            Err(e) => {
                warn!("Fetching {} failed: {}", domain, e);
                FetchOutcome {
                    domain,
                    filename,
                    status: FetchStatus::Error,
                    message: Some(e.to_string()),
                }
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

async fn persist(path: &Path, document: &Value, domain: Domain) -> KpResult<PathBuf> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| KpError::io(parent, e))?;
    }
    let body = serde_json::to_string_pretty(document)
        .map_err(|source| KpError::Json { domain, source })?;
    tokio::fs::write(path, body)
        .await
        .map_err(|e| KpError::io(path, e))?;
    Ok(path.to_path_buf())
}
