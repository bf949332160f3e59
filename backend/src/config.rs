//! Runtime configuration.
//!
//! Settings are read from an optional `kp.toml` and then overridden by
//! environment variables:
//!
//! - `KP_CONFIG`: explicit path of the TOML file
//! - `KP_DATA_DIR`: working directory for input and output files (default `user_data`)
//! - `VEDIC_API_BASE_URL`: upstream base URL
//! - `VEDIC_API_KEY`: upstream API key, required only when fetching
//! - `KP_HTTP_TIMEOUT_SECS`: per-request timeout (default 10)
//! - `KP_LANG`: upstream response language (default `en`)
//! - `KP_CONSOLIDATION_MODE`: `structured` | `reparse`
//! - `HOST` / `PORT`: bind address of the HTTP service

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::consolidation::ConsolidationMode;
use crate::error::{KpError, KpResult};

pub const CONFIG_FILENAME: &str = "kp.toml";
pub const DEFAULT_BASE_URL: &str = "https://api.vedicastroapi.com/v3-json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub consolidation_mode: ConsolidationMode,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Upstream astrology API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_lang")]
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("user_data")
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            lang: default_lang(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            consolidation_mode: ConsolidationMode::default(),
            api: ApiSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl ApiSettings {
    /// The API key, or a configuration error naming the variable to set.
    pub fn require_key(&self) -> KpResult<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                KpError::Configuration(
                    "VEDIC_API_KEY is not set; an API key is required to fetch chart data"
                        .to_string(),
                )
            })
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> KpResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            KpError::Configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            KpError::Configuration(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Load configuration from the first `kp.toml` found in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Returns `Ok(None)` when there is no file to load.
    pub fn from_default_location() -> KpResult<Option<Self>> {
        let search_paths = [
            PathBuf::from(CONFIG_FILENAME),
            Path::new("backend").join(CONFIG_FILENAME),
            Path::new("..").join(CONFIG_FILENAME),
        ];

        for path in search_paths {
            if path.exists() {
                info!("Loading configuration from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// File settings (from `KP_CONFIG` or the default locations), then
    /// environment overrides.
    pub fn load() -> KpResult<Self> {
        let mut config = match env::var("KP_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        debug!(
            "Configuration: data_dir={}, base_url={}, mode={}",
            config.data_dir.display(),
            config.api.base_url,
            config.consolidation_mode
        );
        Ok(config)
    }

    /// Apply overrides from a variable lookup; empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> KpResult<()> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(dir) = get("KP_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = get("VEDIC_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(key) = get("VEDIC_API_KEY") {
            self.api.api_key = Some(key);
        }
        if let Some(timeout) = get("KP_HTTP_TIMEOUT_SECS") {
            self.api.timeout_secs = timeout.parse().map_err(|_| {
                KpError::Configuration(format!("Invalid KP_HTTP_TIMEOUT_SECS '{}'", timeout))
            })?;
        }
        if let Some(lang) = get("KP_LANG") {
            self.api.lang = lang;
        }
        if let Some(mode) = get("KP_CONSOLIDATION_MODE") {
            self.consolidation_mode = mode.parse()?;
        }
        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| KpError::Configuration(format!("Invalid PORT '{}'", port)))?;
        }
        Ok(())
    }
}
