use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::{
    ACCESS_TOKEN_ENV, CORS_WHITELIST_ENV, DEFAULT_GRAPH_URL, GRAPH_URL_ENV, METRICS_PORT_ENV,
    REQUEST_DEADLINE_ENV, UPSTREAM_TIMEOUT_ENV,
};
use crate::error::{Result, SearchError};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub graph: GraphConfig,
    pub cors: CorsConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
    pub base_url: String,
    /// Token used when a request brings none of its own
    pub access_token: Option<String>,
    pub upstream_timeout_secs: u64,
    pub request_deadline_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GRAPH_URL.to_string(),
            access_token: None,
            upstream_timeout_secs: 10,
            request_deadline_secs: 30,
        }
    }
}

impl GraphConfig {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request_deadline_secs)
    }
}

/// Empty whitelist means every origin is allowed
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorsConfig {
    pub whitelist: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MetricsConfig {
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { port: 9898 }
    }
}

impl AppConfig {
    /// `.env`, then the TOML file, then environment overrides.
    ///
    /// An explicit `path` must exist; otherwise `config.toml` is read only
    /// when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SearchError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Overrides from environment-style variables. Unparsable numbers are
    /// ignored and the previous value kept.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT").and_then(|v| v.trim().parse().ok()) {
            self.server.port = port;
        }
        if let Some(token) = var(ACCESS_TOKEN_ENV) {
            self.graph.access_token = Some(token);
        }
        if let Some(url) = var(GRAPH_URL_ENV) {
            self.graph.base_url = url;
        }
        if let Some(secs) = var(UPSTREAM_TIMEOUT_ENV).and_then(|v| v.trim().parse().ok()) {
            self.graph.upstream_timeout_secs = secs;
        }
        if let Some(secs) = var(REQUEST_DEADLINE_ENV).and_then(|v| v.trim().parse().ok()) {
            self.graph.request_deadline_secs = secs;
        }
        if let Some(list) = var(CORS_WHITELIST_ENV) {
            self.cors.whitelist = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(port) = var(METRICS_PORT_ENV).and_then(|v| v.trim().parse().ok()) {
            self.metrics.port = port;
        }
    }
}
