use crate::error::{HarvestError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Main configuration struct for the application
///
/// Resolved from an optional YAML file merged with environment overrides.
/// The harvesting core consumes this struct as-is; it never reads the
/// environment or the filesystem itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub API token for authenticated requests
    #[serde(default)]
    pub github_token: Option<String>,
    /// Harvest pipeline settings (rate, concurrency, page size, lookback)
    #[serde(default)]
    pub harvest: HarvestConfig,
    /// ClickHouse connection settings
    #[serde(default)]
    pub clickhouse: ClickHouseConfig,
}

/// Settings for the harvesting pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Global ceiling on outbound GitHub API requests per second
    pub requests_per_second: usize,
    /// Maximum number of concurrently in-flight commit fetches
    pub max_concurrent_fetches: usize,
    /// Number of ranked repositories retrieved per cycle
    pub page_size: usize,
    /// Commit lookback window in hours
    pub lookback_hours: i64,
}

/// ClickHouse connection settings (HTTP interface)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickHouseConfig {
    /// ClickHouse host
    pub host: String,
    /// HTTP interface port
    pub port: u16,
    /// Target database
    pub database: String,
    /// User for authentication
    pub user: String,
    /// Password for authentication
    pub password: String,
}

impl Config {
    /// Loads configuration from a YAML file, falling back to defaults when
    /// the file is absent, then applies environment overrides
    ///
    /// Recognized environment variables: `GITHUB_ACCESS_TOKEN`,
    /// `CLICKHOUSE_HOST`, `CLICKHOUSE_PORT`, `CLICKHOUSE_DATABASE`,
    /// `CLICKHOUSE_USER`, `CLICKHOUSE_PASSWORD`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new("config.yaml"));
        let config = if path.exists() {
            let content = fs::read_to_string(path)?;
            serde_yaml::from_str(&content)
                .map_err(|e| HarvestError::Config(format!("failed to parse {}: {e}", path.display())))?
        } else {
            Self::default()
        };
        Ok(config.overridden_from_env())
    }

    /// Applies environment variable overrides on top of the loaded values
    pub fn overridden_from_env(mut self) -> Self {
        if let Ok(token) = env::var("GITHUB_ACCESS_TOKEN") {
            self.github_token = Some(token);
        }
        if let Ok(host) = env::var("CLICKHOUSE_HOST") {
            self.clickhouse.host = host;
        }
        if let Ok(port) = env::var("CLICKHOUSE_PORT") {
            if let Ok(port) = port.parse() {
                self.clickhouse.port = port;
            }
        }
        if let Ok(database) = env::var("CLICKHOUSE_DATABASE") {
            self.clickhouse.database = database;
        }
        if let Ok(user) = env::var("CLICKHOUSE_USER") {
            self.clickhouse.user = user;
        }
        if let Ok(password) = env::var("CLICKHOUSE_PASSWORD") {
            self.clickhouse.password = password;
        }
        self
    }

    /// Retrieves the GitHub token, erroring when none is configured
    pub fn github_token(&self) -> Result<&str> {
        self.github_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| HarvestError::Config("GitHub access token not configured".into()))
    }
}

impl ClickHouseConfig {
    /// Base URL of the ClickHouse HTTP interface
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 50,
            max_concurrent_fetches: 30,
            page_size: 100,
            lookback_hours: 24,
        }
    }
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8123,
            database: "test".to_string(),
            user: "test_user".to_string(),
            password: "test_password".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            harvest: HarvestConfig::default(),
            clickhouse: ClickHouseConfig::default(),
        }
    }
}
