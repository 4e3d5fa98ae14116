// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server configuration module
//!
//! This module provides configuration structures and logic for the explorer server,
//! supporting different environments and validation of configuration parameters.
//! Upstream locations for the registry, adapter and chain live under [`ExplorerConfig`].

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use anyhow::{Result, anyhow, ensure};
use api_client::FetcherConfig;
use config::{Config, ConfigError, Environment as ConfigEnv, File};
use external_apis::{BrandSettings, ChainConfig};
use serde::{Deserialize, Deserializer, Serialize, de};
use shared_types::{FeatureFlags, Network};
use url::Url;

use crate::error::{ServerError, ServerResult};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REGISTRY_API_URL: &str = "http://localhost:3000";
const DEFAULT_ADAPTER_API_URL: &str = "http://localhost:3001";
const DEFAULT_CHAIN_ID: &str = "31337";
const DEFAULT_BRAND_NAME: &str = "Sim Registry";
const DEFAULT_FETCH_DEADLINE_MS: u64 = 3000;
const MAX_FETCH_DEADLINE_MS: u64 = 60_000;

/// A validated server port that ensures the value is appropriate for the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerPort {
    port: u16,
    environment: Environment,
}

impl ServerPort {
    /// Create a new `ServerPort`, ensuring it's valid for the given environment
    ///
    /// # Errors
    ///
    /// Returns an error if the port is 0 in non-testing environments
    pub fn new(port: u16, environment: Environment) -> Result<Self> {
        if port == 0 && environment != Environment::Testing {
            return Err(anyhow!("port cannot be 0 in non-testing environments"));
        }
        Ok(Self { port, environment })
    }

    /// Create a safe default port for development
    pub const fn default_development() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: Environment::Development,
        }
    }

    /// Create a safe testing port (port 0)
    pub const fn testing() -> Self {
        Self {
            port: 0,
            environment: Environment::Testing,
        }
    }

    /// Get the port value
    pub fn value(&self) -> u16 {
        self.port
    }
}

impl<'de> Deserialize<'de> for ServerPort {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let port = u16::deserialize(deserializer)?;
        // revalidated in `ServerConfig::load` once the environment is known
        Ok(Self {
            port,
            environment: Environment::Development,
        })
    }
}

/// A validated timeout duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeoutSeconds(Duration);

impl TimeoutSeconds {
    /// Create a new `TimeoutSeconds`, ensuring the value is within valid bounds
    ///
    /// # Errors
    ///
    /// Returns an error if timeout is 0 or greater than 300 seconds
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(seconds != 0, "timeout must be greater than 0");
        ensure!(seconds <= 300, "timeout cannot exceed 300");
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Create a safe default timeout (30 seconds)
    pub const fn default_value() -> Self {
        Self(Duration::from_secs(30))
    }

    /// Create a safe testing timeout (5 seconds)
    pub const fn testing() -> Self {
        Self(Duration::from_secs(5))
    }

    /// Get the timeout value in seconds
    pub fn value(&self) -> Duration {
        self.0
    }
}

impl<'de> Deserialize<'de> for TimeoutSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::new(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl Default for TimeoutSeconds {
    fn default() -> Self {
        Self::default_value()
    }
}

/// Per-call deadline for upstream HTTP and JSON-RPC requests, 1 to 60000 ms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeadlineMillis(Duration);

impl DeadlineMillis {
    /// Create a new `DeadlineMillis`, ensuring the value is within valid bounds
    ///
    /// # Errors
    ///
    /// Returns an error if the deadline is 0 or greater than 60000 ms
    pub fn new(millis: u64) -> Result<Self> {
        ensure!(millis != 0, "fetch deadline must be greater than 0");
        ensure!(
            millis <= MAX_FETCH_DEADLINE_MS,
            "fetch deadline cannot exceed {MAX_FETCH_DEADLINE_MS} ms"
        );
        Ok(Self(Duration::from_millis(millis)))
    }

    /// Get the deadline
    pub fn value(&self) -> Duration {
        self.0
    }
}

impl Default for DeadlineMillis {
    fn default() -> Self {
        Self(Duration::from_millis(DEFAULT_FETCH_DEADLINE_MS))
    }
}

impl<'de> Deserialize<'de> for DeadlineMillis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Self::new(millis).map_err(|e| de::Error::custom(e.to_string()))
    }
}

/// Environment types for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production environment
    Production,
    /// Development environment
    Development,
    /// Testing environment
    Testing,
}

/// Upstream locations and presentation settings for the explorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Registry API base URL
    pub registry_api_url: Url,
    /// Adapter API base URL
    pub adapter_api_url: Url,
    /// JSON-RPC provider; chain lookups are disabled without one
    #[serde(default)]
    pub rpc_url: Option<Url>,
    /// Network identifier reported by health
    pub chain_id: String,
    /// Base for block explorer links
    #[serde(default)]
    pub block_explorer_url: Option<Url>,
    /// Holder views switch
    #[serde(default)]
    pub feature_holders: bool,
    /// Subgraph views switch
    #[serde(default)]
    pub feature_subgraph: bool,
    /// Brand string shown by the presentation layer
    pub brand_name: String,
    /// Per-call deadline for every upstream
    #[serde(default)]
    pub fetch_deadline_ms: DeadlineMillis,
}

#[allow(clippy::expect_used)]
fn default_url(url: &'static str) -> Url {
    Url::parse(url).expect("built-in default URL is valid")
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            registry_api_url: default_url(DEFAULT_REGISTRY_API_URL),
            adapter_api_url: default_url(DEFAULT_ADAPTER_API_URL),
            rpc_url: None,
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            block_explorer_url: None,
            feature_holders: false,
            feature_subgraph: false,
            brand_name: DEFAULT_BRAND_NAME.to_string(),
            fetch_deadline_ms: DeadlineMillis::default(),
        }
    }
}

impl ExplorerConfig {
    /// Fetcher settings for the registry API
    pub fn registry_fetcher(&self) -> FetcherConfig {
        FetcherConfig::new(self.registry_api_url.clone()).with_deadline(self.fetch_deadline_ms.value())
    }

    /// Fetcher settings for the adapter API
    pub fn adapter_fetcher(&self) -> FetcherConfig {
        FetcherConfig::new(self.adapter_api_url.clone()).with_deadline(self.fetch_deadline_ms.value())
    }

    /// Chain client settings
    pub fn chain(&self) -> ChainConfig {
        ChainConfig {
            rpc_url: self.rpc_url.clone(),
            block_explorer_url: self.block_explorer_url.clone(),
            network: Network::new(self.chain_id.as_str()),
            deadline: self.fetch_deadline_ms.value(),
        }
    }

    /// Brand and feature settings surfaced in ledger contexts
    pub fn brand(&self) -> BrandSettings {
        BrandSettings {
            brand_name: self.brand_name.clone(),
            features: FeatureFlags {
                holders: self.feature_holders,
                subgraph: self.feature_subgraph,
            },
        }
    }
}

/// Server configuration for different environments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: IpAddr,
    /// Server port (validated for environment compatibility)
    pub port: ServerPort,
    /// Request timeout in seconds (validated range: 1-300)
    pub timeout_seconds: TimeoutSeconds,
    /// Environment type
    pub environment: Environment,
    /// Upstream settings
    #[serde(default)]
    pub explorer: ExplorerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::default_development(),
            timeout_seconds: TimeoutSeconds::default(),
            environment: Environment::Development,
            explorer: ExplorerConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables and optional configuration files
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if configuration is invalid or cannot be loaded.
    pub fn from_env() -> ServerResult<Self> {
        Self::load().map_err(|e| ServerError::Config {
            message: format!("failed to load configuration: {e}"),
        })
    }

    /// Load configuration using the config crate with hierarchical sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. Configuration file (config.json)
    /// 3. Environment-specific files (config.{env}.json)
    /// 4. Environment variables with `SERVER_` prefix, nested keys split on `__`
    ///    (`SERVER_EXPLORER__RPC_URL`)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let env_var = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let mut config_builder = Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("timeout_seconds", 30)?
            .set_default("environment", "development")?
            .set_default("explorer.registry_api_url", DEFAULT_REGISTRY_API_URL)?
            .set_default("explorer.adapter_api_url", DEFAULT_ADAPTER_API_URL)?
            .set_default("explorer.chain_id", DEFAULT_CHAIN_ID)?
            .set_default("explorer.feature_holders", false)?
            .set_default("explorer.feature_subgraph", false)?
            .set_default("explorer.brand_name", DEFAULT_BRAND_NAME)?
            .set_default("explorer.fetch_deadline_ms", DEFAULT_FETCH_DEADLINE_MS)?
            .add_source(File::with_name("config.json").required(false))
            .add_source(
                File::with_name(&format!("config.{}.json", env_var.to_lowercase())).required(false),
            )
            .add_source(
                ConfigEnv::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if std::env::var("ENVIRONMENT").is_ok() {
            config_builder = config_builder.set_override("environment", env_var.to_lowercase())?;
        }

        let config = config_builder.build()?;
        let mut server_config: Self = config.try_deserialize()?;

        server_config.port = ServerPort::new(server_config.port.value(), server_config.environment)
            .map_err(|e| ConfigError::Message(format!("invalid port configuration: {e}")))?;

        Ok(server_config)
    }

    /// Create configuration optimized for testing
    ///
    /// Upstreams keep their defaults; tests point them at mock servers.
    pub fn for_testing() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::testing(), // let OS choose available port
            timeout_seconds: TimeoutSeconds::testing(),
            environment: Environment::Testing,
            explorer: ExplorerConfig::default(),
        }
    }

    /// Get socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port.value())
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
            Environment::Testing => write!(f, "testing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    #[test]
    fn timeout_validation() {
        assert!(TimeoutSeconds::new(0).is_err());
        assert!(TimeoutSeconds::new(400).is_err());

        assert!(TimeoutSeconds::new(30).is_ok());
        assert!(TimeoutSeconds::new(1).is_ok());
        assert!(TimeoutSeconds::new(300).is_ok());
    }

    #[test]
    fn deadline_validation() {
        assert_err!(DeadlineMillis::new(0));
        assert_err!(DeadlineMillis::new(60_001));

        let shortest = assert_ok!(DeadlineMillis::new(1));
        assert_eq!(shortest.value(), Duration::from_millis(1));
        assert_eq!(
            DeadlineMillis::default().value(),
            Duration::from_millis(3000)
        );
    }

    #[test]
    fn server_port_validation() {
        // Port 0 should only be valid in testing environment
        assert!(ServerPort::new(0, Environment::Testing).is_ok());
        assert!(ServerPort::new(0, Environment::Development).is_err());
        assert!(ServerPort::new(0, Environment::Production).is_err());

        assert!(ServerPort::new(8080, Environment::Development).is_ok());
        assert!(ServerPort::new(443, Environment::Production).is_ok());
    }

    #[test]
    fn environment_display() {
        assert_eq!(Environment::Production.to_string(), "production");
        assert_eq!(Environment::Development.to_string(), "development");
        assert_eq!(Environment::Testing.to_string(), "testing");
    }

    #[test]
    fn explorer_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port.value(), 8080);

        let explorer = config.explorer;
        assert_eq!(explorer.registry_api_url.as_str(), "http://localhost:3000/");
        assert_eq!(explorer.adapter_api_url.as_str(), "http://localhost:3001/");
        assert!(explorer.rpc_url.is_none());
        assert_eq!(explorer.chain().network.chain_id(), "31337");
        assert_eq!(explorer.brand().brand_name, "Sim Registry");
        assert!(!explorer.brand().features.holders);
        assert_eq!(explorer.chain().deadline, Duration::from_millis(3000));
    }

    #[test]
    fn explorer_section_deserializes() {
        let json = serde_json::json!({
            "host": "0.0.0.0",
            "port": 9000,
            "timeout_seconds": 10,
            "environment": "production",
            "explorer": {
                "registry_api_url": "https://registry.example.org",
                "adapter_api_url": "https://adapter.example.org/base",
                "rpc_url": "https://rpc.example.org",
                "chain_id": "137",
                "feature_subgraph": true,
                "brand_name": "Acme Registry",
                "fetch_deadline_ms": 1500
            }
        });
        let config: ServerConfig = serde_json::from_value(json).unwrap();

        let explorer = &config.explorer;
        assert_eq!(explorer.adapter_fetcher().base_url.path(), "/base");
        assert_eq!(explorer.chain().network.chain_id(), "137");
        assert!(explorer.chain().rpc_url.is_some());
        assert!(explorer.block_explorer_url.is_none());
        assert!(explorer.brand().features.subgraph);
        assert_eq!(explorer.fetch_deadline_ms.value(), Duration::from_millis(1500));
    }

    #[test]
    fn malformed_upstream_url_is_rejected() {
        let json = serde_json::json!({
            "host": "127.0.0.1",
            "port": 8080,
            "timeout_seconds": 30,
            "environment": "development",
            "explorer": {
                "registry_api_url": "not a url",
                "adapter_api_url": "http://localhost:3001",
                "chain_id": "31337",
                "brand_name": "Sim Registry"
            }
        });
        assert!(serde_json::from_value::<ServerConfig>(json).is_err());
    }
}
