//! Server configuration for the churn prediction service.
//!
//! This module provides configuration structures for the HTTP server, the
//! model boundary and the prediction strategy selection.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::strategy::StrategyKind;

/// Configuration for the HTTP serving server.
///
/// # Example
///
/// ```
/// use churn_serving::config::ServerConfig;
/// use churn_serving::strategy::StrategyKind;
///
/// let config = ServerConfig::builder()
///     .host("0.0.0.0")
///     .port(8080)
///     .strategy(StrategyKind::Model)
///     .model_path("/models/churn_model.json")
///     .build();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to (default: "127.0.0.1")
    pub host: String,

    /// Port to listen on (default: 5000)
    pub port: u16,

    /// Number of HTTP worker threads
    pub num_workers: usize,

    /// Which prediction strategy answers `/predict`
    pub strategy: StrategyKind,

    /// Model boundary configuration
    pub model_loader: ModelLoaderConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            num_workers: num_cpus(),
            strategy: StrategyKind::default(),
            model_loader: ModelLoaderConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidConfigFile(format!("{}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| ConfigError::InvalidConfigFile(format!("{}: {}", path.display(), e)))
    }

    /// Get the socket address string for binding.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidHost);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.num_workers == 0 {
            return Err(ConfigError::InvalidWorkerCount);
        }
        if self.model_loader.model_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyArtifactPath("model_path"));
        }
        if self.model_loader.load_encoders && self.model_loader.encoders_path.as_os_str().is_empty()
        {
            return Err(ConfigError::EmptyArtifactPath("encoders_path"));
        }
        Ok(())
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    num_workers: Option<usize>,
    strategy: Option<StrategyKind>,
    model_path: Option<PathBuf>,
    encoders_path: Option<PathBuf>,
    load_encoders: Option<bool>,
}

impl ServerConfigBuilder {
    /// Set the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the port number.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the number of worker threads.
    pub fn num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = Some(num_workers);
        self
    }

    /// Set the prediction strategy.
    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Set the classifier artifact path.
    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Set the encoder set artifact path.
    pub fn encoders_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.encoders_path = Some(path.into());
        self
    }

    /// Enable or disable loading the encoder set at start-up.
    pub fn load_encoders(mut self, enabled: bool) -> Self {
        self.load_encoders = Some(enabled);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ServerConfig {
        let default = ServerConfig::default();
        let loader = default.model_loader;
        ServerConfig {
            host: self.host.unwrap_or(default.host),
            port: self.port.unwrap_or(default.port),
            num_workers: self.num_workers.unwrap_or(default.num_workers),
            strategy: self.strategy.unwrap_or(default.strategy),
            model_loader: ModelLoaderConfig {
                model_path: self.model_path.unwrap_or(loader.model_path),
                encoders_path: self.encoders_path.unwrap_or(loader.encoders_path),
                load_encoders: self.load_encoders.unwrap_or(loader.load_encoders),
            },
        }
    }
}

/// Configuration for the model boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelLoaderConfig {
    /// Path to the serialized classifier
    pub model_path: PathBuf,

    /// Path to the serialized categorical encoder set
    pub encoders_path: PathBuf,

    /// Whether the server attempts to load encoders at start-up
    pub load_encoders: bool,
}

impl Default for ModelLoaderConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model/churn_model.json"),
            encoders_path: PathBuf::from("model/encoders.json"),
            load_encoders: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Empty host
    #[error("Invalid host: host cannot be empty")]
    InvalidHost,

    /// Invalid port number
    #[error("Invalid port number: port cannot be 0")]
    InvalidPort,

    /// Invalid worker count
    #[error("Invalid worker count: must be at least 1")]
    InvalidWorkerCount,

    /// An artifact path was configured as an empty string
    #[error("Artifact path `{0}` cannot be empty")]
    EmptyArtifactPath(&'static str),

    /// Unrecognised prediction strategy name
    #[error("Unknown prediction strategy: {0} (expected `heuristic` or `model`)")]
    UnknownStrategy(String),

    /// Invalid configuration file
    #[error("Invalid configuration file: {0}")]
    InvalidConfigFile(String),
}

/// Get the number of CPUs available.
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
