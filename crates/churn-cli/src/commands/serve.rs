//! Serve Command Implementation
//!
//! Runs the churn prediction web server until Ctrl-C.

use anyhow::{Context, Result};
use churn_serving::{Server, ServerConfig, StrategyKind};
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

/// Serve the prediction form and JSON API over HTTP
///
/// Settings come from an optional JSON config file; every flag given on the
/// command line (or through its `CHURN_*` variable) overrides the file.
///
/// # Example
///
/// ```bash
/// churn serve \
///     --config churn.json \
///     --port 8080 \
///     --strategy model
/// ```
#[derive(Args, Debug, Clone)]
pub struct ServeCommand {
    /// JSON configuration file
    #[arg(long, short = 'c', env = "CHURN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long, env = "CHURN_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p', env = "CHURN_PORT")]
    pub port: Option<u16>,

    /// Number of HTTP worker threads
    #[arg(long, short = 'w', env = "CHURN_WORKERS")]
    pub workers: Option<usize>,

    /// Classifier artifact
    #[arg(long, env = "CHURN_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Categorical encoder artifact
    #[arg(long, env = "CHURN_ENCODERS_PATH")]
    pub encoders_path: Option<PathBuf>,

    /// Skip loading the encoder artifact
    #[arg(long)]
    pub no_encoders: bool,

    /// Prediction strategy (`heuristic` or `model`)
    #[arg(long, env = "CHURN_STRATEGY")]
    pub strategy: Option<StrategyKind>,
}

impl ServeCommand {
    /// Execute the serve command
    pub async fn run(&self) -> Result<()> {
        let config = self.server_config()?;
        config.validate().context("Invalid server configuration")?;

        info!("Listening on {}", config.socket_addr());
        info!("Worker threads: {}", config.num_workers);
        info!("Prediction strategy: {}", config.strategy);
        if config.strategy == StrategyKind::Model && !config.model_loader.model_path.exists() {
            warn!(
                "Model file {} does not exist yet, predictions will fail until it is provided",
                config.model_loader.model_path.display()
            );
        }

        let server = Server::new(config);
        server.start().await.context("Failed to start server")?;

        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for shutdown signal")?;

        info!("Received shutdown signal, stopping server...");
        server.stop().await.context("Failed to stop server")?;
        Ok(())
    }

    /// Merge the config file (if any) with command-line overrides.
    pub fn server_config(&self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(workers) = self.workers {
            config.num_workers = workers;
        }
        if let Some(path) = &self.model_path {
            config.model_loader.model_path = path.clone();
        }
        if let Some(path) = &self.encoders_path {
            config.model_loader.encoders_path = path.clone();
        }
        if self.no_encoders {
            config.model_loader.load_encoders = false;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn bare() -> ServeCommand {
        ServeCommand {
            config: None,
            host: None,
            port: None,
            workers: None,
            model_path: None,
            encoders_path: None,
            no_encoders: false,
            strategy: None,
        }
    }

    #[test]
    fn test_defaults_without_file() {
        let config = bare().server_config().unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.strategy, StrategyKind::Heuristic);
        assert!(config.model_loader.load_encoders);
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("churn.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"host": "0.0.0.0", "port": 9000, "strategy": "model"}}"#
        )
        .unwrap();

        let cmd = ServeCommand {
            config: Some(path),
            port: Some(9100),
            no_encoders: true,
            ..bare()
        };
        let config = cmd.server_config().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9100);
        assert_eq!(config.strategy, StrategyKind::Model);
        assert!(!config.model_loader.load_encoders);
    }

    #[test]
    fn test_missing_config_file() {
        let cmd = ServeCommand {
            config: Some(PathBuf::from("/nonexistent/churn.json")),
            ..bare()
        };
        assert!(cmd.server_config().is_err());
    }
}
