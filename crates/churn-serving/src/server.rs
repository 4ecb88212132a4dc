//! HTTP server implementation for churn serving.
//!
//! The server owns the [`ModelLoader`] and hands it to the request layer.
//! Its lifecycle is explicit: construct, attempt to load the artifacts, then
//! serve in either a ready or a degraded state.

use crate::config::ServerConfig;
use crate::error::{ServingError, ServingResult};
use crate::handler::{self, AppState, RequestStats};
use crate::model_loader::ModelLoader;
use crate::strategy::StrategyKind;
use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpServer};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Server state enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerState {
    /// Server is not started
    Stopped,
    /// Server is starting up
    Starting,
    /// Server is running and accepting requests
    Running,
    /// Server is shutting down
    ShuttingDown,
    /// Server failed to start
    Error,
}

/// Health status of the server.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Running, and able to answer predictions with the active strategy
    pub healthy: bool,

    /// Server state
    pub state: ServerState,

    /// Active prediction strategy
    pub strategy: StrategyKind,

    /// Whether a classifier is loaded
    pub model_loaded: bool,

    /// Whether an encoder set is loaded
    pub encoders_loaded: bool,

    /// Seconds since the server started
    pub uptime_secs: u64,

    /// Prediction requests handled
    pub requests_total: u64,

    /// Prediction requests that failed
    pub requests_failed: u64,
}

impl HealthStatus {
    pub(crate) fn collect(
        state: ServerState,
        strategy: StrategyKind,
        model_loader: &ModelLoader,
        uptime_secs: u64,
        stats: &RequestStats,
    ) -> Self {
        let model_loaded = model_loader.is_loaded();
        let can_predict = match strategy {
            StrategyKind::Heuristic => true,
            StrategyKind::Model => model_loaded,
        };

        Self {
            healthy: state == ServerState::Running && can_predict,
            state,
            strategy,
            model_loaded,
            encoders_loaded: model_loader.encoders_loaded(),
            uptime_secs,
            requests_total: stats.total(),
            requests_failed: stats.failed(),
        }
    }
}

/// HTTP server for churn prediction.
///
/// # Example
///
/// ```no_run
/// use churn_serving::server::Server;
/// use churn_serving::config::ServerConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ServerConfig::builder()
///     .host("127.0.0.1")
///     .port(5000)
///     .build();
///
/// let server = Server::new(config);
/// server.start().await?;
///
/// // Server is now running...
/// server.stop().await?;
/// # Ok(())
/// # }
/// ```
pub struct Server {
    /// Server configuration
    config: ServerConfig,

    /// Current server state
    state: Arc<RwLock<ServerState>>,

    /// Model boundary shared with the handlers
    model_loader: Arc<ModelLoader>,

    /// Request counters shared with the handlers
    stats: Arc<RequestStats>,

    /// Server start time
    start_time: RwLock<Option<Instant>>,

    /// Address actually bound
    local_addr: RwLock<Option<SocketAddr>>,

    /// actix handle used for graceful shutdown
    handle: Mutex<Option<ServerHandle>>,

    /// Task driving the actix server
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Server {
    /// Create a new server with the given configuration.
    ///
    /// No artifact is loaded until [`Server::start`].
    pub fn new(config: ServerConfig) -> Self {
        let model_loader = Arc::new(ModelLoader::new(config.model_loader.clone()));

        Self {
            config,
            state: Arc::new(RwLock::new(ServerState::Stopped)),
            model_loader,
            stats: Arc::new(RequestStats::default()),
            start_time: RwLock::new(None),
            local_addr: RwLock::new(None),
            handle: Mutex::new(None),
            task: Mutex::new(None),
        }
    }

    /// Start the HTTP server.
    ///
    /// This method:
    /// 1. Validates the configuration
    /// 2. Attempts to load the encoders and the classifier
    /// 3. Binds the listener and spawns the actix server
    ///
    /// Artifact load failures do not abort start-up; the server runs degraded.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or binding fails.
    pub async fn start(&self) -> ServingResult<()> {
        {
            let current_state = *self.state.read();
            if current_state == ServerState::Running {
                warn!("Server is already running");
                return Ok(());
            }
            if current_state == ServerState::Starting {
                return Err(ServingError::server("Server is already starting"));
            }
        }

        *self.state.write() = ServerState::Starting;
        info!("Starting churn prediction server...");

        self.config.validate().map_err(|e| {
            *self.state.write() = ServerState::Error;
            ServingError::from(e)
        })?;

        self.load_artifacts();

        let app_state = web::Data::new(AppState::from_parts(
            self.config.strategy,
            Arc::clone(&self.model_loader),
            Arc::clone(&self.state),
            Arc::clone(&self.stats),
        ));

        let http = HttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .configure(handler::configure)
        })
        .workers(self.config.num_workers)
        .bind((self.config.host.as_str(), self.config.port))
        .map_err(|e| {
            *self.state.write() = ServerState::Error;
            ServingError::server(format!(
                "Failed to bind {}: {}",
                self.config.socket_addr(),
                e
            ))
        })?;

        let bound = http.addrs().first().copied();
        let running = http.run();
        *self.handle.lock() = Some(running.handle());
        let task = tokio::spawn(async move {
            if let Err(e) = running.await {
                error!("HTTP server error: {}", e);
            }
        });
        *self.task.lock() = Some(task);

        *self.local_addr.write() = bound;
        *self.start_time.write() = Some(Instant::now());
        *self.state.write() = ServerState::Running;

        info!(
            "Server started on {} (strategy: {})",
            bound
                .map(|a| a.to_string())
                .unwrap_or_else(|| self.config.socket_addr()),
            self.config.strategy
        );
        Ok(())
    }

    fn load_artifacts(&self) -> bool {
        if self.config.model_loader.load_encoders && !self.model_loader.load_encoders() {
            warn!("Continuing without categorical encoders");
        }

        let loaded = self.model_loader.load_model();
        match (loaded, self.config.strategy) {
            (true, _) => info!("Classifier ready"),
            (false, StrategyKind::Model) => {
                warn!("Classifier unavailable, model-backed predictions will fail until it is loaded")
            }
            (false, StrategyKind::Heuristic) => {
                info!("No classifier loaded, serving the placeholder heuristic")
            }
        }
        loaded
    }

    /// Stop the HTTP server gracefully.
    ///
    /// In-flight requests complete before the workers exit.
    pub async fn stop(&self) -> ServingResult<()> {
        let current_state = *self.state.read();
        if current_state == ServerState::Stopped {
            return Ok(());
        }

        info!("Stopping server...");
        *self.state.write() = ServerState::ShuttingDown;

        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            handle.stop(true).await;
        }

        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("HTTP server task ended abnormally: {}", e);
            }
        }

        *self.state.write() = ServerState::Stopped;
        *self.start_time.write() = None;
        *self.local_addr.write() = None;

        info!("Server stopped");
        Ok(())
    }

    /// Reload both artifacts from disk without restarting.
    ///
    /// Returns whether a classifier is loaded afterwards.
    pub fn reload_artifacts(&self) -> ServingResult<bool> {
        if *self.state.read() != ServerState::Running {
            return Err(ServingError::server("Server is not running"));
        }
        info!("Reloading model artifacts...");
        self.load_artifacts();
        Ok(self.model_loader.is_loaded())
    }

    /// Get the current health status of the server.
    pub fn health(&self) -> HealthStatus {
        let uptime_secs = self
            .start_time
            .read()
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0);

        HealthStatus::collect(
            *self.state.read(),
            self.config.strategy,
            &self.model_loader,
            uptime_secs,
            &self.stats,
        )
    }

    /// Check if the server is running.
    pub fn is_running(&self) -> bool {
        *self.state.read() == ServerState::Running
    }

    /// Get the current server state.
    pub fn state(&self) -> ServerState {
        *self.state.read()
    }

    /// Address the listener is bound to, while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.read()
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the model loader.
    pub fn model_loader(&self) -> &Arc<ModelLoader> {
        &self.model_loader
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("state", &*self.state.read())
            .field("local_addr", &*self.local_addr.read())
            .finish()
    }
}
